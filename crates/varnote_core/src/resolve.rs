//! Value resolution and display formatting.
//!
//! # Responsibility
//! - Turn host-native raw values into `ValueInfo` display values.
//! - Convert RGB floats to `#rrggbb` and format numbers for display.
//!
//! # Invariants
//! - Alias resolution is exactly one hop; only a direct raw RGB or a
//!   consumer-resolved RGB feeds `resolved_hex`.
//! - Hex conversion never panics; malformed input yields `#000000`.

use crate::model::record::{Rgb, ValueInfo};
use crate::model::variable::{Collection, CollectionId, RawValue, ResolvedType, Rgba, Variable};
use crate::store::{StoreResult, VariableStore};
use log::debug;
use std::collections::HashMap;

/// Hex string returned for missing or malformed colors.
pub const FALLBACK_HEX: &str = "#000000";

/// Converts float RGB channels in `[0, 1]` to a lowercase `#rrggbb` string.
///
/// Non-finite channels yield `#000000`; out-of-range channels are clamped.
pub fn hex_of(r: f64, g: f64, b: f64) -> String {
    if !(r.is_finite() && g.is_finite() && b.is_finite()) {
        return FALLBACK_HEX.to_string();
    }
    format!(
        "#{:02x}{:02x}{:02x}",
        channel_byte(r),
        channel_byte(g),
        channel_byte(b)
    )
}

/// Hex for an optional color; `None` yields `#000000`.
pub fn color_hex(color: Option<&Rgba>) -> String {
    match color {
        Some(color) => hex_of(color.r, color.g, color.b),
        None => FALLBACK_HEX.to_string(),
    }
}

fn channel_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Formats a number with two decimals, dropping a trailing `.00`.
///
/// Ties round away from zero and negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    let mut rounded = (value * 100.0).round() / 100.0;
    if !rounded.is_finite() {
        rounded = value;
    }
    if rounded == 0.0 {
        rounded = 0.0;
    }
    let fixed = format!("{rounded:.2}");
    match fixed.strip_suffix(".00") {
        Some(integer) => integer.to_string(),
        None => fixed,
    }
}

/// Wraps a literal raw value in its matching display tag.
///
/// Returns `None` for aliases, which need store access.
pub fn literal_info(raw: &RawValue) -> Option<ValueInfo> {
    match raw {
        RawValue::Color { value } => Some(ValueInfo::Color {
            value: Rgb {
                r: value.r,
                g: value.g,
                b: value.b,
            },
            hex: color_hex(Some(value)),
        }),
        RawValue::Float { value } => Some(ValueInfo::Number { value: *value }),
        RawValue::String { value } => Some(ValueInfo::String {
            value: value.clone(),
        }),
        RawValue::Boolean { value } => Some(ValueInfo::Boolean { value: *value }),
        RawValue::Alias { .. } => None,
    }
}

/// Resolves display values against one store and one collection lookup.
pub struct ValueResolver<'a, S: VariableStore + ?Sized> {
    store: &'a S,
    collections: &'a HashMap<CollectionId, Collection>,
}

impl<'a, S: VariableStore + ?Sized> ValueResolver<'a, S> {
    pub fn new(store: &'a S, collections: &'a HashMap<CollectionId, Collection>) -> Self {
        Self { store, collections }
    }

    /// Raw value shown for `variable`: its collection's display-mode value.
    pub fn display_raw_value<'v>(&self, variable: &'v Variable) -> Option<&'v RawValue> {
        let collection = self.collections.get(&variable.collection_id)?;
        variable.value_for_mode(collection.display_mode_id()?)
    }

    /// Resolves the display value of one variable.
    ///
    /// `Ok(None)` means nothing is stored for the display mode.
    pub async fn resolve(&self, variable: &Variable) -> StoreResult<Option<ValueInfo>> {
        let Some(raw) = self.display_raw_value(variable) else {
            return Ok(None);
        };
        match raw {
            RawValue::Alias { id } => self.resolve_reference(id).await.map(Some),
            literal => Ok(literal_info(literal)),
        }
    }

    async fn resolve_reference(&self, target_id: &str) -> StoreResult<ValueInfo> {
        let Some(target) = self.store.get_variable(target_id).await? else {
            debug!("event=alias_target_missing module=resolve target_id={target_id}");
            return Ok(ValueInfo::Reference {
                value: target_id.to_string(),
                reference_id: target_id.to_string(),
                resolved_hex: None,
            });
        };

        let resolved_hex = if target.resolved_type == ResolvedType::Color {
            self.target_color(&target).await.map(|rgba| color_hex(Some(&rgba)))
        } else {
            None
        };

        Ok(ValueInfo::Reference {
            value: target.name,
            reference_id: target.id,
            resolved_hex,
        })
    }

    /// Consumer-context RGB first, then the target's own display-mode RGB.
    async fn target_color(&self, target: &Variable) -> Option<Rgba> {
        match self.store.resolve_for_consumer(&target.id).await {
            Ok(Some(RawValue::Color { value })) => return Some(value),
            Ok(_) => {}
            Err(err) => {
                debug!(
                    "event=consumer_resolve_failed module=resolve target_id={} error={}",
                    target.id, err
                );
            }
        }
        match self.display_raw_value(target) {
            Some(RawValue::Color { value }) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{color_hex, format_number, hex_of, literal_info};
    use crate::model::record::ValueInfo;
    use crate::model::variable::{RawValue, Rgba};

    #[test]
    fn hex_of_known_triples() {
        assert_eq!(hex_of(1.0, 0.0, 0.0), "#ff0000");
        assert_eq!(hex_of(0.0, 0.0, 0.0), "#000000");
        assert_eq!(hex_of(0.2, 0.5, 1.0), "#3380ff");
        assert_eq!(hex_of(1.0, 1.0, 1.0), "#ffffff");
    }

    #[test]
    fn malformed_colors_fall_back_to_black() {
        assert_eq!(color_hex(None), "#000000");
        assert_eq!(hex_of(f64::NAN, 0.5, 0.5), "#000000");
        assert_eq!(hex_of(0.5, f64::INFINITY, 0.5), "#000000");
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(hex_of(1.5, -0.2, 0.0), "#ff0000");
    }

    #[test]
    fn hex_is_zero_padded_lowercase() {
        assert_eq!(hex_of(0.02, 0.04, 0.98), "#050afa");
        let rgba = Rgba::rgb(0.0, 0.0, 0.0);
        assert_eq!(color_hex(Some(&rgba)), "#000000");
    }

    #[test]
    fn format_number_strips_only_trailing_zero_decimals() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(1.5), "1.50");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(0.333), "0.33");
        assert_eq!(format_number(0.125), "0.13");
        assert_eq!(format_number(0.375), "0.38");
        assert_eq!(format_number(0.625), "0.63");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(-1.5), "-1.50");
    }

    #[test]
    fn literal_color_produces_color_info() {
        let info = literal_info(&RawValue::color(0.2, 0.5, 1.0)).expect("color info");
        match info {
            ValueInfo::Color { hex, value } => {
                assert_eq!(hex, "#3380ff");
                assert_eq!(value.b, 1.0);
            }
            other => panic!("unexpected value info: {other:?}"),
        }
    }

    #[test]
    fn alias_is_not_a_literal() {
        assert_eq!(literal_info(&RawValue::alias("v2")), None);
    }
}

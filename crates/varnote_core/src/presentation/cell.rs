//! Value column rendering rules.

use crate::model::record::ValueInfo;
use crate::model::variable::ResolvedType;
use crate::resolve::format_number;

/// Text shown when a variable has no value for its display mode.
pub const EMPTY_VALUE_TEXT: &str = "—";

/// Emphasis hint for the rendering toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Muted,
    Positive,
    Negative,
}

/// Display-ready content of one value cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCell {
    pub text: String,
    /// Hex color of a swatch drawn before the text.
    pub swatch: Option<String>,
    pub tone: Tone,
}

impl ValueCell {
    fn text(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            swatch: None,
            tone,
        }
    }
}

/// Builds the value cell for one record.
///
/// References only get a swatch when the variable itself is a COLOR and the
/// target hex was resolved.
pub fn value_cell(value_info: Option<&ValueInfo>, resolved_type: ResolvedType) -> ValueCell {
    let Some(value_info) = value_info else {
        return ValueCell::text(EMPTY_VALUE_TEXT, Tone::Muted);
    };
    match value_info {
        ValueInfo::Color { hex, .. } => ValueCell {
            text: hex.clone(),
            swatch: Some(hex.clone()),
            tone: Tone::Normal,
        },
        ValueInfo::Reference {
            value,
            resolved_hex,
            ..
        } => ValueCell {
            text: value.clone(),
            swatch: resolved_hex
                .clone()
                .filter(|_| resolved_type == ResolvedType::Color),
            tone: Tone::Normal,
        },
        ValueInfo::Number { value } => ValueCell::text(format_number(*value), Tone::Normal),
        ValueInfo::String { value } => ValueCell::text(format!("\"{value}\""), Tone::Normal),
        ValueInfo::Boolean { value: true } => ValueCell::text("true", Tone::Positive),
        ValueInfo::Boolean { value: false } => ValueCell::text("false", Tone::Negative),
    }
}

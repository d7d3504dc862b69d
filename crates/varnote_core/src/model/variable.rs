//! Variable and collection domain model.
//!
//! # Responsibility
//! - Define read-only snapshots of host variables and collections.
//! - Keep host-native raw values as an explicit closed sum type.
//!
//! # Invariants
//! - `resolved_type` is immutable for a variable lifetime.
//! - A variable's displayed value comes from its collection's default mode,
//!   or the first declared mode when no default is set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Opaque host identifier of one variable.
pub type VariableId = String;
/// Opaque host identifier of one collection.
pub type CollectionId = String;
/// Opaque host identifier of one mode inside a collection.
pub type ModeId = String;

/// Closed set of variable value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedType {
    Color,
    Float,
    String,
    Boolean,
}

impl ResolvedType {
    /// Stable upper-case label used by the host and the table type column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "COLOR",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
        }
    }
}

impl Display for ResolvedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGBA color with float channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque_alpha")]
    pub a: f64,
}

fn opaque_alpha() -> f64 {
    1.0
}

impl Rgba {
    /// Creates an opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Host-native stored value for one mode.
///
/// `Alias` points at another variable instead of holding a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawValue {
    Color { value: Rgba },
    Float { value: f64 },
    String { value: String },
    Boolean { value: bool },
    Alias { id: VariableId },
}

impl RawValue {
    pub fn color(r: f64, g: f64, b: f64) -> Self {
        Self::Color {
            value: Rgba::rgb(r, g, b),
        }
    }

    pub fn float(value: f64) -> Self {
        Self::Float { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String {
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::Boolean { value }
    }

    pub fn alias(id: impl Into<VariableId>) -> Self {
        Self::Alias { id: id.into() }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias { .. })
    }
}

/// One design variable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: VariableId,
    /// Slash-separated hierarchical name, also the display sort key.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub resolved_type: ResolvedType,
    pub collection_id: CollectionId,
    #[serde(default)]
    pub values_by_mode: BTreeMap<ModeId, RawValue>,
}

impl Variable {
    /// Creates a variable with an empty description and no mode values.
    pub fn new(
        id: impl Into<VariableId>,
        name: impl Into<String>,
        resolved_type: ResolvedType,
        collection_id: impl Into<CollectionId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            resolved_type,
            collection_id: collection_id.into(),
            values_by_mode: BTreeMap::new(),
        }
    }

    /// Builder-style helper for setting one mode value.
    pub fn with_value(mut self, mode_id: impl Into<ModeId>, value: RawValue) -> Self {
        self.values_by_mode.insert(mode_id.into(), value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the raw value stored for `mode_id`, if any.
    pub fn value_for_mode(&self, mode_id: &str) -> Option<&RawValue> {
        self.values_by_mode.get(mode_id)
    }
}

/// One named value-context inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub mode_id: ModeId,
    pub name: String,
}

impl Mode {
    pub fn new(mode_id: impl Into<ModeId>, name: impl Into<String>) -> Self {
        Self {
            mode_id: mode_id.into(),
            name: name.into(),
        }
    }
}

/// Named grouping of variables sharing a set of modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub default_mode_id: Option<ModeId>,
}

impl Collection {
    pub fn new(id: impl Into<CollectionId>, name: impl Into<String>, modes: Vec<Mode>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            modes,
            default_mode_id: None,
        }
    }

    pub fn with_default_mode(mut self, mode_id: impl Into<ModeId>) -> Self {
        self.default_mode_id = Some(mode_id.into());
        self
    }

    /// Mode whose value is displayed: the default mode, else the first mode.
    pub fn display_mode_id(&self) -> Option<&str> {
        self.default_mode_id
            .as_deref()
            .or_else(|| self.modes.first().map(|mode| mode.mode_id.as_str()))
    }
}

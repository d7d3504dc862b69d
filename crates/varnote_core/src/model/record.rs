//! Display records sent across the capability boundary.
//!
//! # Responsibility
//! - Define the resolved, display-ready shape of one variable.
//! - Keep `ValueInfo` an exhaustive tagged union.
//!
//! # Invariants
//! - `ValueInfo` tag is determined by alias-ness of the raw value first, then
//!   by the variable resolved type.
//! - `Reference::resolved_hex` is only set for COLOR targets.

use crate::model::variable::{CollectionId, ResolvedType, VariableId};
use serde::{Deserialize, Serialize};

/// Collection label used when a variable's collection cannot be found.
pub const UNKNOWN_COLLECTION_NAME: &str = "Unknown";

/// RGB color payload carried by `ValueInfo::Color`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Resolved display value for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ValueInfo {
    Color {
        value: Rgb,
        hex: String,
    },
    Reference {
        /// Name of the referenced variable.
        value: String,
        reference_id: VariableId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resolved_hex: Option<String>,
    },
    Number {
        value: f64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool,
    },
}

impl ValueInfo {
    /// Wire tag of this value (`color|reference|number|string|boolean`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Color { .. } => "color",
            Self::Reference { .. } => "reference",
            Self::Number { .. } => "number",
            Self::String { .. } => "string",
            Self::Boolean { .. } => "boolean",
        }
    }
}

/// Display-ready variable row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub id: VariableId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub resolved_type: ResolvedType,
    pub collection_id: CollectionId,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_info: Option<ValueInfo>,
}

impl DisplayRecord {
    /// Collection label for display, falling back to `Unknown`.
    pub fn collection_label(&self) -> &str {
        match self.collection_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_COLLECTION_NAME,
        }
    }
}

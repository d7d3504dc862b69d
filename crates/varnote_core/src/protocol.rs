//! Message protocol between the presentation layer and the host controller.
//!
//! # Responsibility
//! - Define typed command/result messages and their JSON wire shape.
//! - Encode/decode for hosts that relay messages as text.
//!
//! # Invariants
//! - Every message carries a `type` discriminator in SCREAMING_SNAKE_CASE.
//! - Optional fields are omitted when absent, so peers without request
//!   correlation interoperate.

use crate::model::record::DisplayRecord;
use crate::model::variable::VariableId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Monotonic id correlating a load request with its response.
pub type RequestId = u64;

/// Presentation -> controller commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum UiCommand {
    LoadVariables {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    UpdateDescription {
        variable_id: VariableId,
        description: String,
    },
    ClosePlugin,
}

impl UiCommand {
    /// Load request without correlation id.
    pub fn load() -> Self {
        Self::LoadVariables { request_id: None }
    }
}

/// Controller -> presentation messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum HostMessage {
    VariablesLoaded {
        variables: Vec<DisplayRecord>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_debug_mode: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    UpdateSuccess {
        variable_id: VariableId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Error {
        message: String,
    },
}

impl HostMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Stable wire label of this message, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::VariablesLoaded { .. } => "VARIABLES_LOADED",
            Self::UpdateSuccess { .. } => "UPDATE_SUCCESS",
            Self::Error { .. } => "ERROR",
        }
    }
}

/// Wire encode/decode errors.
#[derive(Debug)]
pub enum ProtocolError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode message: {err}"),
            Self::Decode(err) => write!(f, "failed to decode message: {err}"),
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
        }
    }
}

/// Encodes one message as JSON text.
pub fn encode<T: Serialize>(message: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}

/// Decodes one message from JSON text.
pub fn decode<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

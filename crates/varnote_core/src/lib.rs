//! Core logic for the varnote design-variable description editor.
//! This crate owns the message protocol, value resolution and the headless
//! presentation state; the host store and widget toolkit stay outside.

pub mod channel;
pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod protocol;
pub mod resolve;
pub mod store;

pub use channel::{MessageChannel, PluginBridge, Subscription, SubscriptionId};
pub use config::{ConfigError, PluginConfig};
pub use controller::{
    sample_records, UiOptions, VariablesController, LOAD_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{DisplayRecord, Rgb, ValueInfo};
pub use model::variable::{
    Collection, CollectionId, Mode, ModeId, RawValue, ResolvedType, Rgba, Variable, VariableId,
};
pub use presentation::cell::{value_cell, Tone, ValueCell};
pub use presentation::editable::{EditKey, EditableCell};
pub use presentation::state::{Applied, PresentationState};
pub use presentation::surface::PresentationSurface;
pub use presentation::table::{locale_compare, RowView, SortColumn, SortDirection, VariableTable};
pub use protocol::{decode, encode, HostMessage, ProtocolError, RequestId, UiCommand};
pub use resolve::{color_hex, format_number, hex_of, ValueResolver};
pub use store::memory::{DocumentSnapshot, MemoryVariableStore};
pub use store::{StoreError, StoreResult, VariableStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Headless presentation layer.
//!
//! # Responsibility
//! - Keep the record list, table view and inline edit cells for one surface.
//! - Turn user interactions into protocol commands.
//!
//! # Invariants
//! - The presentation never touches the variable store; every change goes
//!   through a `UiCommand` over the bridge.
//! - Rendering toolkits consume `RowView`/`ValueCell`; no widget code lives here.

pub mod cell;
pub mod editable;
pub mod state;
pub mod surface;
pub mod table;

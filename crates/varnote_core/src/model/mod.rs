//! Domain model for host variables and their display records.
//!
//! # Responsibility
//! - Define host-side snapshots (`Variable`, `Collection`, `RawValue`).
//! - Define presentation-side records (`DisplayRecord`, `ValueInfo`).
//!
//! # Invariants
//! - Snapshots are fetched fresh on each load and never cached.
//! - Only `Variable::description` is ever mutated by this plugin.

pub mod record;
pub mod variable;

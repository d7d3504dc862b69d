//! Host variable store contracts.
//!
//! # Responsibility
//! - Define the asynchronous data-source boundary owned by the host.
//! - Provide an in-memory implementation for tests, demos and debug hosts.
//!
//! # Invariants
//! - Store calls are awaited without timeout or cancellation.
//! - Description writes are point mutations; no multi-variable transaction.

pub mod memory;

use crate::model::variable::{Collection, RawValue, Variable};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store transport and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Variable id is unknown to the store.
    NotFound(String),
    /// Store is unreachable or refused the call.
    Unavailable(String),
    /// Host backend raised an error while serving the call.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "variable not found: {id}"),
            Self::Unavailable(message) => write!(f, "variable store unavailable: {message}"),
            Self::Backend(message) => write!(f, "variable store error: {message}"),
        }
    }
}

impl Error for StoreError {}

/// Asynchronous variable store exposed by the host document.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Lists every local variable in the document.
    async fn list_variables(&self) -> StoreResult<Vec<Variable>>;

    /// Lists every local variable collection in the document.
    async fn list_collections(&self) -> StoreResult<Vec<Collection>>;

    /// Gets one variable by id, `None` when the id is unknown.
    async fn get_variable(&self, id: &str) -> StoreResult<Option<Variable>>;

    /// Persists a new description for one variable.
    async fn set_description(&self, id: &str, description: &str) -> StoreResult<()>;

    /// Resolves a variable's value the way a rendering consumer would see it.
    ///
    /// The host may follow aliases across modes and collections. Stores
    /// without a consumer context return `Ok(None)`.
    async fn resolve_for_consumer(&self, _id: &str) -> StoreResult<Option<RawValue>> {
        Ok(None)
    }
}

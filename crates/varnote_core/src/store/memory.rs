//! In-memory variable store.
//!
//! Holds one document snapshot behind a mutex. Used by tests, by the CLI
//! probe and by hosts that hand over a JSON document instead of a live API.

use crate::model::variable::{
    Collection, CollectionId, Mode, ModeId, RawValue, ResolvedType, Variable, VariableId,
};
use crate::store::{StoreError, StoreResult, VariableStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const VARIABLE_ID_PREFIX: &str = "VariableID:";
const COLLECTION_ID_PREFIX: &str = "VariableCollectionId:";

/// Serializable document snapshot accepted by `MemoryVariableStore::from_json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

/// Mutex-guarded in-memory store for one document.
#[derive(Debug, Default)]
pub struct MemoryVariableStore {
    state: Mutex<DocumentSnapshot>,
    consumer_resolution: bool,
}

impl MemoryVariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from an existing snapshot.
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            consumer_resolution: false,
        }
    }

    /// Parses a JSON document snapshot.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let snapshot = serde_json::from_str::<DocumentSnapshot>(text)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Enables consumer-context resolution, which follows alias chains.
    pub fn with_consumer_resolution(mut self, enabled: bool) -> Self {
        self.consumer_resolution = enabled;
        self
    }

    /// Creates a collection with generated id; the first mode is the default.
    pub fn create_collection(
        &self,
        name: impl Into<String>,
        mode_names: &[&str],
    ) -> StoreResult<CollectionId> {
        let id = format!("{COLLECTION_ID_PREFIX}{}", Uuid::new_v4());
        let modes = mode_names
            .iter()
            .map(|mode_name| Mode::new(format!("{id}/{mode_name}"), *mode_name))
            .collect::<Vec<_>>();
        let mut collection = Collection::new(id.clone(), name, modes);
        collection.default_mode_id = collection.modes.first().map(|mode| mode.mode_id.clone());
        self.insert_collection(collection)?;
        Ok(id)
    }

    /// Creates a variable with generated id inside an existing collection.
    pub fn create_variable(
        &self,
        name: impl Into<String>,
        collection_id: &str,
        resolved_type: ResolvedType,
    ) -> StoreResult<VariableId> {
        let id = format!("{VARIABLE_ID_PREFIX}{}", Uuid::new_v4());
        let mut state = self.lock()?;
        if !state.collections.iter().any(|c| c.id == collection_id) {
            return Err(StoreError::Backend(format!(
                "collection not found: {collection_id}"
            )));
        }
        state.variables.push(Variable::new(
            id.clone(),
            name,
            resolved_type,
            collection_id,
        ));
        Ok(id)
    }

    /// Inserts a collection with a caller-provided id.
    pub fn insert_collection(&self, collection: Collection) -> StoreResult<()> {
        let mut state = self.lock()?;
        if state.collections.iter().any(|c| c.id == collection.id) {
            return Err(StoreError::Backend(format!(
                "collection id already exists: {}",
                collection.id
            )));
        }
        state.collections.push(collection);
        Ok(())
    }

    /// Inserts a variable with a caller-provided id.
    pub fn insert_variable(&self, variable: Variable) -> StoreResult<()> {
        let mut state = self.lock()?;
        if state.variables.iter().any(|v| v.id == variable.id) {
            return Err(StoreError::Backend(format!(
                "variable id already exists: {}",
                variable.id
            )));
        }
        state.variables.push(variable);
        Ok(())
    }

    /// Stores a raw value for one mode of a variable.
    pub fn set_value_for_mode(
        &self,
        variable_id: &str,
        mode_id: impl Into<ModeId>,
        value: RawValue,
    ) -> StoreResult<()> {
        let mut state = self.lock()?;
        let variable = state
            .variables
            .iter_mut()
            .find(|v| v.id == variable_id)
            .ok_or_else(|| StoreError::NotFound(variable_id.to_string()))?;
        variable.values_by_mode.insert(mode_id.into(), value);
        Ok(())
    }

    /// Returns a copy of the current document.
    pub fn snapshot(&self) -> StoreResult<DocumentSnapshot> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, DocumentSnapshot>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl VariableStore for MemoryVariableStore {
    async fn list_variables(&self) -> StoreResult<Vec<Variable>> {
        Ok(self.lock()?.variables.clone())
    }

    async fn list_collections(&self) -> StoreResult<Vec<Collection>> {
        Ok(self.lock()?.collections.clone())
    }

    async fn get_variable(&self, id: &str) -> StoreResult<Option<Variable>> {
        Ok(self.lock()?.variables.iter().find(|v| v.id == id).cloned())
    }

    async fn set_description(&self, id: &str, description: &str) -> StoreResult<()> {
        let mut state = self.lock()?;
        let variable = state
            .variables
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        variable.description = description.to_string();
        Ok(())
    }

    async fn resolve_for_consumer(&self, id: &str) -> StoreResult<Option<RawValue>> {
        if !self.consumer_resolution {
            return Ok(None);
        }
        let state = self.lock()?;
        Ok(resolve_chain(&state, id))
    }
}

/// Follows alias hops in display modes until a literal, a cycle or a gap.
fn resolve_chain(state: &DocumentSnapshot, id: &str) -> Option<RawValue> {
    let mut visited = BTreeSet::new();
    let mut current = id.to_string();
    loop {
        if !visited.insert(current.clone()) {
            return None;
        }
        let variable = state.variables.iter().find(|v| v.id == current)?;
        let collection = state
            .collections
            .iter()
            .find(|c| c.id == variable.collection_id)?;
        let value = variable.value_for_mode(collection.display_mode_id()?)?;
        match value {
            RawValue::Alias { id } => current = id.clone(),
            literal => return Some(literal.clone()),
        }
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use varnote_core::{
    Collection, MemoryVariableStore, Mode, RawValue, ResolvedType, StoreError, StoreResult,
    Variable, VariableStore,
};

/// Two collections: single-mode primitives and a light/dark theme whose
/// default mode is `dark`.
pub fn theme_store() -> MemoryVariableStore {
    let store = MemoryVariableStore::new();
    store
        .insert_collection(
            Collection::new("c-prim", "Primitives", vec![Mode::new("m-default", "Default")])
                .with_default_mode("m-default"),
        )
        .unwrap();
    store
        .insert_collection(
            Collection::new(
                "c-theme",
                "Theme",
                vec![Mode::new("light", "Light"), Mode::new("dark", "Dark")],
            )
            .with_default_mode("dark"),
        )
        .unwrap();

    let variables = [
        Variable::new("v-red", "color/red", ResolvedType::Color, "c-prim")
            .with_value("m-default", RawValue::color(1.0, 0.0, 0.0)),
        Variable::new("v-blue", "color/blue", ResolvedType::Color, "c-prim")
            .with_value("m-default", RawValue::color(0.2, 0.5, 1.0))
            .with_description("Brand blue"),
        Variable::new("v-space", "spacing/base", ResolvedType::Float, "c-prim")
            .with_value("m-default", RawValue::float(8.0)),
        Variable::new("v-font", "font/family", ResolvedType::String, "c-prim")
            .with_value("m-default", RawValue::string("Inter")),
        Variable::new("v-flag", "feature/enabled", ResolvedType::Boolean, "c-prim")
            .with_value("m-default", RawValue::boolean(true)),
        Variable::new("v-accent", "semantic/accent", ResolvedType::Color, "c-theme")
            .with_value("light", RawValue::alias("v-red"))
            .with_value("dark", RawValue::alias("v-blue")),
        Variable::new("v-gap", "semantic/gap", ResolvedType::Float, "c-theme")
            .with_value("dark", RawValue::alias("v-space")),
        Variable::new("v-unset", "semantic/unset", ResolvedType::String, "c-theme")
            .with_value("light", RawValue::string("only light")),
        Variable::new("v-link", "semantic/link", ResolvedType::Color, "c-theme")
            .with_value("dark", RawValue::alias("v-accent")),
    ];
    for variable in variables {
        store.insert_variable(variable).unwrap();
    }
    store
}

/// Store wrapper that fails selected operations.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryVariableStore,
    pub fail_list: bool,
    pub fail_lookup: bool,
    pub fail_write: bool,
    pub fail_consumer: bool,
}

impl FlakyStore {
    pub fn new(inner: MemoryVariableStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }
}

#[async_trait]
impl VariableStore for FlakyStore {
    async fn list_variables(&self) -> StoreResult<Vec<Variable>> {
        if self.fail_list {
            return Err(StoreError::Unavailable("document closed".to_string()));
        }
        self.inner.list_variables().await
    }

    async fn list_collections(&self) -> StoreResult<Vec<Collection>> {
        if self.fail_list {
            return Err(StoreError::Unavailable("document closed".to_string()));
        }
        self.inner.list_collections().await
    }

    async fn get_variable(&self, id: &str) -> StoreResult<Option<Variable>> {
        if self.fail_lookup {
            return Err(StoreError::Backend("lookup failed".to_string()));
        }
        self.inner.get_variable(id).await
    }

    async fn set_description(&self, id: &str, description: &str) -> StoreResult<()> {
        if self.fail_write {
            return Err(StoreError::Backend("read-only document".to_string()));
        }
        self.inner.set_description(id, description).await
    }

    async fn resolve_for_consumer(&self, id: &str) -> StoreResult<Option<RawValue>> {
        if self.fail_consumer {
            return Err(StoreError::Backend("no consumer context".to_string()));
        }
        self.inner.resolve_for_consumer(id).await
    }
}

mod common;

use common::{theme_store, FlakyStore};
use futures::executor::block_on;
use varnote_core::{
    ConfigError, HostMessage, MemoryVariableStore, PluginConfig, UiCommand, VariableStore,
    VariablesController, UPDATE_FAILED_MESSAGE,
};

#[test]
fn update_writes_store_and_echoes_description() {
    let controller = VariablesController::new(theme_store());
    let message = block_on(controller.update_description("v-red", "Error states"));
    assert_eq!(
        message,
        Some(HostMessage::UpdateSuccess {
            variable_id: "v-red".to_string(),
            description: Some("Error states".to_string()),
        })
    );
    let stored = block_on(controller.store().get_variable("v-red"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.description, "Error states");
}

#[test]
fn sequential_edits_then_reload_keep_last_write() {
    let controller = VariablesController::new(theme_store());
    block_on(controller.update_description("v-font", "first")).unwrap();
    block_on(controller.update_description("v-font", "second")).unwrap();
    block_on(controller.update_description("v-flag", "other variable")).unwrap();

    match block_on(controller.load(None)) {
        HostMessage::VariablesLoaded { variables, .. } => {
            let font = variables.iter().find(|r| r.id == "v-font").unwrap();
            assert_eq!(font.description, "second");
            let flag = variables.iter().find(|r| r.id == "v-flag").unwrap();
            assert_eq!(flag.description, "other variable");
        }
        other => panic!("unexpected message {other:?}"),
    }
}

#[test]
fn sample_update_skips_store_and_succeeds() {
    let mut store = FlakyStore::new(MemoryVariableStore::new());
    store.fail_lookup = true;
    store.fail_write = true;
    let controller = VariablesController::new(store);

    let message = block_on(controller.update_description("sample-1", "anything"));
    assert_eq!(
        message,
        Some(HostMessage::UpdateSuccess {
            variable_id: "sample-1".to_string(),
            description: None,
        })
    );
}

#[test]
fn unknown_variable_is_silently_dropped() {
    let controller = VariablesController::new(theme_store());
    assert_eq!(
        block_on(controller.update_description("VariableID:404", "lost")),
        None
    );
}

#[test]
fn write_failure_emits_error() {
    let mut store = FlakyStore::new(theme_store());
    store.fail_write = true;
    let controller = VariablesController::new(store);
    assert_eq!(
        block_on(controller.update_description("v-red", "x")),
        Some(HostMessage::error(UPDATE_FAILED_MESSAGE))
    );
}

#[test]
fn lookup_failure_emits_error() {
    let mut store = FlakyStore::new(theme_store());
    store.fail_lookup = true;
    let controller = VariablesController::new(store);
    assert_eq!(
        block_on(controller.update_description("v-red", "x")),
        Some(HostMessage::error(UPDATE_FAILED_MESSAGE))
    );
}

#[test]
fn close_stops_handling_commands() {
    let mut controller = VariablesController::new(theme_store());
    assert_eq!(block_on(controller.handle(UiCommand::ClosePlugin)), None);
    assert!(controller.is_closed());
    assert_eq!(block_on(controller.handle(UiCommand::load())), None);
}

#[test]
fn handle_dispatches_update_commands() {
    let mut controller = VariablesController::new(theme_store());
    let message = block_on(controller.handle(UiCommand::UpdateDescription {
        variable_id: "v-space".to_string(),
        description: "Base grid".to_string(),
    }));
    assert!(matches!(message, Some(HostMessage::UpdateSuccess { .. })));
}

#[test]
fn empty_sample_prefix_is_rejected() {
    let config = PluginConfig {
        sample_id_prefix: String::new(),
        ..PluginConfig::default()
    };
    let result = VariablesController::with_config(theme_store(), config);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn custom_sample_prefix_still_writes_real_variables() {
    let config = PluginConfig {
        sample_id_prefix: "demo-".to_string(),
        ..PluginConfig::default()
    };
    let controller = VariablesController::with_config(theme_store(), config).unwrap();

    let skipped = block_on(controller.update_description("demo-1", "ignored"));
    assert_eq!(
        skipped,
        Some(HostMessage::UpdateSuccess {
            variable_id: "demo-1".to_string(),
            description: None,
        })
    );

    block_on(controller.update_description("v-red", "written"));
    let stored = block_on(controller.store().get_variable("v-red"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.description, "written");
}

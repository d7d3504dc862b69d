//! CLI smoke probe.
//!
//! # Responsibility
//! - Verify `varnote_core` linkage without a host application.
//! - Apply `VARNOTE_*` options and start rolling logs like a host would.
//! - Print one deterministic load against an empty document.

use futures::executor::block_on;
use varnote_core::{encode, MemoryVariableStore, PluginConfig, VariablesController};

fn main() {
    println!("varnote_core version={}", varnote_core::core_version());

    let config = match PluginConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config rejected, using defaults: {err}");
            PluginConfig::default()
        }
    };
    if let Err(err) = config.start_logging() {
        eprintln!("{err}");
    }
    println!(
        "log_level={} log_dir={}",
        config.log_level,
        config.log_dir_or_default().display()
    );

    // Empty document: the controller answers with the debug sample set.
    let controller = match VariablesController::with_config(MemoryVariableStore::new(), config) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    let options = controller.ui_options();
    println!("ui={}x{}", options.width, options.height);

    let message = block_on(controller.load(None));
    match encode(&message) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("encode failed: {err}"),
    }
}

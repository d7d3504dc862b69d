//! Host-side controller.
//!
//! # Responsibility
//! - Serve presentation commands against the host variable store.
//! - Map variables to display records and emit typed result messages.
//!
//! # Invariants
//! - Records are fetched fresh per load; nothing is cached across loads.
//! - An empty store yields the fixed sample set with `isDebugMode = true`;
//!   a non-empty store never sets the flag.
//! - Sample ids never reach the store on update.
//! - Failures become generic `ERROR` messages; nothing is retried.
//! - Logs carry metadata only, never description text.

use crate::channel::{MessageChannel, Subscription};
use crate::config::{ConfigError, PluginConfig};
use crate::model::record::{DisplayRecord, Rgb, ValueInfo, UNKNOWN_COLLECTION_NAME};
use crate::model::variable::{Collection, CollectionId, ResolvedType};
use crate::protocol::{HostMessage, RequestId, UiCommand};
use crate::resolve::{hex_of, ValueResolver};
use crate::store::{StoreResult, VariableStore};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::time::Duration;

/// `ERROR` text emitted when loading fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load variables";
/// `ERROR` text emitted when a description write fails.
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update description";

const SAMPLE_COLLECTION_ID: &str = "collection-1";
const SAMPLE_COLLECTION_NAME: &str = "Sample";

/// Size of the plugin UI surface requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub width: u32,
    pub height: u32,
}

/// Controller owning one store handle for one plugin session.
pub struct VariablesController<S: VariableStore> {
    store: S,
    config: PluginConfig,
    closed: bool,
}

impl<S: VariableStore> VariablesController<S> {
    /// Creates a controller with default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: PluginConfig::default(),
            closed: false,
        }
    }

    /// Creates a controller with host-provided options.
    ///
    /// # Errors
    /// - `config` fails `PluginConfig::validate`.
    pub fn with_config(store: S, config: PluginConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            closed: false,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Whether `CLOSE_PLUGIN` has been handled.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn ui_options(&self) -> UiOptions {
        UiOptions {
            width: self.config.ui_width,
            height: self.config.ui_height,
        }
    }

    /// Automatic first load issued by the host after the UI is shown.
    pub fn startup_load(&self) -> (Duration, UiCommand) {
        (self.config.initial_load_delay(), UiCommand::load())
    }

    /// Loads every variable as a display record.
    ///
    /// Never fails: fetch errors become `ERROR { "Failed to load variables" }`.
    pub async fn load(&self, request_id: Option<RequestId>) -> HostMessage {
        match self.load_records().await {
            Ok(records) if records.is_empty() => {
                info!("event=variables_loaded module=controller status=ok count=0 debug_mode=true");
                HostMessage::VariablesLoaded {
                    variables: sample_records(&self.config.sample_id_prefix),
                    is_debug_mode: Some(true),
                    request_id,
                }
            }
            Ok(records) => {
                info!(
                    "event=variables_loaded module=controller status=ok count={} debug_mode=false",
                    records.len()
                );
                HostMessage::VariablesLoaded {
                    variables: records,
                    is_debug_mode: None,
                    request_id,
                }
            }
            Err(err) => {
                error!("event=variables_loaded module=controller status=error error={err}");
                HostMessage::error(LOAD_FAILED_MESSAGE)
            }
        }
    }

    async fn load_records(&self) -> StoreResult<Vec<DisplayRecord>> {
        let variables = self.store.list_variables().await?;
        let collections = self
            .store
            .list_collections()
            .await?
            .into_iter()
            .map(|collection| (collection.id.clone(), collection))
            .collect::<HashMap<CollectionId, Collection>>();
        let resolver = ValueResolver::new(&self.store, &collections);

        let mut records = Vec::with_capacity(variables.len());
        for variable in &variables {
            let value_info = resolver.resolve(variable).await?;
            let collection_name = collections
                .get(&variable.collection_id)
                .map(|collection| collection.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_COLLECTION_NAME.to_string());
            records.push(DisplayRecord {
                id: variable.id.clone(),
                name: variable.name.clone(),
                description: variable.description.clone(),
                resolved_type: variable.resolved_type,
                collection_id: variable.collection_id.clone(),
                collection_name: Some(collection_name),
                value_info,
            });
        }
        Ok(records)
    }

    /// Writes one description.
    ///
    /// Returns `None` when the variable id is unknown to the store: no
    /// success and no error is emitted for that case.
    pub async fn update_description(
        &self,
        variable_id: &str,
        description: &str,
    ) -> Option<HostMessage> {
        if self.config.is_sample_id(variable_id) {
            info!(
                "event=description_updated module=controller status=skipped reason=sample variable_id={variable_id}"
            );
            return Some(HostMessage::UpdateSuccess {
                variable_id: variable_id.to_string(),
                description: None,
            });
        }

        match self.store.get_variable(variable_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(
                    "event=description_updated module=controller status=dropped reason=unknown_variable variable_id={variable_id}"
                );
                return None;
            }
            Err(err) => {
                error!(
                    "event=description_updated module=controller status=error variable_id={variable_id} error={err}"
                );
                return Some(HostMessage::error(UPDATE_FAILED_MESSAGE));
            }
        }

        match self.store.set_description(variable_id, description).await {
            Ok(()) => {
                info!(
                    "event=description_updated module=controller status=ok variable_id={} len={}",
                    variable_id,
                    description.chars().count()
                );
                Some(HostMessage::UpdateSuccess {
                    variable_id: variable_id.to_string(),
                    description: Some(description.to_string()),
                })
            }
            Err(err) => {
                error!(
                    "event=description_updated module=controller status=error variable_id={variable_id} error={err}"
                );
                Some(HostMessage::error(UPDATE_FAILED_MESSAGE))
            }
        }
    }

    /// Dispatches one command; returns the response to publish, if any.
    pub async fn handle(&mut self, command: UiCommand) -> Option<HostMessage> {
        if self.closed {
            debug!("event=command_ignored module=controller reason=closed");
            return None;
        }
        match command {
            UiCommand::LoadVariables { request_id } => Some(self.load(request_id).await),
            UiCommand::UpdateDescription {
                variable_id,
                description,
            } => self.update_description(&variable_id, &description).await,
            UiCommand::ClosePlugin => {
                info!("event=plugin_close module=controller status=ok");
                self.closed = true;
                None
            }
        }
    }

    /// Serves only the commands already queued, without waiting for more.
    ///
    /// Lets a cooperative host drive the controller from its own event loop.
    /// Returns the number of messages published.
    pub async fn serve_pending(
        &mut self,
        commands: &mut Subscription<UiCommand>,
        outbound: &MessageChannel<HostMessage>,
    ) -> usize {
        let mut sent = 0;
        for command in commands.drain() {
            if let Some(message) = self.handle(command).await {
                outbound.publish(message);
                sent += 1;
            }
        }
        sent
    }

    /// Serves commands until `CLOSE_PLUGIN` or until the inbound stream ends.
    pub async fn run(
        &mut self,
        commands: &mut Subscription<UiCommand>,
        outbound: &MessageChannel<HostMessage>,
    ) {
        while let Some(command) = commands.recv().await {
            if let Some(message) = self.handle(command).await {
                let kind = message.kind();
                let reached = outbound.publish(message);
                debug!("event=message_sent module=controller kind={kind} subscribers={reached}");
            }
            if self.closed {
                break;
            }
        }
    }
}

/// Deterministic records shown when the document has no variables.
pub fn sample_records(id_prefix: &str) -> Vec<DisplayRecord> {
    let sample = |index: u32, name: &str, description: &str, resolved_type, value_info| {
        DisplayRecord {
            id: format!("{id_prefix}{index}"),
            name: name.to_string(),
            description: description.to_string(),
            resolved_type,
            collection_id: SAMPLE_COLLECTION_ID.to_string(),
            collection_name: Some(SAMPLE_COLLECTION_NAME.to_string()),
            value_info: Some(value_info),
        }
    };

    vec![
        sample(
            1,
            "color/primary",
            "Primary color",
            ResolvedType::Color,
            ValueInfo::Color {
                value: Rgb {
                    r: 0.2,
                    g: 0.5,
                    b: 1.0,
                },
                hex: hex_of(0.2, 0.5, 1.0),
            },
        ),
        sample(
            2,
            "spacing/small",
            "Small spacing",
            ResolvedType::Float,
            ValueInfo::Number { value: 8.0 },
        ),
        sample(
            3,
            "text/heading",
            "",
            ResolvedType::String,
            ValueInfo::String {
                value: "Heading".to_string(),
            },
        ),
    ]
}

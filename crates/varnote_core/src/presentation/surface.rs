//! Mounted presentation surface.
//!
//! Ties record state, table view and edit cells to one bridge subscription.
//! Each surface owns its own subscription, so several surfaces (or test
//! harnesses) can share a bridge without replacing each other's handler.

use crate::channel::{PluginBridge, Subscription};
use crate::model::variable::VariableId;
use crate::presentation::editable::{EditKey, EditableCell};
use crate::presentation::state::{Applied, PresentationState};
use crate::presentation::table::{RowView, VariableTable};
use crate::protocol::{HostMessage, UiCommand};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

pub struct PresentationSurface {
    bridge: Arc<PluginBridge>,
    subscription: Option<Subscription<HostMessage>>,
    state: PresentationState,
    table: VariableTable,
    cells: HashMap<VariableId, EditableCell>,
}

impl PresentationSurface {
    pub fn new(bridge: Arc<PluginBridge>) -> Self {
        Self {
            bridge,
            subscription: None,
            state: PresentationState::new(),
            table: VariableTable::new(),
            cells: HashMap::new(),
        }
    }

    /// Subscribes to controller messages and requests the first load.
    pub fn mount(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.bridge.messages.subscribe());
        }
        self.reload();
    }

    /// Drops this surface's subscription; other surfaces are unaffected.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.bridge.messages.unsubscribe(subscription.id());
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Sends a correlated load request.
    pub fn reload(&mut self) {
        let command = self.state.request_load();
        self.send(command);
    }

    /// Sends `CLOSE_PLUGIN` and unmounts.
    pub fn close(&mut self) {
        self.send(UiCommand::ClosePlugin);
        self.unmount();
    }

    /// Applies every message already delivered to this surface.
    ///
    /// Returns how many messages changed state.
    pub fn pump(&mut self) -> usize {
        let messages = match self.subscription.as_mut() {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };
        let mut updated = 0;
        for message in messages {
            if self.receive(message) == Applied::Updated {
                updated += 1;
            }
        }
        updated
    }

    /// Applies one controller message and refreshes the edit cells.
    pub fn receive(&mut self, message: HostMessage) -> Applied {
        let applied = self.state.apply(message);
        if applied == Applied::Updated {
            self.sync_cells();
        }
        applied
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn table(&self) -> &VariableTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut VariableTable {
        &mut self.table
    }

    pub fn cell(&self, variable_id: &str) -> Option<&EditableCell> {
        self.cells.get(variable_id)
    }

    /// Visible rows; the description column shows each cell's draft.
    pub fn rows(&self) -> Vec<RowView> {
        let mut rows = self.table.view_rows(self.state.records());
        for row in &mut rows {
            if let Some(cell) = self.cells.get(&row.variable_id) {
                row.description = cell.draft().to_string();
            }
        }
        rows
    }

    pub fn focus_description(&mut self, variable_id: &str) {
        if let Some(cell) = self.cells.get_mut(variable_id) {
            cell.focus();
        }
    }

    pub fn type_description(&mut self, variable_id: &str, text: &str) {
        if let Some(cell) = self.cells.get_mut(variable_id) {
            cell.input(text);
        }
    }

    /// Leaves a description field; returns whether a save was sent.
    pub fn blur_description(&mut self, variable_id: &str) -> bool {
        let command = self.cells.get_mut(variable_id).and_then(EditableCell::blur);
        self.commit(command)
    }

    /// Handles a key inside a description field; returns whether a save was sent.
    pub fn press_key(&mut self, variable_id: &str, key: EditKey) -> bool {
        let command = self
            .cells
            .get_mut(variable_id)
            .and_then(|cell| cell.key(key));
        self.commit(command)
    }

    fn commit(&mut self, command: Option<UiCommand>) -> bool {
        let Some(UiCommand::UpdateDescription {
            variable_id,
            description,
        }) = command
        else {
            return false;
        };
        let command = self.state.commit_description(&variable_id, &description);
        self.send(command);
        true
    }

    fn send(&self, command: UiCommand) {
        let reached = self.bridge.commands.publish(command);
        if reached == 0 {
            debug!("event=command_unrouted module=presentation reason=no_controller");
        }
    }

    fn sync_cells(&mut self) {
        let records = self.state.records();
        self.cells
            .retain(|id, _| records.iter().any(|record| &record.id == id));
        for record in records {
            self.cells
                .entry(record.id.clone())
                .or_insert_with(|| EditableCell::new(record.id.clone(), record.description.clone()))
                .set_value(record.description.clone());
        }
    }
}

impl Drop for PresentationSurface {
    fn drop(&mut self) {
        self.unmount();
    }
}

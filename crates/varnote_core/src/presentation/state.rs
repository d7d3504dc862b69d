//! Presentation-side record state.
//!
//! # Responsibility
//! - Hold the loaded records, loading/debug flags and the last error.
//! - Apply controller messages and track optimistic description edits.
//!
//! # Invariants
//! - `VARIABLES_LOADED` replaces the whole record list and clears loading.
//! - A load response older than the newest issued load request is dropped.
//! - `ERROR` always clears loading and rolls back pending optimistic edits.
//! - `UPDATE_SUCCESS` commits a pending edit and patches one record, even
//!   when an unrelated `ERROR` already rolled that edit back.

use crate::model::record::DisplayRecord;
use crate::model::variable::VariableId;
use crate::protocol::{HostMessage, RequestId, UiCommand};
use log::debug;
use std::collections::HashMap;

/// Optimistic description awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEdit {
    /// Stored description to restore on failure.
    previous: String,
    optimistic: String,
}

/// Outcome of applying one controller message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// State changed; the surface should re-render.
    Updated,
    /// Stale or irrelevant message; state untouched.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct PresentationState {
    loading: bool,
    records: Vec<DisplayRecord>,
    is_debug_mode: bool,
    last_error: Option<String>,
    latest_load_request: RequestId,
    pending_edits: HashMap<VariableId, PendingEdit>,
    /// Optimistic text of edits rolled back before their outcome arrived.
    rolled_back: HashMap<VariableId, String>,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            loading: true,
            records: Vec::new(),
            is_debug_mode: false,
            last_error: None,
            latest_load_request: 0,
            pending_edits: HashMap::new(),
            rolled_back: HashMap::new(),
        }
    }
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn record(&self, variable_id: &str) -> Option<&DisplayRecord> {
        self.records.iter().find(|record| record.id == variable_id)
    }

    pub fn is_debug_mode(&self) -> bool {
        self.is_debug_mode
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn pending_edit_count(&self) -> usize {
        self.pending_edits.len()
    }

    /// Issues a load command tagged with the next request id.
    pub fn request_load(&mut self) -> UiCommand {
        self.latest_load_request += 1;
        UiCommand::LoadVariables {
            request_id: Some(self.latest_load_request),
        }
    }

    /// Records an optimistic edit and returns the command persisting it.
    pub fn commit_description(&mut self, variable_id: &str, description: &str) -> UiCommand {
        self.rolled_back.remove(variable_id);
        if let Some(record) = self.records.iter_mut().find(|r| r.id == variable_id) {
            let previous = self
                .pending_edits
                .get(variable_id)
                .map(|pending| pending.previous.clone())
                .unwrap_or_else(|| record.description.clone());
            self.pending_edits.insert(
                variable_id.to_string(),
                PendingEdit {
                    previous,
                    optimistic: description.to_string(),
                },
            );
            record.description = description.to_string();
        }
        UiCommand::UpdateDescription {
            variable_id: variable_id.to_string(),
            description: description.to_string(),
        }
    }

    /// Applies one controller message.
    pub fn apply(&mut self, message: HostMessage) -> Applied {
        match message {
            HostMessage::VariablesLoaded {
                variables,
                is_debug_mode,
                request_id,
            } => {
                if let Some(request_id) = request_id {
                    if request_id < self.latest_load_request {
                        debug!(
                            "event=load_response_dropped module=presentation request_id={} latest={}",
                            request_id, self.latest_load_request
                        );
                        return Applied::Ignored;
                    }
                }
                self.records = variables;
                self.is_debug_mode = is_debug_mode.unwrap_or(false);
                self.loading = false;
                self.last_error = None;
                self.overlay_pending_edits();
                Applied::Updated
            }
            HostMessage::UpdateSuccess {
                variable_id,
                description,
            } => {
                let pending = self.pending_edits.remove(&variable_id);
                let rolled_back = self.rolled_back.remove(&variable_id);
                let confirmed = description
                    .or_else(|| pending.map(|edit| edit.optimistic))
                    .or(rolled_back);
                match (confirmed, self.records.iter_mut().find(|r| r.id == variable_id)) {
                    (Some(description), Some(record)) => {
                        record.description = description;
                        Applied::Updated
                    }
                    _ => Applied::Ignored,
                }
            }
            HostMessage::Error { message } => {
                self.loading = false;
                self.last_error = Some(message);
                self.rollback_pending_edits();
                Applied::Updated
            }
        }
    }

    /// Keeps unconfirmed edits visible across a reload that raced them.
    fn overlay_pending_edits(&mut self) {
        for record in &mut self.records {
            if let Some(pending) = self.pending_edits.get_mut(&record.id) {
                pending.previous = record.description.clone();
                record.description = pending.optimistic.clone();
            }
        }
    }

    fn rollback_pending_edits(&mut self) {
        for (variable_id, pending) in self.pending_edits.drain() {
            if let Some(record) = self.records.iter_mut().find(|r| r.id == variable_id) {
                record.description = pending.previous;
            }
            // The error may belong to another request; keep the text so a
            // late success without an echoed description can still land.
            self.rolled_back.insert(variable_id, pending.optimistic);
        }
    }
}

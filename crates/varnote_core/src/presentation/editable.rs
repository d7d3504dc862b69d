//! Inline description edit cell.
//!
//! # Invariants
//! - Keystrokes only touch the local draft; nothing is sent while typing.
//! - Losing focus sends one `UPDATE_DESCRIPTION` iff the draft differs from
//!   the last-saved marker, and moves the marker optimistically.
//! - While focused, external value updates never overwrite the draft.

use crate::model::variable::VariableId;
use crate::protocol::UiCommand;

/// Keys with special meaning inside the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// Accept: leave the field through the normal save path.
    Enter,
    /// Cancel: restore the stored value and leave without saving.
    Escape,
    Other,
}

/// Headless state of one description field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableCell {
    variable_id: VariableId,
    value: String,
    draft: String,
    last_saved: String,
    focused: bool,
}

impl EditableCell {
    pub fn new(variable_id: impl Into<VariableId>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            variable_id: variable_id.into(),
            draft: value.clone(),
            last_saved: value.clone(),
            value,
            focused: false,
        }
    }

    pub fn variable_id(&self) -> &str {
        &self.variable_id
    }

    /// Stored description as last delivered from outside.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Text currently shown in the field.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn last_saved(&self) -> &str {
        &self.last_saved
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Replaces the draft with the field's new text.
    pub fn input(&mut self, text: impl Into<String>) {
        self.focused = true;
        self.draft = text.into();
    }

    /// Leaves the field; returns the save command when the draft changed.
    pub fn blur(&mut self) -> Option<UiCommand> {
        self.focused = false;
        if self.draft != self.last_saved {
            self.last_saved = self.draft.clone();
            return Some(UiCommand::UpdateDescription {
                variable_id: self.variable_id.clone(),
                description: self.draft.clone(),
            });
        }
        self.adopt_external_value();
        None
    }

    /// Handles a key press while the field has focus.
    pub fn key(&mut self, key: EditKey) -> Option<UiCommand> {
        match key {
            EditKey::Enter => self.blur(),
            EditKey::Escape => {
                self.draft = self.value.clone();
                self.last_saved = self.value.clone();
                self.focused = false;
                None
            }
            EditKey::Other => None,
        }
    }

    /// Delivers a new stored value from outside the cell.
    ///
    /// Ignored for the draft while the field has focus.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        if !self.focused {
            self.adopt_external_value();
        }
    }

    fn adopt_external_value(&mut self) {
        if self.value != self.last_saved {
            self.draft = self.value.clone();
            self.last_saved = self.value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditKey, EditableCell};
    use crate::protocol::UiCommand;

    #[test]
    fn typing_then_blur_sends_one_update() {
        let mut cell = EditableCell::new("v1", "old");
        cell.focus();
        cell.input("ne");
        cell.input("new");
        assert_eq!(cell.draft(), "new");

        let command = cell.blur().expect("changed draft is saved");
        assert_eq!(
            command,
            UiCommand::UpdateDescription {
                variable_id: "v1".to_string(),
                description: "new".to_string(),
            }
        );
        assert_eq!(cell.last_saved(), "new");
        assert!(cell.blur().is_none());
    }

    #[test]
    fn unchanged_draft_sends_nothing() {
        let mut cell = EditableCell::new("v1", "same");
        cell.focus();
        cell.input("same");
        assert!(cell.blur().is_none());
    }

    #[test]
    fn enter_saves_and_escape_restores() {
        let mut cell = EditableCell::new("v1", "stored");
        cell.input("typed");
        assert!(cell.key(EditKey::Enter).is_some());
        assert!(!cell.is_focused());

        let mut cell = EditableCell::new("v2", "stored");
        cell.input("typed");
        assert!(cell.key(EditKey::Escape).is_none());
        assert_eq!(cell.draft(), "stored");
        assert!(!cell.is_focused());
        assert!(cell.blur().is_none());
    }

    #[test]
    fn focused_draft_survives_external_update() {
        let mut cell = EditableCell::new("v1", "stored");
        cell.input("in progress");
        cell.set_value("reloaded");
        assert_eq!(cell.draft(), "in progress");
        assert_eq!(cell.value(), "reloaded");
    }

    #[test]
    fn external_update_applies_when_not_focused() {
        let mut cell = EditableCell::new("v1", "stored");
        cell.set_value("changed elsewhere");
        assert_eq!(cell.draft(), "changed elsewhere");
        assert_eq!(cell.last_saved(), "changed elsewhere");
    }

    #[test]
    fn external_update_during_focus_lands_after_unchanged_blur() {
        let mut cell = EditableCell::new("v1", "stored");
        cell.focus();
        cell.set_value("reloaded");
        assert_eq!(cell.draft(), "stored");
        assert!(cell.blur().is_none());
        assert_eq!(cell.draft(), "reloaded");
    }
}

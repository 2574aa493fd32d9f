//! Cell edit state.
//!
//! One cell may be editing at a time per grid. Replacement mode records
//! whether the edit began by typing over a selection (which replaces the
//! cell's value, Excel-style) or by double-click/F2 (which appends); the
//! host uses the distinction to seed the caret. `editing_metadata` is an
//! orthogonal flag for the grid's free-text description field; it only
//! meets cell editing in `cancel`, which clears both.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditState {
    editing: bool,
    replacement: bool,
    pending: Option<String>,
    editing_metadata: bool,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_replacement(&self) -> bool {
        self.replacement
    }

    pub fn pending_value(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_editing_metadata(&self) -> bool {
        self.editing_metadata
    }

    /// Idle -> Editing. Callers must commit or cancel any edit in flight
    /// first; starting over an active edit is a caller bug this layer does
    /// not defend against.
    pub fn start_editing(&mut self, initial_value: &str, replacement: bool) {
        self.editing = true;
        self.replacement = replacement;
        self.pending = Some(initial_value.to_string());
    }

    /// Update the value being typed. No-op unless editing.
    pub fn set_pending_value(&mut self, value: &str) {
        if self.editing {
            self.pending = Some(value.to_string());
        }
    }

    /// Editing -> Idle, yielding the value to write. `None` if not editing.
    pub fn commit(&mut self) -> Option<String> {
        if !self.editing {
            return None;
        }
        self.editing = false;
        self.replacement = false;
        self.pending.take()
    }

    /// Editing -> Idle, discarding the pending value. Also drops the
    /// metadata-editing flag.
    pub fn cancel(&mut self) {
        self.editing = false;
        self.replacement = false;
        self.pending = None;
        self.editing_metadata = false;
    }

    pub fn set_editing_metadata(&mut self, editing: bool) {
        self.editing_metadata = editing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_commit() {
        let mut edit = EditState::new();
        assert!(!edit.is_editing());

        edit.start_editing("abc", false);
        assert!(edit.is_editing());
        assert!(!edit.is_replacement());
        assert_eq!(edit.pending_value(), Some("abc"));

        edit.set_pending_value("abcd");
        assert_eq!(edit.commit(), Some("abcd".to_string()));
        assert!(!edit.is_editing());
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut edit = EditState::new();
        edit.start_editing("x", true);
        assert!(edit.is_replacement());

        edit.cancel();
        assert!(!edit.is_editing());
        assert!(!edit.is_replacement());
        assert_eq!(edit.pending_value(), None);
        assert_eq!(edit.commit(), None);
    }

    #[test]
    fn test_replacement_mode_starts_from_typed_char() {
        let mut edit = EditState::new();
        // Typing "7" over a selection replaces the old value outright.
        edit.start_editing("7", true);
        assert!(edit.is_replacement());
        assert_eq!(edit.commit(), Some("7".to_string()));
        assert!(!edit.is_replacement());
    }

    #[test]
    fn test_set_pending_is_noop_when_idle() {
        let mut edit = EditState::new();
        edit.set_pending_value("ignored");
        assert_eq!(edit.pending_value(), None);
        assert!(!edit.is_editing());
    }

    #[test]
    fn test_metadata_flag_is_orthogonal() {
        let mut edit = EditState::new();
        edit.set_editing_metadata(true);
        edit.start_editing("v", false);
        assert!(edit.is_editing_metadata());
        assert!(edit.is_editing());

        // Committing a cell edit leaves the metadata editor alone.
        edit.commit();
        assert!(edit.is_editing_metadata());

        // Cancel clears both.
        edit.start_editing("v", false);
        edit.cancel();
        assert!(!edit.is_editing_metadata());
        assert!(!edit.is_editing());
    }
}

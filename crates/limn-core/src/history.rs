//! Linear command history with a movable cursor.

use crate::command::Command;

/// Executed commands in application order plus a cursor.
///
/// The cursor is stored as the number of currently-applied entries:
/// `applied == 0` means nothing is undoable and `applied == entries.len()`
/// means nothing is redoable. Undo and redo are the only things that move
/// the cursor without appending.
#[derive(Debug, Default)]
pub(crate) struct History {
    entries: Vec<Command>,
    applied: usize,
}

impl History {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a freshly-executed command. Entries beyond the cursor (a
    /// branch abandoned by earlier undos) are discarded first.
    pub(crate) fn record(&mut self, command: Command) {
        self.entries.truncate(self.applied);
        self.entries.push(command);
        self.applied = self.entries.len();
    }

    pub(crate) fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub(crate) fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// The entry an undo would reverse, if any.
    pub(crate) fn undo_target(&self) -> Option<&Command> {
        self.applied.checked_sub(1).map(|idx| &self.entries[idx])
    }

    /// The entry a redo would re-execute, if any.
    pub(crate) fn redo_target(&mut self) -> Option<&mut Command> {
        self.entries.get_mut(self.applied)
    }

    /// Move the cursor back after a successful undo.
    pub(crate) fn retreat(&mut self) {
        self.applied = self.applied.saturating_sub(1);
    }

    /// Move the cursor forward after a successful redo.
    pub(crate) fn advance(&mut self) {
        self.applied = (self.applied + 1).min(self.entries.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(name: &str) -> Command {
        Command::AddClass {
            name: name.to_owned(),
        }
    }

    #[test]
    fn starts_empty_with_nothing_to_traverse() {
        let history = History::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo_target().is_none());
    }

    #[test]
    fn record_points_the_cursor_at_the_newest_entry() {
        let mut history = History::new();
        history.record(add("A"));
        history.record(add("B"));

        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo_target(), Some(&add("B")));
    }

    #[test]
    fn undo_and_redo_walk_the_cursor() {
        let mut history = History::new();
        history.record(add("A"));
        history.record(add("B"));

        history.retreat();
        assert!(history.can_undo());
        assert!(history.can_redo());
        assert_eq!(history.undo_target(), Some(&add("A")));
        assert_eq!(history.redo_target(), Some(&mut add("B")));

        history.advance();
        assert!(!history.can_redo());
        assert_eq!(history.undo_target(), Some(&add("B")));
    }

    #[test]
    fn record_after_undo_discards_the_abandoned_branch() {
        let mut history = History::new();
        history.record(add("A"));
        history.record(add("B"));
        history.retreat();

        history.record(add("C"));

        assert!(!history.can_redo());
        assert_eq!(history.undo_target(), Some(&add("C")));
        history.retreat();
        assert_eq!(history.undo_target(), Some(&add("A")));
    }

    #[test]
    fn cursor_moves_are_clamped_at_the_ends() {
        let mut history = History::new();
        history.retreat();
        assert!(!history.can_undo());

        history.record(add("A"));
        history.advance();
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }
}

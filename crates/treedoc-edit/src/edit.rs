//! The edit contract and the recorded change every concrete edit is built on.

use crate::error::{Error, Result};
use std::fmt;
use treedoc_core::{ChangeKind, Tree, TreeDelta};

/// Lifecycle of an edit: constructed, then alternating between done and undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Constructed,
    Done,
    Undone,
}

impl fmt::Display for EditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Constructed => "constructed",
            Self::Done => "done",
            Self::Undone => "undone",
        })
    }
}

/// Non-fatal problems an edit ran into (data loss, ambiguity). The edit itself succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditWarnings {
    messages: Vec<String>,
}

impl EditWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn extend(&mut self, other: &EditWarnings) {
        self.messages.extend(other.messages.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// All messages as one text, one message per line.
    pub fn text(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.messages.join("\n"))
    }
}

/// A reversible change of a [`Tree`].
///
/// Implementors provide `perform_redo`/`perform_undo`; callers use [`DocumentEdit::redo`] and
/// [`DocumentEdit::undo`], which also commit the tree so that derived state is rebuilt and
/// listeners are notified.
pub trait DocumentEdit: fmt::Debug {
    fn presentation_name(&self) -> String;

    fn change_kind(&self) -> ChangeKind;

    fn warnings(&self) -> &EditWarnings;

    fn perform_redo(&mut self, tree: &mut Tree) -> Result<()>;

    fn perform_undo(&mut self, tree: &mut Tree) -> Result<()>;

    /// Applies the change to a scratch copy without touching the edit's state.
    fn apply_to(&self, scratch: &mut Tree);

    fn can_undo(&self) -> bool {
        true
    }

    fn can_redo(&self) -> bool {
        true
    }

    fn warning_text(&self) -> Option<String> {
        self.warnings().text()
    }

    fn redo(&mut self, tree: &mut Tree) -> Result<()> {
        if !self.can_redo() {
            return Err(Error::CannotRedo(self.presentation_name()));
        }
        self.perform_redo(tree)?;
        tree.commit(self.change_kind());
        if let Some(text) = self.warning_text() {
            tracing::warn!(edit = %self.presentation_name(), warnings = %text, "edit completed with warnings");
        }
        Ok(())
    }

    fn undo(&mut self, tree: &mut Tree) -> Result<()> {
        if !self.can_undo() {
            return Err(Error::CannotUndo(self.presentation_name()));
        }
        self.perform_undo(tree)?;
        tree.commit(self.change_kind());
        Ok(())
    }
}

/// The exact effect of an edit, captured once when the edit is constructed.
///
/// The algorithm runs against a fork of the tree; the difference between the tree and the fork is
/// stored as a [`TreeDelta`]. Redo and undo replay that delta, so they never re-run the algorithm.
/// A recorded change must be replayed against the tree it was recorded from, in undo-stack order.
#[derive(Debug, Clone)]
pub struct RecordedChange {
    name: String,
    kind: ChangeKind,
    delta: TreeDelta,
    warnings: EditWarnings,
    state: EditState,
}

impl RecordedChange {
    /// Runs `change` on a fork of `tree` and records the result. `tree` itself is not modified,
    /// so a failing precondition leaves everything untouched.
    pub fn record<T>(
        tree: &Tree,
        name: impl Into<String>,
        kind: ChangeKind,
        change: impl FnOnce(&mut Tree, &mut EditWarnings) -> Result<T>,
    ) -> Result<(Self, T)> {
        let name = name.into();
        let mut scratch = tree.fork();
        let mut warnings = EditWarnings::new();
        let output = change(&mut scratch, &mut warnings)?;
        let delta = TreeDelta::between(tree, &scratch);
        tracing::debug!(
            edit = %name,
            touched = delta.touched_nodes().count(),
            warnings = warnings.len(),
            "edit recorded"
        );
        Ok((
            Self {
                name,
                kind,
                delta,
                warnings,
                state: EditState::Constructed,
            },
            output,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn warnings(&self) -> &EditWarnings {
        &self.warnings
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn delta(&self) -> &TreeDelta {
        &self.delta
    }

    pub fn redo(&mut self, tree: &mut Tree) -> Result<()> {
        if self.state == EditState::Done {
            return Err(self.invalid("redo"));
        }
        self.delta.apply_forward(tree);
        self.state = EditState::Done;
        Ok(())
    }

    pub fn undo(&mut self, tree: &mut Tree) -> Result<()> {
        if self.state != EditState::Done {
            return Err(self.invalid("undo"));
        }
        self.delta.apply_backward(tree);
        self.state = EditState::Undone;
        Ok(())
    }

    pub fn apply_to(&self, scratch: &mut Tree) {
        self.delta.apply_forward(scratch);
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidState {
            edit: self.name.clone(),
            action,
            state: self.state,
        }
    }
}

/// Implements [`DocumentEdit`] for a type holding its [`RecordedChange`] in a `change` field.
macro_rules! recorded_edit {
    ($ty:ty) => {
        impl $crate::edit::DocumentEdit for $ty {
            fn presentation_name(&self) -> String {
                self.change.name().to_string()
            }

            fn change_kind(&self) -> treedoc_core::ChangeKind {
                self.change.kind()
            }

            fn warnings(&self) -> &$crate::edit::EditWarnings {
                self.change.warnings()
            }

            fn perform_redo(&mut self, tree: &mut treedoc_core::Tree) -> $crate::error::Result<()> {
                self.change.redo(tree)
            }

            fn perform_undo(&mut self, tree: &mut treedoc_core::Tree) -> $crate::error::Result<()> {
                self.change.undo(tree)
            }

            fn apply_to(&self, scratch: &mut treedoc_core::Tree) {
                self.change.apply_to(scratch)
            }
        }
    };
}

pub(crate) use recorded_edit;

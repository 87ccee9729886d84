use crate::edit::DocumentEdit;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use treedoc_core::{DocumentConfig, Tree};

/// Bounded undo/redo history of executed edits.
#[derive(Debug)]
pub struct UndoManager {
    undo_stack: VecDeque<Box<dyn DocumentEdit>>,
    redo_stack: Vec<Box<dyn DocumentEdit>>,
    limit: Option<usize>,
    // Number of edits currently applied since the history started; compared against the value
    // recorded by `mark_saved` to answer `is_modified`.
    position: i64,
    save_point: Option<i64>,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(Some(100))
    }
}

impl UndoManager {
    /// `limit` is the maximum number of undoable edits; `None` keeps everything.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
            position: 0,
            save_point: Some(0),
        }
    }

    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::new(config.undo_limit())
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.trim();
    }

    /// Performs `edit` and records it. Returns the warning text of the edit, if any.
    ///
    /// Executing an edit that cannot be undone clears the whole history.
    pub fn execute(
        &mut self,
        tree: &mut Tree,
        mut edit: Box<dyn DocumentEdit>,
    ) -> Result<Option<String>> {
        edit.redo(tree)?;
        let warnings = edit.warning_text();
        tracing::debug!(edit = %edit.presentation_name(), "edit executed");

        self.redo_stack.clear();
        if self.save_point.is_some_and(|s| s > self.position) {
            self.save_point = None;
        }
        self.position += 1;

        if edit.can_undo() {
            self.undo_stack.push_back(edit);
            self.trim();
        } else {
            tracing::debug!("edit is not undoable; discarding history");
            self.undo_stack.clear();
            if self.save_point != Some(self.position) {
                self.save_point = None;
            }
        }
        Ok(warnings)
    }

    pub fn undo(&mut self, tree: &mut Tree) -> Result<()> {
        let mut edit = self.undo_stack.pop_back().ok_or(Error::NothingToUndo)?;
        if let Err(err) = edit.undo(tree) {
            self.undo_stack.push_back(edit);
            return Err(err);
        }
        tracing::debug!(edit = %edit.presentation_name(), "edit undone");
        self.position -= 1;
        self.redo_stack.push(edit);
        Ok(())
    }

    pub fn redo(&mut self, tree: &mut Tree) -> Result<()> {
        let mut edit = self.redo_stack.pop().ok_or(Error::NothingToRedo)?;
        if let Err(err) = edit.redo(tree) {
            self.redo_stack.push(edit);
            return Err(err);
        }
        tracing::debug!(edit = %edit.presentation_name(), "edit redone");
        self.position += 1;
        self.undo_stack.push_back(edit);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.back().is_some_and(|e| e.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.redo_stack.last().is_some_and(|e| e.can_redo())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// `"Undo <name>"` for the edit [`UndoManager::undo`] would revert.
    pub fn undo_presentation_name(&self) -> Option<String> {
        self.undo_stack
            .back()
            .map(|e| format!("Undo {}", e.presentation_name()))
    }

    pub fn redo_presentation_name(&self) -> Option<String> {
        self.redo_stack
            .last()
            .map(|e| format!("Redo {}", e.presentation_name()))
    }

    /// Records the current state as the saved one.
    pub fn mark_saved(&mut self) {
        self.save_point = Some(self.position);
    }

    /// `true` if the current state differs from the last saved one.
    pub fn is_modified(&self) -> bool {
        self.save_point != Some(self.position)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        if self.save_point != Some(self.position) {
            self.save_point = None;
        }
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            while self.undo_stack.len() > limit {
                self.undo_stack.pop_front();
            }
        }
    }
}

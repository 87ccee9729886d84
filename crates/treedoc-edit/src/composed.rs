use crate::edit::{DocumentEdit, EditState, EditWarnings};
use crate::error::{Error, Result};
use treedoc_core::{ChangeKind, Tree};

/// Several edits performed and reverted as one unit.
///
/// Children are redone in order and undone in reverse order. Warnings of all children are
/// aggregated into one warning text.
#[derive(Debug)]
pub struct ComposedDocumentEdit {
    name: String,
    edits: Vec<Box<dyn DocumentEdit>>,
    warnings: EditWarnings,
    state: EditState,
}

impl ComposedDocumentEdit {
    /// Composes edits that were each constructed against the state produced by their
    /// predecessors (see [`ComposedEditBuilder`]).
    pub fn new(name: impl Into<String>, edits: Vec<Box<dyn DocumentEdit>>) -> Self {
        let mut warnings = EditWarnings::new();
        for edit in &edits {
            warnings.extend(edit.warnings());
        }
        Self {
            name: name.into(),
            edits,
            warnings,
            state: EditState::Constructed,
        }
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> impl Iterator<Item = &dyn DocumentEdit> {
        self.edits.iter().map(|e| e.as_ref())
    }
}

impl DocumentEdit for ComposedDocumentEdit {
    fn presentation_name(&self) -> String {
        self.name.clone()
    }

    fn change_kind(&self) -> ChangeKind {
        self.edits
            .iter()
            .map(|e| e.change_kind())
            .max()
            .unwrap_or_default()
    }

    fn warnings(&self) -> &EditWarnings {
        &self.warnings
    }

    fn can_undo(&self) -> bool {
        self.edits.iter().all(|e| e.can_undo())
    }

    fn can_redo(&self) -> bool {
        self.edits.iter().all(|e| e.can_redo())
    }

    fn perform_redo(&mut self, tree: &mut Tree) -> Result<()> {
        if self.state == EditState::Done {
            return Err(Error::InvalidState {
                edit: self.name.clone(),
                action: "redo",
                state: self.state,
            });
        }
        for edit in &mut self.edits {
            edit.perform_redo(tree)?;
        }
        self.state = EditState::Done;
        Ok(())
    }

    fn perform_undo(&mut self, tree: &mut Tree) -> Result<()> {
        if self.state != EditState::Done {
            return Err(Error::InvalidState {
                edit: self.name.clone(),
                action: "undo",
                state: self.state,
            });
        }
        for edit in self.edits.iter_mut().rev() {
            edit.perform_undo(tree)?;
        }
        self.state = EditState::Undone;
        Ok(())
    }

    fn apply_to(&self, scratch: &mut Tree) {
        for edit in &self.edits {
            edit.apply_to(scratch);
        }
    }
}

/// Builds a [`ComposedDocumentEdit`] whose children see the effect of their predecessors.
///
/// Each child is constructed against a scratch copy that already has all previous children
/// applied.
#[derive(Debug)]
pub struct ComposedEditBuilder {
    name: String,
    scratch: Tree,
    edits: Vec<Box<dyn DocumentEdit>>,
}

impl ComposedEditBuilder {
    pub fn new(tree: &Tree, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scratch: tree.fork(),
            edits: Vec::new(),
        }
    }

    /// The tree as it will look after all edits pushed so far.
    pub fn scratch(&self) -> &Tree {
        &self.scratch
    }

    pub fn push<E, F>(&mut self, build: F) -> Result<&mut Self>
    where
        E: DocumentEdit + 'static,
        F: FnOnce(&Tree) -> Result<E>,
    {
        let edit = build(&self.scratch)?;
        edit.apply_to(&mut self.scratch);
        self.edits.push(Box::new(edit));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn build(self) -> ComposedDocumentEdit {
        ComposedDocumentEdit::new(self.name, self.edits)
    }
}

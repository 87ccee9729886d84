use crate::edit::{RecordedChange, recorded_edit};
use crate::error::Result;
use treedoc_core::id_manager::{self, RenameSummary};
use treedoc_core::{ChangeKind, NodeId, Tree};

/// Renames an ID in a whole subtree, including pie chart value references.
#[derive(Debug)]
pub struct RenameIdEdit {
    change: RecordedChange,
    summary: RenameSummary,
}

recorded_edit!(RenameIdEdit);

impl RenameIdEdit {
    pub fn new(tree: &Tree, root: NodeId, old: &str, new: &str) -> Result<Self> {
        let (change, summary) = RecordedChange::record(
            tree,
            format!("Rename ID \"{old}\" to \"{new}\""),
            ChangeKind::RenameOnly,
            |scratch, _| Ok(id_manager::rename_id(scratch, root, old, new)?),
        )?;
        Ok(Self { change, summary })
    }

    pub fn summary(&self) -> RenameSummary {
        self.summary
    }
}

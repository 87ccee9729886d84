use super::report_replaced;
use crate::edit::{RecordedChange, recorded_edit};
use crate::error::Result;
use treedoc_core::id_manager::{self, ConflictPolicy};
use treedoc_core::{ChangeKind, Label, LabelHandle, NodeId, Tree};

/// Adds a label to the afferent branch of a node.
///
/// With [`ConflictPolicy::Replace`] an element already using the label's ID is removed (and
/// restored on undo); the replacement is reported as a warning.
#[derive(Debug)]
pub struct InsertLabelEdit {
    change: RecordedChange,
    handle: LabelHandle,
}

recorded_edit!(InsertLabelEdit);

impl InsertLabelEdit {
    pub fn new(tree: &Tree, node: NodeId, label: Label, policy: ConflictPolicy) -> Result<Self> {
        let (change, handle) =
            RecordedChange::record(tree, "Insert label", ChangeKind::Neutral, |scratch, warnings| {
                let (handle, outcome) = id_manager::insert_label(scratch, node, label, policy)?;
                report_replaced(&outcome, node, warnings);
                Ok(handle)
            })?;
        Ok(Self { change, handle })
    }

    /// Handle of the inserted label, valid while the edit is done.
    pub fn handle(&self) -> LabelHandle {
        self.handle
    }
}

#[derive(Debug)]
pub struct DeleteLabelEdit {
    change: RecordedChange,
}

recorded_edit!(DeleteLabelEdit);

impl DeleteLabelEdit {
    pub fn new(tree: &Tree, handles: &[LabelHandle]) -> Result<Self> {
        let name = if handles.len() == 1 {
            "Delete label"
        } else {
            "Delete labels"
        };
        let (change, ()) = RecordedChange::record(tree, name, ChangeKind::Neutral, |scratch, _| {
            for &handle in handles {
                scratch.remove_label(handle)?;
            }
            Ok(())
        })?;
        Ok(Self { change })
    }
}

#[derive(Debug)]
pub struct ChangeLabelIdEdit {
    change: RecordedChange,
}

recorded_edit!(ChangeLabelIdEdit);

impl ChangeLabelIdEdit {
    pub fn new(
        tree: &Tree,
        handle: LabelHandle,
        new_id: &str,
        policy: ConflictPolicy,
    ) -> Result<Self> {
        let (change, ()) = RecordedChange::record(
            tree,
            format!("Change label ID to \"{new_id}\""),
            ChangeKind::RenameOnly,
            |scratch, warnings| {
                let outcome = id_manager::change_label_id(scratch, handle, new_id, policy)?;
                if let Some(node) = scratch.label_owner(handle) {
                    report_replaced(&outcome, node, warnings);
                }
                Ok(())
            },
        )?;
        Ok(Self { change })
    }
}

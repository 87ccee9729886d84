use crate::edit::{RecordedChange, recorded_edit};
use crate::error::Result;
use treedoc_core::{ChangeKind, NodeBranchDataAdapter, NodeId, TextElementData, Tree};

/// Writes values through a [`NodeBranchDataAdapter`], e.g. from a table cell edit.
#[derive(Debug)]
pub struct NodeDataEdit {
    change: RecordedChange,
}

recorded_edit!(NodeDataEdit);

impl NodeDataEdit {
    pub fn new(
        tree: &Tree,
        adapter: &dyn NodeBranchDataAdapter,
        values: &[(NodeId, TextElementData)],
    ) -> Result<Self> {
        let (change, ()) = RecordedChange::record(
            tree,
            format!("Edit {}", adapter.description()),
            ChangeKind::Neutral,
            |scratch, _| {
                for (node, value) in values {
                    adapter.write(scratch, *node, value.clone())?;
                }
                Ok(())
            },
        )?;
        Ok(Self { change })
    }
}

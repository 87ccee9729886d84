use crate::edit::{RecordedChange, recorded_edit};
use crate::error::Result;
use treedoc_core::{ChangeKind, Legend, LegendHandle, NodeId, Tree};

/// Adds a legend anchored to one node, or spanning two nodes.
///
/// Anchor nodes without a unique name receive a generated one.
#[derive(Debug)]
pub struct InsertLegendEdit {
    change: RecordedChange,
    handle: LegendHandle,
}

recorded_edit!(InsertLegendEdit);

impl InsertLegendEdit {
    pub fn new(
        tree: &Tree,
        text: &str,
        anchor: NodeId,
        second_anchor: Option<NodeId>,
        position: i32,
    ) -> Result<Self> {
        let (change, handle) =
            RecordedChange::record(tree, "Insert legend", ChangeKind::Neutral, |scratch, _| {
                let a0 = scratch.ensure_unique_name(anchor);
                let legend = match second_anchor {
                    Some(second) => {
                        let a1 = scratch.ensure_unique_name(second);
                        Legend::spanning(text, a0, a1)
                    }
                    None => Legend::new(text, a0),
                };
                Ok(scratch.add_legend(legend.with_position(position)))
            })?;
        Ok(Self { change, handle })
    }

    pub fn handle(&self) -> LegendHandle {
        self.handle
    }
}

#[derive(Debug)]
pub struct DeleteLegendEdit {
    change: RecordedChange,
}

recorded_edit!(DeleteLegendEdit);

impl DeleteLegendEdit {
    pub fn new(tree: &Tree, handles: &[LegendHandle]) -> Result<Self> {
        let name = if handles.len() == 1 {
            "Delete legend"
        } else {
            "Delete legends"
        };
        let (change, ()) = RecordedChange::record(tree, name, ChangeKind::Neutral, |scratch, _| {
            for &handle in handles {
                scratch.remove_legend(handle)?;
            }
            Ok(())
        })?;
        Ok(Self { change })
    }
}

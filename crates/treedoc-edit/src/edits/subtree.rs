use crate::edit::{RecordedChange, recorded_edit};
use crate::error::{Error, Result};
use crate::legend_anchor;
use treedoc_core::{ChangeKind, NodeId, Tree};

/// Removes a node and everything below it. Deleting the root empties the tree.
///
/// Legends anchored only inside the subtree are deleted; spanning legends that lose one anchor
/// keep the other. Both are reported as warnings.
#[derive(Debug)]
pub struct DeleteSubtreeEdit {
    change: RecordedChange,
}

recorded_edit!(DeleteSubtreeEdit);

impl DeleteSubtreeEdit {
    pub fn new(tree: &Tree, node: NodeId) -> Result<Self> {
        let (change, ()) = RecordedChange::record(
            tree,
            "Delete subtree",
            ChangeKind::Topology,
            |scratch, warnings| {
                legend_anchor::remove_subtree_anchors(scratch, node, warnings);
                if scratch.detach(node).is_none() {
                    if scratch.paint_start() != Some(node) {
                        return Err(Error::precondition(
                            "delete subtree",
                            format!("node {node} is not part of the tree"),
                        ));
                    }
                    scratch.set_paint_start(None)?;
                }
                Ok(())
            },
        )?;
        Ok(Self { change })
    }
}

/// Inserts a copy of a subtree (possibly from another tree) below a node.
///
/// Copied nodes that had a unique name receive a fresh one; legends are not copied.
#[derive(Debug)]
pub struct PasteSubtreeEdit {
    change: RecordedChange,
    pasted: NodeId,
}

recorded_edit!(PasteSubtreeEdit);

impl PasteSubtreeEdit {
    /// Pastes the subtree of `source_node` in `source` as child number `index` of `parent`
    /// (`None` appends). An empty target tree takes the copy as its root.
    pub fn new(
        tree: &Tree,
        source: &Tree,
        source_node: NodeId,
        parent: Option<NodeId>,
        index: Option<usize>,
    ) -> Result<Self> {
        let (change, pasted) =
            RecordedChange::record(tree, "Paste subtree", ChangeKind::Topology, |scratch, _| {
                let copy = scratch.import_subtree(source, source_node, false);
                let named: Vec<NodeId> = source
                    .preorder(source_node)
                    .into_iter()
                    .zip(scratch.preorder(copy))
                    .filter(|(original, _)| source.node(*original).unique_name().is_some())
                    .map(|(_, copied)| copied)
                    .collect();
                for node in named {
                    scratch.ensure_unique_name(node);
                }
                match parent {
                    Some(parent) => {
                        let index = index.unwrap_or(scratch.children(parent).len());
                        scratch.insert_child(parent, index, copy)?;
                    }
                    None if scratch.is_empty() => scratch.set_paint_start(Some(copy))?,
                    None => {
                        return Err(Error::precondition(
                            "paste subtree",
                            "a parent node is required unless the tree is empty",
                        ));
                    }
                }
                Ok(copy)
            })?;
        Ok(Self { change, pasted })
    }

    /// Root of the pasted copy.
    pub fn pasted(&self) -> NodeId {
        self.pasted
    }
}

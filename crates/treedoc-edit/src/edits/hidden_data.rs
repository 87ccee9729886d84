use super::report_replaced;
use crate::edit::{RecordedChange, recorded_edit};
use crate::error::{Error, Result};
use treedoc_core::id_manager::{self, ConflictPolicy};
use treedoc_core::{ChangeKind, HiddenDataOwner, NodeId, TextElementData, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenDataTarget {
    Node,
    Branch,
}

impl HiddenDataTarget {
    fn owner(self, node: NodeId) -> HiddenDataOwner {
        match self {
            Self::Node => HiddenDataOwner::Node(node),
            Self::Branch => HiddenDataOwner::Branch(node),
        }
    }
}

/// Sets or removes hidden data entries of several nodes at once.
#[derive(Debug)]
pub struct HiddenDataEdit {
    change: RecordedChange,
}

recorded_edit!(HiddenDataEdit);

impl HiddenDataEdit {
    /// Sets `id` to the given value on each node. Existing entries are updated in place; new
    /// entries go through the ID checks with `policy`.
    pub fn set(
        tree: &Tree,
        target: HiddenDataTarget,
        id: &str,
        values: &[(NodeId, TextElementData)],
        policy: ConflictPolicy,
    ) -> Result<Self> {
        let (change, ()) = RecordedChange::record(
            tree,
            format!("Set hidden data \"{id}\""),
            ChangeKind::Neutral,
            |scratch, warnings| {
                for (node, value) in values {
                    let node = *node;
                    let mut map = scratch.hidden_data_mut(target.owner(node));
                    if map.update(id, value.clone()).is_some() {
                        continue;
                    }
                    let outcome = match target {
                        HiddenDataTarget::Node => id_manager::insert_hidden_node_data(
                            scratch,
                            node,
                            id,
                            value.clone(),
                            policy,
                        )?,
                        HiddenDataTarget::Branch => id_manager::insert_hidden_branch_data(
                            scratch,
                            node,
                            id,
                            value.clone(),
                            policy,
                        )?,
                    };
                    report_replaced(&outcome, node, warnings);
                }
                Ok(())
            },
        )?;
        Ok(Self { change })
    }

    /// Removes `id` from each node. Fails if none of the nodes has such an entry.
    pub fn remove(tree: &Tree, target: HiddenDataTarget, id: &str, nodes: &[NodeId]) -> Result<Self> {
        let (change, ()) = RecordedChange::record(
            tree,
            format!("Remove hidden data \"{id}\""),
            ChangeKind::Neutral,
            |scratch, _| {
                let mut removed = 0usize;
                for &node in nodes {
                    if scratch.hidden_data_mut(target.owner(node)).remove(id).is_some() {
                        removed += 1;
                    }
                }
                if removed == 0 {
                    return Err(Error::precondition(
                        "remove hidden data",
                        format!("no entry \"{id}\" found"),
                    ));
                }
                Ok(())
            },
        )?;
        Ok(Self { change })
    }
}

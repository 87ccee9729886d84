use crate::edit::{RecordedChange, recorded_edit};
use crate::error::Result;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use treedoc_core::{ChangeKind, NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderizeDirection {
    /// Smallest subtrees first.
    #[default]
    Ascending,
    Descending,
}

/// What is counted to compare subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderizeMetric {
    #[default]
    NodeCount,
    LeafCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LadderizeOptions {
    pub direction: LadderizeDirection,
    pub metric: LadderizeMetric,
}

/// Recursively orders the children of every node below `root` by subtree size.
///
/// Sizes are computed once, bottom-up, before any sorting. Sorting is stable, so equally sized
/// siblings keep their relative order.
#[derive(Debug)]
pub struct LadderizeEdit {
    change: RecordedChange,
}

recorded_edit!(LadderizeEdit);

impl LadderizeEdit {
    pub fn new(tree: &Tree, root: NodeId, options: LadderizeOptions) -> Result<Self> {
        let name = match options.direction {
            LadderizeDirection::Ascending => "Ladderize (ascending)",
            LadderizeDirection::Descending => "Ladderize (descending)",
        };
        let (change, ()) = RecordedChange::record(tree, name, ChangeKind::Topology, |scratch, _| {
            ladderize(scratch, root, options)
        })?;
        Ok(Self { change })
    }
}

pub(crate) fn subtree_sizes(
    tree: &Tree,
    root: NodeId,
    metric: LadderizeMetric,
) -> FxHashMap<NodeId, usize> {
    let mut sizes: FxHashMap<NodeId, usize> = FxHashMap::default();
    for node in tree.postorder(root) {
        let below: usize = tree
            .children(node)
            .iter()
            .map(|c| sizes.get(c).copied().unwrap_or(0))
            .sum();
        let size = match metric {
            LadderizeMetric::NodeCount => below + 1,
            LadderizeMetric::LeafCount if tree.is_leaf(node) => 1,
            LadderizeMetric::LeafCount => below,
        };
        sizes.insert(node, size);
    }
    sizes
}

fn ladderize(tree: &mut Tree, root: NodeId, options: LadderizeOptions) -> Result<()> {
    let sizes = subtree_sizes(tree, root, options.metric);
    let size = |n: &NodeId| sizes.get(n).copied().unwrap_or(0);
    for node in tree.preorder(root) {
        if tree.children(node).len() < 2 {
            continue;
        }
        let mut order = tree.children(node).to_vec();
        match options.direction {
            LadderizeDirection::Ascending => order.sort_by_key(size),
            LadderizeDirection::Descending => order.sort_by_key(|n| Reverse(size(n))),
        }
        if order != tree.children(node) {
            tree.set_children_order(node, order)?;
        }
    }
    Ok(())
}

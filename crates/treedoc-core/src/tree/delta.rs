use super::{Node, NodeId, Tree};
use crate::legend::Legends;
use crate::scale_bar::ScaleBar;

#[derive(Debug, Clone)]
struct NodeChange {
    id: NodeId,
    /// `None` for nodes created by the change.
    before: Option<Node>,
    after: Node,
}

/// Exact before/after record of everything that differs between two states of a tree.
///
/// Deltas are computed once, when an edit is constructed, and replayed in either direction
/// afterwards. Replaying never re-runs the algorithm that produced the change.
#[derive(Debug, Clone)]
pub struct TreeDelta {
    nodes: Vec<NodeChange>,
    paint_start: (Option<NodeId>, Option<NodeId>),
    legends: Option<(Legends, Legends)>,
    scale_bar: Option<(ScaleBar, ScaleBar)>,
    arena_len: (usize, usize),
    next_handle: (u64, u64),
}

impl TreeDelta {
    /// Records the difference from `before` to `after`, where `after` is a fork of `before` that
    /// has been modified. Forks only ever grow the arena.
    pub fn between(before: &Tree, after: &Tree) -> Self {
        let old = before.nodes_raw();
        let new = after.nodes_raw();

        let mut nodes = Vec::new();
        for (i, node) in new.iter().enumerate() {
            match old.get(i) {
                Some(prev) if prev == node => {}
                prev => nodes.push(NodeChange {
                    id: NodeId(i),
                    before: prev.cloned(),
                    after: node.clone(),
                }),
            }
        }

        let legends = (before.legends() != after.legends())
            .then(|| (before.legends().clone(), after.legends().clone()));
        let scale_bar = (before.scale_bar() != after.scale_bar())
            .then(|| (before.scale_bar().clone(), after.scale_bar().clone()));

        Self {
            nodes,
            paint_start: (before.paint_start(), after.paint_start()),
            legends,
            scale_bar,
            arena_len: (old.len(), new.len().max(old.len())),
            next_handle: (before.next_handle(), after.next_handle()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.paint_start.0 == self.paint_start.1
            && self.legends.is_none()
            && self.scale_bar.is_none()
    }

    /// Nodes whose state differs between the two recorded states.
    pub fn touched_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|c| c.id)
    }

    pub fn created_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|c| c.before.is_none())
            .map(|c| c.id)
    }

    pub fn apply_forward(&self, tree: &mut Tree) {
        tree.restore_parts(
            self.nodes.iter().map(|c| (c.id, c.after.clone())),
            self.arena_len.1,
            false,
            self.paint_start.1,
            self.next_handle.1,
        );
        if let Some((_, legends)) = &self.legends {
            tree.restore_legends(legends.clone());
        }
        if let Some((_, scale_bar)) = &self.scale_bar {
            tree.restore_scale_bar(scale_bar.clone());
        }
    }

    pub fn apply_backward(&self, tree: &mut Tree) {
        // Created nodes are dropped when they sit at the end of the arena; otherwise they are
        // reset to fresh detached nodes.
        let shrink = tree.arena_len() == self.arena_len.1;
        tree.restore_parts(
            self.nodes.iter().map(|c| {
                let node = c.before.clone().unwrap_or_else(|| Node::new(c.id));
                (c.id, node)
            }),
            self.arena_len.0,
            shrink,
            self.paint_start.0,
            self.next_handle.1,
        );
        if let Some((legends, _)) = &self.legends {
            tree.restore_legends(legends.clone());
        }
        if let Some((scale_bar, _)) = &self.scale_bar {
            tree.restore_scale_bar(scale_bar.clone());
        }
    }
}

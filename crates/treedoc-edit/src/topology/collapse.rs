use crate::edit::{EditWarnings, RecordedChange, recorded_edit};
use crate::error::{Error, Result};
use crate::legend_anchor;
use treedoc_core::{ChangeKind, NodeBranchDataAdapter, NodeId, Tree};

const COLLAPSE: &str = "collapse node";

/// Removes internal nodes, moving their children to the parent at the removed node's position.
#[derive(Debug)]
pub struct CollapseEdit {
    change: RecordedChange,
}

recorded_edit!(CollapseEdit);

impl CollapseEdit {
    /// Collapses every node in `nodes`. Fails if one of them is a leaf, or is the root without
    /// exactly one child.
    pub fn new(tree: &Tree, nodes: &[NodeId]) -> Result<Self> {
        let name = if nodes.len() == 1 {
            "Collapse node"
        } else {
            "Collapse nodes"
        };
        let (change, ()) =
            RecordedChange::record(tree, name, ChangeKind::LeafOrderInvariant, |scratch, _| {
                for &node in nodes {
                    collapse_node(scratch, node)?;
                }
                Ok(())
            })?;
        Ok(Self { change })
    }
}

/// Collapses one node. Returns the number of legends that had to be re-anchored.
pub(crate) fn collapse_node(tree: &mut Tree, node: NodeId) -> Result<usize> {
    if tree.is_leaf(node) {
        return Err(Error::precondition(
            COLLAPSE,
            format!("node {node} is a leaf"),
        ));
    }
    let reachable = tree
        .paint_start()
        .is_some_and(|root| tree.is_ancestor_or_self(root, node));
    if !reachable {
        return Err(Error::precondition(
            COLLAPSE,
            format!("node {node} is not part of the tree"),
        ));
    }

    match tree.parent(node) {
        Some(parent) => {
            let children = tree.children(node).to_vec();
            let Some((_, index)) = tree.detach(node) else {
                return Err(Error::precondition(COLLAPSE, format!("node {node} has no parent")));
            };
            for (offset, &child) in children.iter().enumerate() {
                tree.detach(child);
                tree.insert_child(parent, index + offset, child)?;
            }
            Ok(legend_anchor::reanchor_removed(tree, node, parent))
        }
        None => {
            let &[child] = tree.children(node) else {
                return Err(Error::precondition(
                    COLLAPSE,
                    format!(
                        "the root can only be collapsed if it has exactly one child (it has {})",
                        tree.children(node).len()
                    ),
                ));
            };
            tree.detach(child);
            tree.set_paint_start(Some(child))?;
            Ok(legend_anchor::reanchor_removed(tree, node, child))
        }
    }
}

/// Collapses every internal node below `root` whose support value is below a threshold.
///
/// The root of the tree is never collapsed. Nodes with missing or non-decimal values are left
/// alone and reported in the warning text.
#[derive(Debug)]
pub struct CollapseBySupportEdit {
    change: RecordedChange,
    collapsed: Vec<NodeId>,
}

recorded_edit!(CollapseBySupportEdit);

impl CollapseBySupportEdit {
    pub fn new(
        tree: &Tree,
        root: NodeId,
        adapter: &dyn NodeBranchDataAdapter,
        threshold: f64,
    ) -> Result<Self> {
        let name = format!("Collapse nodes with {} < {threshold}", adapter.description());
        let (change, collapsed) = RecordedChange::record(
            tree,
            name,
            ChangeKind::LeafOrderInvariant,
            |scratch, warnings| collapse_below(scratch, root, adapter, threshold, warnings),
        )?;
        Ok(Self { change, collapsed })
    }

    /// Nodes removed by this edit, in preorder.
    pub fn collapsed(&self) -> &[NodeId] {
        &self.collapsed
    }
}

fn collapse_below(
    tree: &mut Tree,
    root: NodeId,
    adapter: &dyn NodeBranchDataAdapter,
    threshold: f64,
    warnings: &mut EditWarnings,
) -> Result<Vec<NodeId>> {
    let mut targets = Vec::new();
    let mut invalid = 0usize;
    for node in tree.preorder(root) {
        if tree.is_leaf(node) || tree.is_root(node) {
            continue;
        }
        match adapter.decimal(tree, node) {
            Some(value) if value < threshold => targets.push(node),
            Some(_) => {}
            None => invalid += 1,
        }
    }

    let mut reanchored = 0usize;
    for &node in &targets {
        reanchored += collapse_node(tree, node)?;
    }
    tracing::debug!(collapsed = targets.len(), invalid, reanchored, "collapse by support");

    let mut notes = Vec::new();
    if invalid > 0 {
        notes.push(format!(
            "{invalid} internal node(s) had no decimal value for {} and were not collapsed",
            adapter.description()
        ));
    }
    if reanchored > 0 {
        notes.push(format!(
            "{reanchored} legend(s) were re-anchored to the parent of a collapsed node"
        ));
    }
    if !notes.is_empty() {
        warnings.push(format!("{}.", notes.join("; ")));
    }
    Ok(targets)
}

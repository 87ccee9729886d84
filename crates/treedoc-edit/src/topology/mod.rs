//! Edits that rewrite the shape of the tree.

pub mod collapse;
pub mod ladderize;
pub mod leaf_set;
pub mod reroot;
pub mod separate;
pub mod sort_leaves;

pub use collapse::{CollapseBySupportEdit, CollapseEdit};
pub use ladderize::{LadderizeDirection, LadderizeEdit, LadderizeMetric, LadderizeOptions};
pub use leaf_set::{LeafSet, LeafSetIndex, RerootCandidates, find_reroot_branch};
pub use reroot::RerootEdit;
pub use separate::{FormatSource, JoinEdit, SeparateEdit, SeparateOptions};
pub use sort_leaves::{SortLeavesEdit, leaf_order_from_lines, leaf_order_from_tree};

use crate::edit::EditWarnings;
use crate::error::{Error, Result};
use crate::legend_anchor;
use treedoc_core::id_manager::{self, RemovedIdElement};
use treedoc_core::{Branch, NodeId, Tree};

/// Sum of the defined parts; undefined only if both are undefined.
pub(crate) fn merge_lengths(a: f64, b: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => f64::NAN,
        (true, false) => b,
        (false, true) => a,
        (false, false) => a + b,
    }
}

/// Half of a length; undefined stays undefined.
pub(crate) fn half(length: f64) -> f64 {
    length / 2.0
}

pub(crate) fn report_dropped(
    tree: &Tree,
    node: NodeId,
    dropped: &[RemovedIdElement],
    warnings: &mut EditWarnings,
) {
    if dropped.is_empty() {
        return;
    }
    let ids: Vec<&str> = dropped.iter().map(RemovedIdElement::id).collect();
    let name = tree.node(node).data().to_string();
    let node_name = if name.is_empty() {
        node.to_string()
    } else {
        format!("\"{name}\"")
    };
    warnings.push(format!(
        "Merging branches at node {node_name} dropped element(s) with duplicate ID(s): {}.",
        ids.join(", ")
    ));
}

/// Moves `branch` onto `node`, reporting elements dropped because of ID collisions with the
/// node's hidden data.
pub(crate) fn install_branch(
    tree: &mut Tree,
    node: NodeId,
    branch: Branch,
    warnings: &mut EditWarnings,
) {
    let (_, dropped) = id_manager::replace_branch(tree, node, branch);
    report_dropped(tree, node, &dropped, warnings);
}

/// Removes `node`, which must have exactly one child, letting the child take its place.
///
/// The two branches are merged: lengths are summed and the removed node's labels and hidden
/// data move to the child's branch (the child wins ID collisions). Legends anchored at the removed
/// node move to its parent, or to the child if there is no parent. Returns the child.
pub(crate) fn splice_out_unary(
    tree: &mut Tree,
    node: NodeId,
    operation: &'static str,
    warnings: &mut EditWarnings,
) -> Result<NodeId> {
    let &[child] = tree.children(node) else {
        return Err(Error::precondition(
            operation,
            format!(
                "node {node} has {} children, expected exactly one",
                tree.children(node).len()
            ),
        ));
    };

    let (removed_branch, _) = id_manager::replace_branch(tree, node, Branch::new());
    tree.detach(child);
    let parent = match tree.detach(node) {
        Some((parent, index)) => {
            tree.insert_child(parent, index, child)?;
            Some(parent)
        }
        None => {
            if tree.paint_start() == Some(node) {
                tree.set_paint_start(Some(child))?;
            }
            None
        }
    };

    let length = merge_lengths(tree.branch(child).length(), removed_branch.length());
    tree.branch_mut(child).set_length(length);
    let dropped = id_manager::merge_branch_payload(tree, child, removed_branch);
    report_dropped(tree, child, &dropped, warnings);

    legend_anchor::reanchor_removed(tree, node, parent.unwrap_or(child));
    Ok(child)
}

//! Keeping legend anchors valid when nodes disappear.
//!
//! Legends refer to nodes by unique name. A node without a unique name cannot be an anchor, so
//! only named nodes need any handling.

use crate::edit::EditWarnings;
use treedoc_core::{NodeId, Tree};

/// Retargets every legend anchored at `removed` to `replacement`. Returns the number of legends
/// that were changed.
pub(crate) fn reanchor_removed(tree: &mut Tree, removed: NodeId, replacement: NodeId) -> usize {
    let Some(old) = tree.node(removed).unique_name().map(str::to_string) else {
        return 0;
    };
    let affected: Vec<_> = tree
        .legends()
        .iter()
        .filter(|l| l.is_anchored_to(&old))
        .filter_map(|l| l.handle())
        .collect();
    if affected.is_empty() {
        return 0;
    }
    let new = tree.ensure_unique_name(replacement);
    for handle in &affected {
        if let Some(mut legend) = tree.legend_mut(*handle) {
            legend.replace_anchor(&old, &new);
        }
    }
    tracing::debug!(count = affected.len(), %removed, %replacement, "legends re-anchored");
    affected.len()
}

/// Updates legends for the removal of the subtree below `root`: legends with all anchors inside
/// are deleted, legends with one of two anchors inside keep the other one.
pub(crate) fn remove_subtree_anchors(tree: &mut Tree, root: NodeId, warnings: &mut EditWarnings) {
    let names: Vec<String> = tree
        .preorder(root)
        .into_iter()
        .filter_map(|n| tree.node(n).unique_name().map(str::to_string))
        .collect();
    if names.is_empty() {
        return;
    }
    let inside = |anchor: &str| names.iter().any(|n| n == anchor);

    let mut deleted = 0usize;
    let mut reduced = 0usize;
    for handle in tree.legends().handles() {
        let Some(legend) = tree.legends().get(handle) else {
            continue;
        };
        let kept: Vec<String> = legend
            .anchors()
            .filter(|a| !inside(a))
            .map(str::to_string)
            .collect();
        let total = legend.anchors().count();
        if kept.len() == total {
            continue;
        }
        match kept.into_iter().next() {
            None => {
                if tree.remove_legend(handle).is_ok() {
                    deleted += 1;
                }
            }
            Some(anchor) => {
                if let Some(mut legend) = tree.legend_mut(handle) {
                    legend.set_anchors(anchor, None);
                    reduced += 1;
                }
            }
        }
    }
    if deleted > 0 {
        warnings.push(format!(
            "{deleted} legend(s) anchored only inside the removed subtree were deleted."
        ));
    }
    if reduced > 0 {
        warnings.push(format!(
            "{reduced} legend(s) lost one of their two anchors and now refer to a single node."
        ));
    }
}

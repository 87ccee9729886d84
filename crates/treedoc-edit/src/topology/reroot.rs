use super::leaf_set::{self, RerootCandidates};
use super::{half, install_branch, splice_out_unary};
use crate::edit::{EditWarnings, RecordedChange, recorded_edit};
use crate::error::{Error, Result};
use treedoc_core::{Branch, ChangeKind, NodeId, Tree};

const REROOT: &str = "reroot";

/// Moves the root of the tree onto a branch.
///
/// A new root node is inserted on the target branch, splitting its length evenly. Every edge on
/// the path from the target up to the old root is reversed; branch payloads (length, labels,
/// hidden data) travel with their edge. If the old root is left with a single child it is removed
/// and its two branches are merged.
#[derive(Debug)]
pub struct RerootEdit {
    change: RecordedChange,
    new_root: NodeId,
    candidates: Option<RerootCandidates>,
}

recorded_edit!(RerootEdit);

impl RerootEdit {
    /// Reroots on the afferent branch of `target`.
    pub fn new(tree: &Tree, target: NodeId) -> Result<Self> {
        let (change, new_root) =
            RecordedChange::record(tree, "Reroot", ChangeKind::Topology, |scratch, warnings| {
                reroot(scratch, target, warnings)
            })?;
        Ok(Self {
            change,
            new_root,
            candidates: None,
        })
    }

    /// Reroots so that all of `leaves` end up on one side of the root.
    ///
    /// If several branches are equally good, the first in preorder is used; the others are
    /// available through [`RerootEdit::candidates`].
    pub fn by_leaf_set(tree: &Tree, leaves: &[NodeId]) -> Result<Self> {
        let candidates = leaf_set::find_reroot_branch(tree, leaves)?;
        Self::by_candidate(tree, candidates.default, candidates)
    }

    /// Reroots on one of the alternatives of an earlier leaf set search.
    pub fn by_candidate(tree: &Tree, target: NodeId, candidates: RerootCandidates) -> Result<Self> {
        if !candidates.alternatives.contains(&target) {
            return Err(Error::precondition(
                REROOT,
                format!("node {target} is not one of the candidate branches"),
            ));
        }
        let mut edit = Self::new(tree, target)?;
        edit.candidates = Some(candidates);
        Ok(edit)
    }

    pub fn new_root(&self) -> NodeId {
        self.new_root
    }

    pub fn candidates(&self) -> Option<&RerootCandidates> {
        self.candidates.as_ref()
    }
}

pub(crate) fn reroot(tree: &mut Tree, target: NodeId, warnings: &mut EditWarnings) -> Result<NodeId> {
    let Some(old_root) = tree.paint_start() else {
        return Err(Error::precondition(REROOT, "the tree is empty"));
    };
    if tree.is_root(target) {
        return Err(Error::precondition(
            REROOT,
            format!("node {target} is already the root"),
        ));
    }
    if !tree.is_ancestor_or_self(old_root, target) {
        return Err(Error::precondition(
            REROOT,
            format!("node {target} is not part of the tree"),
        ));
    }

    // path[0] is the target's parent, path[last] the old root.
    let path: Vec<NodeId> = tree.path_to_root(target).into_iter().skip(1).collect();

    // Without a length both sides of the new root get zero so they still have one.
    let target_length = tree.branch(target).length();
    let side_length = if target_length.is_nan() {
        0.0
    } else {
        half(target_length)
    };
    let upper_half = {
        let mut b = tree.branch(target).without_payload();
        b.set_length(side_length);
        b
    };
    tree.branch_mut(target).set_length(side_length);

    // Detach every edge of the path, remembering the slot each path child occupied.
    let mut slots = Vec::with_capacity(path.len());
    let mut child = target;
    for &node in &path {
        let Some((_, index)) = tree.detach(child) else {
            return Err(Error::precondition(REROOT, "unexpected topology on the root path"));
        };
        slots.push(index);
        child = node;
    }

    // Branch payloads travel with their edge: the edge (path[i], path[i + 1]) keeps the branch of
    // path[i] and is now the afferent branch of path[i + 1].
    let mut moved: Vec<Branch> = Vec::with_capacity(path.len());
    for &node in &path {
        let (branch, _) = treedoc_core::id_manager::replace_branch(tree, node, Branch::new());
        moved.push(branch);
    }

    let new_root = tree.new_node();
    tree.add_child(new_root, target)?;
    tree.add_child(new_root, path[0])?;
    install_branch(tree, path[0], upper_half, warnings);
    for i in 0..path.len() - 1 {
        tree.insert_child(path[i], slots[i], path[i + 1])?;
        install_branch(tree, path[i + 1], moved[i].clone(), warnings);
    }
    if let Some(mut root_branch) = moved.pop() {
        if target_length.is_nan() {
            root_branch.clear_length();
        }
        install_branch(tree, new_root, root_branch, warnings);
    }
    tree.set_paint_start(Some(new_root))?;

    if tree.children(old_root).len() == 1 {
        splice_out_unary(tree, old_root, REROOT, warnings)?;
    }
    tracing::debug!(%target, %new_root, path = path.len(), "rerooted");
    Ok(new_root)
}

//! Leaf-set bit vectors and outgroup (leaf set) rerooting.

use crate::error::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use treedoc_core::{NodeId, Tree};

const REROOT_BY_LEAVES: &str = "reroot by leaf set";

/// Fixed-size bit vector over the leaves of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafSet {
    words: Vec<u64>,
    len: usize,
}

impl LeafSet {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Number of leaves the set ranges over (not the number of members).
    pub fn capacity(&self) -> usize {
        self.len
    }

    pub fn insert(&mut self, index: usize) {
        if index < self.len {
            self.words[index / 64] |= 1 << (index % 64);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] & (1 << (index % 64)) != 0
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn union_with(&mut self, other: &LeafSet) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    pub fn is_superset_of(&self, other: &LeafSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & b == *b)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| self.contains(i))
    }
}

/// Leaf sets of every node below a root, computed in one postorder pass.
///
/// Leaves are numbered in drawing order.
#[derive(Debug, Clone)]
pub struct LeafSetIndex {
    root: NodeId,
    leaves: Vec<NodeId>,
    leaf_index: FxHashMap<NodeId, usize>,
    sets: FxHashMap<NodeId, LeafSet>,
}

impl LeafSetIndex {
    pub fn build(tree: &Tree, root: NodeId) -> Self {
        let leaves = tree.leaves(root);
        let leaf_index: FxHashMap<NodeId, usize> =
            leaves.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let mut sets: FxHashMap<NodeId, LeafSet> = FxHashMap::default();
        for node in tree.postorder(root) {
            let mut set = LeafSet::new(leaves.len());
            match leaf_index.get(&node) {
                Some(&i) => set.insert(i),
                None => {
                    for child in tree.children(node) {
                        if let Some(child_set) = sets.get(child) {
                            set.union_with(child_set);
                        }
                    }
                }
            }
            sets.insert(node, set);
        }
        Self {
            root,
            leaves,
            leaf_index,
            sets,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn leaf_index(&self, leaf: NodeId) -> Option<usize> {
        self.leaf_index.get(&leaf).copied()
    }

    pub fn leaf_set(&self, node: NodeId) -> Option<&LeafSet> {
        self.sets.get(&node)
    }

    /// Leaf set of the given leaves. `None` if one of them is not a leaf of this index.
    pub fn set_of(&self, leaves: &[NodeId]) -> Option<LeafSet> {
        let mut set = LeafSet::new(self.leaf_count());
        for leaf in leaves {
            set.insert(self.leaf_index(*leaf)?);
        }
        Some(set)
    }
}

/// Result of the outgroup search: branches (identified by the node they lead to) on which the
/// tree can be rerooted so that all requested leaves end up on one side of the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RerootCandidates {
    /// Smallest clade containing all requested leaves.
    pub clade_root: NodeId,
    /// Default choice: the first best candidate in preorder.
    pub default: NodeId,
    /// Every candidate with the same (maximal) leaf count, in preorder, `default` included.
    pub alternatives: Vec<NodeId>,
    /// Number of leaves separated from the requested ones by the chosen branch.
    pub leaf_count: usize,
}

/// Finds the branch to reroot on for an outgroup `leaves`.
///
/// The path from every requested leaf up to their most recent common ancestor `L` is marked.
/// Candidate branches are the branch above `L` (separating everything outside `L`) and the branch
/// of every unmarked child of a marked node. The candidate separating the most leaves wins.
pub fn find_reroot_branch(tree: &Tree, leaves: &[NodeId]) -> Result<RerootCandidates> {
    let Some(root) = tree.paint_start() else {
        return Err(Error::precondition(REROOT_BY_LEAVES, "the tree is empty"));
    };
    if leaves.is_empty() {
        return Err(Error::precondition(REROOT_BY_LEAVES, "no leaves were given"));
    }
    let index = LeafSetIndex::build(tree, root);
    let Some(requested) = index.set_of(leaves) else {
        return Err(Error::precondition(
            REROOT_BY_LEAVES,
            "all given nodes must be leaves of the tree",
        ));
    };
    if requested.count() == index.leaf_count() {
        return Err(Error::precondition(
            REROOT_BY_LEAVES,
            "the outgroup must not contain every leaf of the tree",
        ));
    }

    let mut clade_root = leaves[0];
    for &leaf in &leaves[1..] {
        clade_root = tree
            .most_recent_common_ancestor(clade_root, leaf)
            .unwrap_or(root);
    }

    let mut marked: FxHashSet<NodeId> = FxHashSet::default();
    for &leaf in leaves {
        let mut cur = leaf;
        while marked.insert(cur) && cur != clade_root {
            match tree.parent(cur) {
                Some(p) => cur = p,
                None => break,
            }
        }
    }

    let count_of = |node: NodeId| index.leaf_set(node).map_or(0, LeafSet::count);
    let mut candidates: Vec<(NodeId, usize)> = Vec::new();
    for node in tree.preorder(clade_root) {
        if node == clade_root && node != root {
            candidates.push((node, index.leaf_count() - count_of(node)));
        }
        if marked.contains(&node) {
            for &child in tree.children(node) {
                if !marked.contains(&child) {
                    candidates.push((child, count_of(child)));
                }
            }
        }
    }

    let Some(best) = candidates.iter().map(|&(_, count)| count).max() else {
        return Err(Error::precondition(
            REROOT_BY_LEAVES,
            "no branch separates the given leaves from the rest of the tree",
        ));
    };
    let alternatives: Vec<NodeId> = candidates
        .iter()
        .filter(|&&(_, count)| count == best)
        .map(|&(node, _)| node)
        .collect();
    let default = alternatives[0];
    tracing::debug!(
        %clade_root,
        %default,
        alternatives = alternatives.len(),
        leaf_count = best,
        "reroot branch selected"
    );
    Ok(RerootCandidates {
        clade_root,
        default,
        alternatives,
        leaf_count: best,
    })
}

use crate::edit::{EditWarnings, RecordedChange, recorded_edit};
use crate::error::Result;
use rustc_hash::{FxHashMap, FxHashSet};
use treedoc_core::{ChangeKind, NodeBranchDataAdapter, NodeId, TextElementData, Tree};

/// Reorders subtrees so that the leaves follow an external order as closely as the topology
/// allows.
///
/// Every node is assigned the average order index of the leaves below it (leaves missing from the
/// order count as "after the last entry"); children are then sorted by that average at every
/// level.
#[derive(Debug)]
pub struct SortLeavesEdit {
    change: RecordedChange,
    unmatched_entries: Vec<TextElementData>,
    unmatched_leaves: Vec<NodeId>,
}

recorded_edit!(SortLeavesEdit);

impl SortLeavesEdit {
    /// Sorts the subtree of `root`, matching leaves to `order` through the values `adapter`
    /// reads from them.
    pub fn new(
        tree: &Tree,
        root: NodeId,
        order: &[TextElementData],
        adapter: &dyn NodeBranchDataAdapter,
    ) -> Result<Self> {
        let (change, (unmatched_entries, unmatched_leaves)) = RecordedChange::record(
            tree,
            "Sort leaves",
            ChangeKind::Topology,
            |scratch, warnings| sort_leaves(scratch, root, order, adapter, warnings),
        )?;
        Ok(Self {
            change,
            unmatched_entries,
            unmatched_leaves,
        })
    }

    /// Order entries no leaf matched.
    pub fn unmatched_entries(&self) -> &[TextElementData] {
        &self.unmatched_entries
    }

    /// Leaves that matched no order entry.
    pub fn unmatched_leaves(&self) -> &[NodeId] {
        &self.unmatched_leaves
    }
}

/// Leaves are matched to entries by their formatted text, so `"1"` matches a decimal `1`.
fn match_key(value: &TextElementData) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

type Unmatched = (Vec<TextElementData>, Vec<NodeId>);

fn sort_leaves(
    tree: &mut Tree,
    root: NodeId,
    order: &[TextElementData],
    adapter: &dyn NodeBranchDataAdapter,
    warnings: &mut EditWarnings,
) -> Result<Unmatched> {
    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    for (i, entry) in order.iter().enumerate() {
        if let Some(key) = match_key(entry) {
            positions.entry(key).or_insert(i);
        }
    }

    let sentinel = order.len();
    let mut matched: FxHashSet<usize> = FxHashSet::default();
    let mut unmatched_leaves = Vec::new();
    // (sum of order indices, leaf count) per node
    let mut stats: FxHashMap<NodeId, (f64, usize)> = FxHashMap::default();
    for node in tree.postorder(root) {
        let stat = if tree.is_leaf(node) {
            let index = match match_key(&adapter.read(tree, node)).and_then(|k| positions.get(&k))
            {
                Some(&i) => {
                    matched.insert(i);
                    i
                }
                None => {
                    unmatched_leaves.push(node);
                    sentinel
                }
            };
            (index as f64, 1)
        } else {
            tree.children(node)
                .iter()
                .filter_map(|c| stats.get(c))
                .fold((0.0, 0), |(s, n), &(cs, cn)| (s + cs, n + cn))
        };
        stats.insert(node, stat);
    }

    let average = |n: &NodeId| {
        stats
            .get(n)
            .filter(|(_, count)| *count > 0)
            .map_or(sentinel as f64, |(sum, count)| sum / *count as f64)
    };
    for node in tree.preorder(root) {
        if tree.children(node).len() < 2 {
            continue;
        }
        let mut children = tree.children(node).to_vec();
        children.sort_by(|a, b| average(a).total_cmp(&average(b)));
        if children != tree.children(node) {
            tree.set_children_order(node, children)?;
        }
    }

    let unmatched_entries: Vec<TextElementData> = order
        .iter()
        .enumerate()
        .filter(|(i, entry)| !entry.is_empty() && !matched.contains(i))
        .map(|(_, entry)| entry.clone())
        .collect();

    if !unmatched_entries.is_empty() {
        let listed: Vec<String> = unmatched_entries.iter().map(|e| e.to_string()).collect();
        warnings.push(format!(
            "{} order entr{} did not match any leaf: {}.",
            unmatched_entries.len(),
            if unmatched_entries.len() == 1 { "y" } else { "ies" },
            listed.join(", ")
        ));
    }
    if !unmatched_leaves.is_empty() {
        let listed: Vec<String> = unmatched_leaves
            .iter()
            .map(|&leaf| {
                let value = adapter.read(tree, leaf);
                if value.is_empty() {
                    leaf.to_string()
                } else {
                    value.to_string()
                }
            })
            .collect();
        warnings.push(format!(
            "{} lea{} not found in the order and moved to the end: {}.",
            unmatched_leaves.len(),
            if unmatched_leaves.len() == 1 { "f was" } else { "ves were" },
            listed.join(", ")
        ));
    }
    Ok((unmatched_entries, unmatched_leaves))
}

/// Leaf values of the subtree of `root` in drawing order.
pub fn leaf_order_from_tree(
    tree: &Tree,
    root: NodeId,
    adapter: &dyn NodeBranchDataAdapter,
) -> Vec<TextElementData> {
    tree.leaves(root)
        .into_iter()
        .map(|leaf| adapter.read(tree, leaf))
        .collect()
}

/// One order entry per non-blank line.
pub fn leaf_order_from_lines(text: &str) -> Vec<TextElementData> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(TextElementData::parse)
        .collect()
}

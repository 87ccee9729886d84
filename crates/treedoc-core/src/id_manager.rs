//! Per-node ID uniqueness across labels, hidden node data and hidden branch data.
//!
//! For every node, the non-empty IDs of the labels on its afferent branch, its hidden node data
//! keys and its hidden branch data keys form one namespace. The same ID may be used on different
//! nodes. Empty IDs are never indexed or checked.

use crate::error::{Error, Result};
use crate::label::{Label, LabelHandle, LabelKind, LabelKindTag};
use crate::text::TextElementData;
use crate::tree::{Branch, NodeId, Tree};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Location of the element holding an ID on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdHolder {
    Label(LabelHandle),
    HiddenNodeData,
    HiddenBranchData,
}

/// An ID-bearing element that was removed to make room for another one.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovedIdElement {
    Label(Label),
    HiddenNodeData {
        id: String,
        value: TextElementData,
    },
    HiddenBranchData {
        id: String,
        value: TextElementData,
    },
}

impl RemovedIdElement {
    pub fn id(&self) -> &str {
        match self {
            Self::Label(label) => label.id(),
            Self::HiddenNodeData { id, .. } | Self::HiddenBranchData { id, .. } => id,
        }
    }
}

/// What to do when an inserted element's ID is already used on the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Fail with [`Error::DuplicateId`] and leave the tree unchanged.
    #[default]
    Reject,
    /// Remove the previous holder and hand it back to the caller.
    Replace,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted,
    Replaced(RemovedIdElement),
}

impl InsertOutcome {
    pub fn replaced(&self) -> Option<&RemovedIdElement> {
        match self {
            Self::Inserted => None,
            Self::Replaced(prev) => Some(prev),
        }
    }
}

/// Scope of [`ids_in_subtree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdQuery {
    /// Label kinds to include; `None` includes every kind.
    pub label_kinds: Option<BTreeSet<LabelKindTag>>,
    pub hidden_node_data: bool,
    pub hidden_branch_data: bool,
}

impl IdQuery {
    pub fn all() -> Self {
        Self {
            label_kinds: None,
            hidden_node_data: true,
            hidden_branch_data: true,
        }
    }

    pub fn labels(kinds: impl IntoIterator<Item = LabelKindTag>) -> Self {
        Self {
            label_kinds: Some(kinds.into_iter().collect()),
            hidden_node_data: false,
            hidden_branch_data: false,
        }
    }

    fn includes(&self, tag: LabelKindTag) -> bool {
        self.label_kinds.as_ref().is_none_or(|kinds| kinds.contains(&tag))
    }
}

impl Default for IdQuery {
    fn default() -> Self {
        Self::all()
    }
}

pub fn element_with_id(tree: &Tree, node: NodeId, id: &str) -> Option<IdHolder> {
    if id.is_empty() {
        return None;
    }
    let n = tree.node(node);
    if let Some(label) = n.afferent_branch().labels().by_id(id) {
        return label.handle().map(IdHolder::Label);
    }
    if n.hidden_data().contains_key(id) {
        return Some(IdHolder::HiddenNodeData);
    }
    if n.afferent_branch().hidden_data().contains_key(id) {
        return Some(IdHolder::HiddenBranchData);
    }
    None
}

pub fn is_id_present(tree: &Tree, node: NodeId, id: &str) -> bool {
    element_with_id(tree, node, id).is_some()
}

/// Value stored under `id` on `node`: the data of a text label or a hidden data entry.
pub fn value_for_id<'a>(tree: &'a Tree, node: NodeId, id: &str) -> Option<&'a TextElementData> {
    if id.is_empty() {
        return None;
    }
    let n = tree.node(node);
    if let Some(label) = n.afferent_branch().labels().by_id(id) {
        return label.text_data();
    }
    n.hidden_data()
        .get(id)
        .or_else(|| n.afferent_branch().hidden_data().get(id))
}

/// Removes whatever holds `id` on `node` and returns it.
pub fn remove_element_with_id(tree: &mut Tree, node: NodeId, id: &str) -> Option<RemovedIdElement> {
    match element_with_id(tree, node, id)? {
        IdHolder::Label(_) => tree
            .branch_entry_mut(node)
            .labels_mut()
            .remove_by_id(id)
            .map(RemovedIdElement::Label),
        IdHolder::HiddenNodeData => tree
            .node_entry_mut(node)
            .hidden_data_mut()
            .remove(id)
            .map(|value| RemovedIdElement::HiddenNodeData {
                id: id.to_string(),
                value,
            }),
        IdHolder::HiddenBranchData => tree
            .branch_entry_mut(node)
            .hidden_data_mut()
            .remove(id)
            .map(|value| RemovedIdElement::HiddenBranchData {
                id: id.to_string(),
                value,
            }),
    }
}

fn make_room(
    tree: &mut Tree,
    node: NodeId,
    id: &str,
    policy: ConflictPolicy,
) -> Result<InsertOutcome> {
    if !is_id_present(tree, node, id) {
        return Ok(InsertOutcome::Inserted);
    }
    match policy {
        ConflictPolicy::Reject => Err(Error::DuplicateId {
            id: id.to_string(),
            node,
        }),
        ConflictPolicy::Replace => Ok(remove_element_with_id(tree, node, id)
            .map(InsertOutcome::Replaced)
            .unwrap_or(InsertOutcome::Inserted)),
    }
}

/// Inserts `label` on the afferent branch of `node`.
pub fn insert_label(
    tree: &mut Tree,
    node: NodeId,
    label: Label,
    policy: ConflictPolicy,
) -> Result<(LabelHandle, InsertOutcome)> {
    let outcome = make_room(tree, node, label.id(), policy)?;
    let handle = tree.attach_label(node, label);
    Ok((handle, outcome))
}

pub fn insert_hidden_node_data(
    tree: &mut Tree,
    node: NodeId,
    id: &str,
    value: TextElementData,
    policy: ConflictPolicy,
) -> Result<InsertOutcome> {
    require_id(id)?;
    let outcome = make_room(tree, node, id, policy)?;
    tree.node_entry_mut(node)
        .hidden_data_mut()
        .insert(id.to_string(), value);
    Ok(outcome)
}

pub fn insert_hidden_branch_data(
    tree: &mut Tree,
    node: NodeId,
    id: &str,
    value: TextElementData,
    policy: ConflictPolicy,
) -> Result<InsertOutcome> {
    require_id(id)?;
    let outcome = make_room(tree, node, id, policy)?;
    tree.branch_entry_mut(node)
        .hidden_data_mut()
        .insert(id.to_string(), value);
    Ok(outcome)
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidId {
            id: id.to_string(),
            message: "hidden data keys must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Changes the ID of a label in place.
pub fn change_label_id(
    tree: &mut Tree,
    handle: LabelHandle,
    new_id: &str,
    policy: ConflictPolicy,
) -> Result<InsertOutcome> {
    let node = tree.label_owner(handle).ok_or(Error::UnknownLabel(handle))?;
    let current = tree
        .branch(node)
        .labels()
        .get(handle)
        .map(|l| l.id().to_string())
        .ok_or(Error::UnknownLabel(handle))?;
    if current == new_id {
        return Ok(InsertOutcome::Inserted);
    }
    let outcome = make_room(tree, node, new_id, policy)?;
    if let Some(label) = tree
        .branch_entry_mut(node)
        .labels_mut()
        .labels_mut()
        .find(|l| l.handle() == Some(handle))
    {
        label.set_id(new_id);
    }
    Ok(outcome)
}

/// Replaces the afferent branch of `node` with `branch`.
///
/// IDs of the incoming branch that collide with the node's hidden node data are resolved in
/// favor of the node: the colliding labels/entries are dropped from the branch and returned.
pub fn replace_branch(
    tree: &mut Tree,
    node: NodeId,
    mut branch: Branch,
) -> (Branch, Vec<RemovedIdElement>) {
    let mut dropped = Vec::new();
    let node_keys: Vec<String> = tree.node(node).hidden_data().keys().map(String::from).collect();
    for key in node_keys {
        if let Some(label) = branch.labels_mut().remove_by_id(&key) {
            dropped.push(RemovedIdElement::Label(label));
        }
        if let Some(value) = branch.hidden_data_mut().remove(&key) {
            dropped.push(RemovedIdElement::HiddenBranchData { id: key, value });
        }
    }
    let label_ids: Vec<String> = branch
        .labels()
        .iter()
        .filter(|l| l.has_id())
        .map(|l| l.id().to_string())
        .collect();
    for id in label_ids {
        if let Some(value) = branch.hidden_data_mut().remove(&id) {
            dropped.push(RemovedIdElement::HiddenBranchData { id, value });
        }
    }
    let previous = tree.replace_branch(node, branch);
    (previous, dropped)
}

/// Moves the labels and hidden data of `donor` onto the afferent branch of `node`.
///
/// Donor elements whose ID is already used on `node` are dropped and returned. Length and format
/// of the donor are ignored. Labels keep their handles.
pub fn merge_branch_payload(
    tree: &mut Tree,
    node: NodeId,
    mut donor: Branch,
) -> Vec<RemovedIdElement> {
    let mut dropped = Vec::new();
    for label in donor.labels_mut().take_all() {
        if is_id_present(tree, node, label.id()) {
            dropped.push(RemovedIdElement::Label(label));
        } else {
            tree.attach_label(node, label);
        }
    }
    for (key, value) in donor.hidden_data().iter() {
        if is_id_present(tree, node, key) {
            dropped.push(RemovedIdElement::HiddenBranchData {
                id: key.to_string(),
                value: value.clone(),
            });
        } else {
            tree.branch_entry_mut(node)
                .hidden_data_mut()
                .insert(key.to_string(), value.clone());
        }
    }
    dropped
}

/// Deduplicated, alphabetically sorted IDs used anywhere below `root`.
pub fn ids_in_subtree(tree: &Tree, root: NodeId, query: &IdQuery) -> Vec<String> {
    let mut ids: BTreeSet<String> = BTreeSet::new();
    for id in tree.preorder(root) {
        let node = tree.node(id);
        for label in node.afferent_branch().labels().iter() {
            if label.has_id() && query.includes(label.tag()) {
                ids.insert(label.id().to_string());
            }
        }
        if query.hidden_node_data {
            ids.extend(node.hidden_data().keys().map(String::from));
        }
        if query.hidden_branch_data {
            ids.extend(node.afferent_branch().hidden_data().keys().map(String::from));
        }
    }
    ids.into_iter().collect()
}

/// Nodes below `root` that hold `id` in any of their ID containers.
pub fn nodes_with_id(tree: &Tree, root: NodeId, id: &str) -> Vec<NodeId> {
    tree.preorder(root)
        .into_iter()
        .filter(|&n| is_id_present(tree, n, id))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenameSummary {
    /// Labels and hidden data entries whose ID changed.
    pub elements: usize,
    /// Pie chart value ID references that were rewritten.
    pub references: usize,
}

/// Renames `old` to `new` everywhere below `root`, including pie chart value references.
///
/// Fails without modifying anything if a node already uses `new` next to `old`.
pub fn rename_id(tree: &mut Tree, root: NodeId, old: &str, new: &str) -> Result<RenameSummary> {
    if old.is_empty() || new.is_empty() {
        return Err(Error::InvalidId {
            id: if old.is_empty() { old } else { new }.to_string(),
            message: "cannot rename from or to an empty ID".to_string(),
        });
    }
    if old == new {
        return Ok(RenameSummary::default());
    }

    let nodes = tree.preorder(root);
    if let Some(&node) = nodes
        .iter()
        .find(|&&n| is_id_present(tree, n, old) && is_id_present(tree, n, new))
    {
        return Err(Error::DuplicateId {
            id: new.to_string(),
            node,
        });
    }

    let mut summary = RenameSummary::default();
    for node in nodes {
        if !is_id_present(tree, node, old) && !references_id(tree, node, old) {
            continue;
        }
        let n = tree.node_entry_mut(node);
        if n.hidden_data.rename_key(old, new) {
            summary.elements += 1;
        }
        if n.branch.hidden_data_mut().rename_key(old, new) {
            summary.elements += 1;
        }
        for label in n.branch.labels_mut().labels_mut() {
            if label.id() == old {
                label.set_id(new);
                summary.elements += 1;
            }
            if let Some(pie) = label.pie_chart_data_mut() {
                for value_id in pie.value_ids.iter_mut().filter(|v| *v == old) {
                    *value_id = new.to_string();
                    summary.references += 1;
                }
            }
        }
    }
    Ok(summary)
}

fn references_id(tree: &Tree, node: NodeId, id: &str) -> bool {
    tree.branch(node).labels().iter().any(|l| {
        l.pie_chart_data()
            .is_some_and(|p| p.value_ids.iter().any(|v| v == id))
    })
}

/// Random ID that does not occur in `existing`.
pub fn new_id(existing: &[String]) -> String {
    loop {
        let candidate = format!("ID{}", Uuid::new_v4().simple());
        if !existing.iter().any(|e| *e == candidate) {
            return candidate;
        }
    }
}

/// Returns `id` itself if unused, otherwise `id` with the smallest numeric suffix (starting at 2)
/// that is not in `existing`.
pub fn uniquify(id: &str, existing: &[String]) -> String {
    let used = |candidate: &str| existing.iter().any(|e| e == candidate);
    if !used(id) {
        return id.to_string();
    }
    (2u64..)
        .map(|n| format!("{id}{n}"))
        .find(|candidate| !used(candidate))
        .unwrap_or_else(|| new_id(existing))
}

/// Sector angles (degrees) of a pie chart label on `node`.
///
/// Pie charts use the decimal values of their value IDs; missing or non-decimal values count as
/// zero and an all-zero chart falls back to uniform sectors. Captions always divide the circle
/// uniformly.
pub fn pie_chart_angles(tree: &Tree, node: NodeId, label: &Label) -> Vec<f64> {
    let Some(pie) = label.pie_chart_data() else {
        return Vec::new();
    };
    let count = pie.value_ids.len();
    if count == 0 {
        return Vec::new();
    }
    let uniform = vec![360.0 / count as f64; count];
    if matches!(label.kind, LabelKind::PieChartCaption(_)) {
        return uniform;
    }
    let values: Vec<f64> = pie
        .value_ids
        .iter()
        .map(|id| {
            value_for_id(tree, node, id)
                .and_then(TextElementData::as_decimal)
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(0.0)
        })
        .collect();
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 {
        return uniform;
    }
    values.iter().map(|v| v / sum * 360.0).collect()
}

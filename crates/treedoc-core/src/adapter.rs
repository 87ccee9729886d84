//! Uniform read/write access to one kind of per-node value.
//!
//! Topology operations that need "a value per node" (support values, leaf names used for
//! ordering) take an adapter instead of hard-coding where the value lives.

use crate::error::{Error, Result};
use crate::id_manager::{self, ConflictPolicy};
use crate::label::{Label, LabelKind};
use crate::text::TextElementData;
use crate::tree::{NodeId, Tree};
use std::fmt;

pub trait NodeBranchDataAdapter: fmt::Debug {
    /// Human readable name of the value source, e.g. `"Branch length"`.
    fn description(&self) -> String;

    fn read(&self, tree: &Tree, node: NodeId) -> TextElementData;

    fn write(&self, tree: &mut Tree, node: NodeId, value: TextElementData) -> Result<()>;

    fn is_editable(&self) -> bool {
        true
    }

    fn is_decimal(&self, tree: &Tree, node: NodeId) -> bool {
        self.read(tree, node).is_decimal()
    }

    fn is_string(&self, tree: &Tree, node: NodeId) -> bool {
        self.read(tree, node).is_string()
    }

    fn is_empty(&self, tree: &Tree, node: NodeId) -> bool {
        self.read(tree, node).is_empty()
    }

    fn decimal(&self, tree: &Tree, node: NodeId) -> Option<f64> {
        self.read(tree, node).as_decimal()
    }
}

fn write_error(adapter: &dyn NodeBranchDataAdapter, node: NodeId, message: impl Into<String>) -> Error {
    Error::AdapterWrite {
        adapter: adapter.description(),
        node,
        message: message.into(),
    }
}

/// The node's own data (its name in most imported trees).
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeNameAdapter;

impl NodeBranchDataAdapter for NodeNameAdapter {
    fn description(&self) -> String {
        "Node/branch data".to_string()
    }

    fn read(&self, tree: &Tree, node: NodeId) -> TextElementData {
        tree.node(node).data().clone()
    }

    fn write(&self, tree: &mut Tree, node: NodeId, value: TextElementData) -> Result<()> {
        tree.set_node_data(node, value);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BranchLengthAdapter;

impl NodeBranchDataAdapter for BranchLengthAdapter {
    fn description(&self) -> String {
        "Branch length".to_string()
    }

    fn read(&self, tree: &Tree, node: NodeId) -> TextElementData {
        tree.branch(node)
            .defined_length()
            .map(TextElementData::Decimal)
            .unwrap_or_default()
    }

    fn write(&self, tree: &mut Tree, node: NodeId, value: TextElementData) -> Result<()> {
        let length = match &value {
            TextElementData::Empty => f64::NAN,
            TextElementData::Decimal(v) => *v,
            TextElementData::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                write_error(self, node, format!("\"{s}\" is not a decimal value"))
            })?,
        };
        tree.branch_entry_mut(node).set_length(length);
        Ok(())
    }
}

/// The node's unique name. Writing a name already used elsewhere fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueNameAdapter;

impl NodeBranchDataAdapter for UniqueNameAdapter {
    fn description(&self) -> String {
        "Unique node name".to_string()
    }

    fn read(&self, tree: &Tree, node: NodeId) -> TextElementData {
        tree.node(node)
            .unique_name()
            .map(TextElementData::text)
            .unwrap_or_default()
    }

    fn write(&self, tree: &mut Tree, node: NodeId, value: TextElementData) -> Result<()> {
        let name = match value {
            TextElementData::Empty => None,
            other => Some(other.to_string()),
        };
        tree.set_unique_name(node, name)
    }
}

/// The data of the text label with a given ID. Writing to a node without that label creates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLabelAdapter {
    pub id: String,
}

impl TextLabelAdapter {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl NodeBranchDataAdapter for TextLabelAdapter {
    fn description(&self) -> String {
        format!("Text label \"{}\"", self.id)
    }

    fn read(&self, tree: &Tree, node: NodeId) -> TextElementData {
        tree.branch(node)
            .labels()
            .by_id(&self.id)
            .and_then(Label::text_data)
            .cloned()
            .unwrap_or_default()
    }

    fn write(&self, tree: &mut Tree, node: NodeId, value: TextElementData) -> Result<()> {
        if self.id.is_empty() {
            return Err(write_error(self, node, "text label adapters need an ID"));
        }
        match tree.branch_entry_mut(node).labels_mut().by_id_mut(&self.id) {
            Some(label) => match &mut label.kind {
                LabelKind::Text(slot) => {
                    *slot = value;
                    Ok(())
                }
                _ => Err(write_error(self, node, "the label with this ID is not a text label")),
            },
            None => {
                id_manager::insert_label(
                    tree,
                    node,
                    Label::text(self.id.clone(), value),
                    ConflictPolicy::Reject,
                )?;
                Ok(())
            }
        }
    }
}

/// A hidden node data entry. Writing [`TextElementData::Empty`] removes the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenNodeDataAdapter {
    pub id: String,
}

impl HiddenNodeDataAdapter {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl NodeBranchDataAdapter for HiddenNodeDataAdapter {
    fn description(&self) -> String {
        format!("Hidden node data \"{}\"", self.id)
    }

    fn read(&self, tree: &Tree, node: NodeId) -> TextElementData {
        tree.node(node)
            .hidden_data()
            .get(&self.id)
            .cloned()
            .unwrap_or_default()
    }

    fn write(&self, tree: &mut Tree, node: NodeId, value: TextElementData) -> Result<()> {
        if value.is_empty() {
            tree.node_entry_mut(node).hidden_data_mut().remove(&self.id);
            return Ok(());
        }
        if tree.node(node).hidden_data().contains_key(&self.id) {
            tree.node_entry_mut(node).hidden_data_mut().update(&self.id, value);
            return Ok(());
        }
        id_manager::insert_hidden_node_data(tree, node, &self.id, value, ConflictPolicy::Reject)?;
        Ok(())
    }
}

/// A hidden branch data entry (e.g. support values). Writing [`TextElementData::Empty`] removes
/// the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenBranchDataAdapter {
    pub id: String,
}

impl HiddenBranchDataAdapter {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl NodeBranchDataAdapter for HiddenBranchDataAdapter {
    fn description(&self) -> String {
        format!("Hidden branch data \"{}\"", self.id)
    }

    fn read(&self, tree: &Tree, node: NodeId) -> TextElementData {
        tree.branch(node)
            .hidden_data()
            .get(&self.id)
            .cloned()
            .unwrap_or_default()
    }

    fn write(&self, tree: &mut Tree, node: NodeId, value: TextElementData) -> Result<()> {
        if value.is_empty() {
            tree.branch_entry_mut(node).hidden_data_mut().remove(&self.id);
            return Ok(());
        }
        if tree.branch(node).hidden_data().contains_key(&self.id) {
            tree.branch_entry_mut(node).hidden_data_mut().update(&self.id, value);
            return Ok(());
        }
        id_manager::insert_hidden_branch_data(tree, node, &self.id, value, ConflictPolicy::Reject)?;
        Ok(())
    }
}

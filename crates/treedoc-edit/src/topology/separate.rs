use super::{half, splice_out_unary};
use crate::edit::{RecordedChange, recorded_edit};
use crate::error::{Error, Result};
use treedoc_core::{ChangeKind, NodeId, Tree};

const SEPARATE: &str = "separate branch";
const JOIN: &str = "join branches";

/// Where the inserted node takes its node and branch formats from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatSource {
    /// The node above the split branch (falls back to the child for a root).
    #[default]
    Parent,
    Child,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeparateOptions {
    pub format_source: FormatSource,
}

/// Splits the afferent branch of a node by inserting a new node in the middle of it.
///
/// The lower part keeps the labels and hidden data of the branch; both parts get half of the
/// length. Splitting the branch of the root makes the inserted node the new root.
#[derive(Debug)]
pub struct SeparateEdit {
    change: RecordedChange,
    inserted: NodeId,
}

recorded_edit!(SeparateEdit);

impl SeparateEdit {
    pub fn new(tree: &Tree, node: NodeId, options: SeparateOptions) -> Result<Self> {
        let (change, inserted) = RecordedChange::record(
            tree,
            "Separate branch",
            ChangeKind::LeafOrderInvariant,
            |scratch, _| separate(scratch, node, options),
        )?;
        Ok(Self { change, inserted })
    }

    /// The node inserted by this edit.
    pub fn inserted(&self) -> NodeId {
        self.inserted
    }
}

fn separate(tree: &mut Tree, node: NodeId, options: SeparateOptions) -> Result<NodeId> {
    let parent = tree.parent(node);
    if parent.is_none() && tree.paint_start() != Some(node) {
        return Err(Error::precondition(
            SEPARATE,
            format!("node {node} is not part of the tree"),
        ));
    }

    let format_node = match options.format_source {
        FormatSource::Parent => Some(parent.unwrap_or(node)),
        FormatSource::Child => Some(node),
        FormatSource::Default => None,
    };

    let length = half(tree.branch(node).length());
    let middle = tree.new_node();
    if let Some(source) = format_node {
        let node_format = tree.node(source).format.clone();
        let branch_format = tree.branch(source).format.clone();
        *tree.node_mut(middle).format_mut() = node_format;
        *tree.branch_mut(middle).format_mut() = branch_format;
    }
    tree.branch_mut(middle).set_length(length);
    tree.branch_mut(node).set_length(length);

    match tree.detach(node) {
        Some((parent, index)) => tree.insert_child(parent, index, middle)?,
        None => tree.set_paint_start(Some(middle))?,
    }
    tree.add_child(middle, node)?;
    Ok(middle)
}

/// Removes a node with exactly one child, joining its branch with the child's branch.
///
/// Lengths add up; labels and hidden data of the removed branch move to the child's branch,
/// dropping (and reporting) elements whose ID the child already uses.
#[derive(Debug)]
pub struct JoinEdit {
    change: RecordedChange,
    child: NodeId,
}

recorded_edit!(JoinEdit);

impl JoinEdit {
    pub fn new(tree: &Tree, node: NodeId) -> Result<Self> {
        let (change, child) = RecordedChange::record(
            tree,
            "Join branches",
            ChangeKind::LeafOrderInvariant,
            |scratch, warnings| splice_out_unary(scratch, node, JOIN, warnings),
        )?;
        Ok(Self { change, child })
    }

    /// The child that now carries the joined branch.
    pub fn child(&self) -> NodeId {
        self.child
    }
}

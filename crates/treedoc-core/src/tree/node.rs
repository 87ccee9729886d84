use super::NodeId;
use crate::format::{BranchFormat, NodeFormat};
use crate::hidden_data::{HiddenDataMap, HiddenDataMut, HiddenDataOwner};
use crate::label::{LabelHandle, LabelMut, Labels};
use crate::text::TextElementData;
use indexmap::IndexMap;
use std::ops::Deref;

/// The edge connecting a node to its parent. Owned by that node.
#[derive(Debug, Clone)]
pub struct Branch {
    length: f64,
    labels: Labels,
    hidden_data: HiddenDataMap,
    pub format: BranchFormat,
}

impl Branch {
    pub fn new() -> Self {
        Self {
            length: f64::NAN,
            labels: Labels::new(),
            hidden_data: HiddenDataMap::new(),
            format: BranchFormat::default(),
        }
    }

    pub fn with_length(length: f64) -> Self {
        Self {
            length,
            ..Self::new()
        }
    }

    /// Branch length; `NaN` if undefined.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn has_length(&self) -> bool {
        !self.length.is_nan()
    }

    pub fn defined_length(&self) -> Option<f64> {
        self.has_length().then_some(self.length)
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    pub fn clear_length(&mut self) {
        self.length = f64::NAN;
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub(crate) fn labels_mut(&mut self) -> &mut Labels {
        &mut self.labels
    }

    pub fn label_mut(&mut self, handle: LabelHandle) -> Option<LabelMut<'_>> {
        self.labels.get_mut(handle)
    }

    pub fn hidden_data(&self) -> &HiddenDataMap {
        &self.hidden_data
    }

    pub(crate) fn hidden_data_mut(&mut self) -> &mut HiddenDataMap {
        &mut self.hidden_data
    }

    /// Copy of this branch with length and format but without labels and hidden data.
    pub fn without_payload(&self) -> Self {
        Self {
            length: self.length,
            labels: Labels::new(),
            hidden_data: HiddenDataMap::new(),
            format: self.format.clone(),
        }
    }

    pub(crate) fn attach_to(&mut self, node: NodeId) {
        self.labels.set_owner(node);
        self.hidden_data.set_owner(HiddenDataOwner::Branch(node));
    }
}

impl Default for Branch {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        let same_length = self.length == other.length
            || (self.length.is_nan() && other.length.is_nan());
        same_length
            && self.labels == other.labels
            && self.hidden_data == other.hidden_data
            && self.format == other.format
    }
}

/// A tree node. Structure (parent/children) is only changed through [`super::Tree`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) branch: Branch,
    pub(crate) data: TextElementData,
    pub(crate) hidden_data: HiddenDataMap,
    pub(crate) unique_name: Option<String>,
    pub(crate) attributes: IndexMap<String, String>,
    pub format: NodeFormat,
}

impl Node {
    pub(crate) fn new(id: NodeId) -> Self {
        let mut node = Self {
            parent: None,
            children: Vec::new(),
            branch: Branch::new(),
            data: TextElementData::Empty,
            hidden_data: HiddenDataMap::new(),
            unique_name: None,
            attributes: IndexMap::new(),
            format: NodeFormat::default(),
        };
        node.relink(id);
        node
    }

    /// Re-points every back-reference held by this node's containers at `id`.
    pub(crate) fn relink(&mut self, id: NodeId) {
        self.branch.attach_to(id);
        self.hidden_data.set_owner(HiddenDataOwner::Node(id));
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn afferent_branch(&self) -> &Branch {
        &self.branch
    }

    pub(crate) fn afferent_branch_mut(&mut self) -> &mut Branch {
        &mut self.branch
    }

    pub fn data(&self) -> &TextElementData {
        &self.data
    }

    pub fn hidden_data(&self) -> &HiddenDataMap {
        &self.hidden_data
    }

    pub(crate) fn hidden_data_mut(&mut self) -> &mut HiddenDataMap {
        &mut self.hidden_data
    }

    pub fn unique_name(&self) -> Option<&str> {
        self.unique_name.as_deref()
    }

    /// Transient per-node attributes (e.g. importer bookkeeping). Never copied by cloning.
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

}

/// Mutable view of a node inside a tree.
///
/// Data, format and attributes can be edited freely. Hidden data and the afferent branch are
/// only reachable through views that keep them in place, so IDs and owner back-references stay
/// consistent.
///
/// ```compile_fail
/// use treedoc_core::{HiddenDataMap, Tree};
///
/// let mut tree = Tree::new();
/// let node = tree.new_node();
/// *tree.node_mut(node).hidden_data_mut() = HiddenDataMap::new();
/// ```
#[derive(Debug)]
pub struct NodeMut<'a> {
    node: &'a mut Node,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(node: &'a mut Node) -> Self {
        Self { node }
    }

    pub fn set_data(&mut self, data: impl Into<TextElementData>) {
        self.node.data = data.into();
    }

    pub fn format_mut(&mut self) -> &mut NodeFormat {
        &mut self.node.format
    }

    pub fn hidden_data_mut(&mut self) -> HiddenDataMut<'_> {
        HiddenDataMut::new(&mut self.node.hidden_data)
    }

    pub fn attributes_mut(&mut self) -> &mut IndexMap<String, String> {
        &mut self.node.attributes
    }

    pub fn afferent_branch_mut(&mut self) -> BranchMut<'_> {
        BranchMut::new(&mut self.node.branch)
    }
}

impl Deref for NodeMut<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

/// Mutable view of a branch inside a tree. See [`NodeMut`].
///
/// ```compile_fail
/// use treedoc_core::{Branch, Tree};
///
/// let mut tree = Tree::new();
/// let node = tree.new_node();
/// *tree.branch_mut(node) = Branch::with_length(1.0);
/// ```
#[derive(Debug)]
pub struct BranchMut<'a> {
    branch: &'a mut Branch,
}

impl<'a> BranchMut<'a> {
    pub(crate) fn new(branch: &'a mut Branch) -> Self {
        Self { branch }
    }

    pub fn set_length(&mut self, length: f64) {
        self.branch.set_length(length);
    }

    pub fn clear_length(&mut self) {
        self.branch.clear_length();
    }

    pub fn format_mut(&mut self) -> &mut BranchFormat {
        &mut self.branch.format
    }

    pub fn hidden_data_mut(&mut self) -> HiddenDataMut<'_> {
        HiddenDataMut::new(&mut self.branch.hidden_data)
    }

    pub fn label_mut(&mut self, handle: LabelHandle) -> Option<LabelMut<'_>> {
        self.branch.label_mut(handle)
    }
}

impl Deref for BranchMut<'_> {
    type Target = Branch;

    fn deref(&self) -> &Branch {
        self.branch
    }
}

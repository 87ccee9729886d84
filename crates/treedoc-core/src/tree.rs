//! The tree document aggregate.
//!
//! Nodes live in an append-only arena addressed by [`NodeId`]. Parent/child links, the
//! node/branch relation and the label/hidden-data owner back-references are all stored as
//! indices, so the otherwise cyclic object graph has a single owner: the [`Tree`].
//!
//! Detached nodes stay in the arena. Edits rely on this to re-attach them on undo.

mod change;
mod delta;
mod element_set;
mod node;
mod traversal;

pub use change::{ChangeKind, TreeChangeEvent, TreeListener};
pub use delta::TreeDelta;
pub use element_set::ElementRef;
pub use node::{Branch, BranchMut, Node, NodeMut};

use crate::config::DocumentConfig;
use crate::error::{Error, Result};
use crate::hidden_data::{HiddenDataMut, HiddenDataOwner};
use crate::label::{DEFAULT_LINE_INDEX_INCREMENT, Label, LabelHandle, LabelMut, LabelSide};
use crate::legend::{Legend, LegendHandle, LegendMut, Legends};
use crate::scale_bar::ScaleBar;
use crate::text::{DecimalFormat, TextElementData};
use element_set::ElementIndex;
use std::cell::RefCell;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct Tree {
    nodes: Vec<Node>,
    paint_start: Option<NodeId>,
    legends: Legends,
    scale_bar: ScaleBar,
    line_index_increment: i64,
    decimal_format: DecimalFormat,
    next_handle: u64,

    // The element index (membership set, label owners, unique names) is derived state. Every
    // mutation bumps `generation`; queries rebuild the index lazily when it is stale.
    generation: u64,
    index_cache: RefCell<Option<ElementIndex>>,

    listeners: Vec<Box<dyn TreeListener>>,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes)
            .field("paint_start", &self.paint_start)
            .field("legends", &self.legends)
            .field("scale_bar", &self.scale_bar)
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            paint_start: None,
            legends: Legends::default(),
            scale_bar: ScaleBar::default(),
            line_index_increment: DEFAULT_LINE_INDEX_INCREMENT,
            decimal_format: DecimalFormat::default(),
            next_handle: 1,
            generation: 0,
            index_cache: RefCell::new(None),
            listeners: Vec::new(),
        }
    }

    pub fn with_config(config: &DocumentConfig) -> Self {
        let mut tree = Self::new();
        tree.line_index_increment = config.line_index_increment();
        tree.decimal_format = config.decimal_format();
        tree.scale_bar.format.decimal_format = tree.decimal_format;
        tree
    }

    /// Copy of the document model without listeners and caches.
    ///
    /// Edits run their algorithms against a fork and record the difference.
    pub fn fork(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            paint_start: self.paint_start,
            legends: self.legends.clone(),
            scale_bar: self.scale_bar.clone(),
            line_index_increment: self.line_index_increment,
            decimal_format: self.decimal_format,
            next_handle: self.next_handle,
            generation: self.generation,
            index_cache: RefCell::new(None),
            listeners: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        *self.index_cache.get_mut() = None;
    }

    fn ensure_index(&self) -> std::cell::RefMut<'_, ElementIndex> {
        let generation = self.generation;
        let mut cache = self.index_cache.borrow_mut();
        let stale = cache
            .as_ref()
            .map(|c| c.generation != generation)
            .unwrap_or(true);
        if stale {
            *cache = Some(ElementIndex::build(self));
        }
        std::cell::RefMut::map(cache, |c| {
            c.get_or_insert_with(|| ElementIndex::build(self))
        })
    }

    /// Finishes a change: rebuilds the element index and notifies listeners inline.
    pub fn commit(&mut self, kind: ChangeKind) {
        self.invalidate();
        drop(self.ensure_index());
        let event = TreeChangeEvent {
            kind,
            generation: self.generation,
        };
        tracing::debug!(?kind, generation = self.generation, "tree change committed");
        for listener in &self.listeners {
            listener.tree_changed(&event);
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn TreeListener>) {
        self.listeners.push(listener);
    }

    pub fn line_index_increment(&self) -> i64 {
        self.line_index_increment
    }

    pub fn set_line_index_increment(&mut self, increment: i64) {
        self.line_index_increment = increment.max(2);
    }

    /// Decimal format given to nodes created from now on.
    pub fn decimal_format(&self) -> DecimalFormat {
        self.decimal_format
    }

    pub fn set_decimal_format(&mut self, format: DecimalFormat) {
        self.decimal_format = format;
    }

    /// Formats `value` with the tree's default decimal format.
    pub fn format_value(&self, value: &TextElementData) -> String {
        value.format(&self.decimal_format)
    }

    /// The node's data as displayed, using the node's own decimal format.
    pub fn node_text(&self, id: NodeId) -> String {
        let node = self.node(id);
        node.data.format(&node.format.decimal_format)
    }

    // ---- nodes -------------------------------------------------------------------------------

    pub fn paint_start(&self) -> Option<NodeId> {
        self.paint_start
    }

    pub fn is_empty(&self) -> bool {
        self.paint_start.is_none()
    }

    /// Makes `root` the root of the tree. The node must not have a parent.
    pub fn set_paint_start(&mut self, root: Option<NodeId>) -> Result<()> {
        if let Some(r) = root {
            if self.node(r).parent.is_some() {
                return Err(Error::AlreadyAttached { child: r });
            }
        }
        self.paint_start = root;
        self.invalidate();
        Ok(())
    }

    /// Number of arena slots (reachable or not).
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Creates a new detached node with an empty afferent branch.
    pub fn new_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(id);
        node.format.decimal_format = self.decimal_format;
        self.nodes.push(node);
        self.invalidate();
        id
    }

    pub fn new_node_with_data(&mut self, data: impl Into<TextElementData>) -> NodeId {
        let id = self.new_node();
        self.nodes[id.0].data = data.into();
        id
    }

    /// Panics if `id` does not belong to this tree's arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> NodeMut<'_> {
        NodeMut::new(self.node_entry_mut(id))
    }

    pub fn branch(&self, id: NodeId) -> &Branch {
        &self.nodes[id.0].branch
    }

    pub fn branch_mut(&mut self, id: NodeId) -> BranchMut<'_> {
        BranchMut::new(self.branch_entry_mut(id))
    }

    /// Hidden data of a node or of its afferent branch.
    pub fn hidden_data_mut(&mut self, owner: HiddenDataOwner) -> HiddenDataMut<'_> {
        let node = self.node_entry_mut(owner.node());
        let map = match owner {
            HiddenDataOwner::Node(_) => node.hidden_data_mut(),
            HiddenDataOwner::Branch(_) => node.afferent_branch_mut().hidden_data_mut(),
        };
        HiddenDataMut::new(map)
    }

    pub(crate) fn node_entry_mut(&mut self, id: NodeId) -> &mut Node {
        self.invalidate();
        &mut self.nodes[id.0]
    }

    pub(crate) fn branch_entry_mut(&mut self, id: NodeId) -> &mut Branch {
        self.invalidate();
        &mut self.nodes[id.0].branch
    }

    pub fn set_node_data(&mut self, id: NodeId, data: impl Into<TextElementData>) {
        self.node_entry_mut(id).data = data.into();
    }

    /// Replaces the afferent branch of `node`, re-linking the new branch's back-references.
    ///
    /// Does not check IDs; public callers use [`crate::id_manager::replace_branch`].
    pub(crate) fn replace_branch(&mut self, node: NodeId, mut branch: Branch) -> Branch {
        branch.attach_to(node);
        for label in branch.labels_mut().labels_mut() {
            if label.handle().is_none() {
                label.set_handle(LabelHandle(self.next_handle));
                self.next_handle += 1;
            }
        }
        self.invalidate();
        std::mem::replace(&mut self.nodes[node.0].branch, branch)
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        if self.node(child).parent.is_some() {
            return Err(Error::AlreadyAttached { child });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::Cycle { parent, child });
        }
        if index > self.node(parent).children.len() {
            return Err(Error::ChildIndexOutOfRange { parent, index });
        }
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.invalidate();
        Ok(())
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.node(parent).children.len();
        self.insert_child(parent, index, child)
    }

    /// Convenience for building trees: creates a node with `data` and appends it to `parent`.
    pub fn add_new_child(
        &mut self,
        parent: NodeId,
        data: impl Into<TextElementData>,
    ) -> Result<NodeId> {
        let child = self.new_node_with_data(data);
        self.add_child(parent, child)?;
        Ok(child)
    }

    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> Result<NodeId> {
        if index >= self.node(parent).children.len() {
            return Err(Error::ChildIndexOutOfRange { parent, index });
        }
        let child = self.nodes[parent.0].children.remove(index);
        self.nodes[child.0].parent = None;
        self.invalidate();
        Ok(child)
    }

    /// Detaches `node` from its parent. Returns the former parent and child index.
    pub fn detach(&mut self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node(node).parent?;
        let index = self.index_in_parent(node)?;
        self.nodes[parent.0].children.remove(index);
        self.nodes[node.0].parent = None;
        self.invalidate();
        Some((parent, index))
    }

    /// Reorders the children of `parent`. `order` must be a permutation of the current children.
    pub fn set_children_order(&mut self, parent: NodeId, order: Vec<NodeId>) -> Result<()> {
        let current = &self.node(parent).children;
        let mut a = current.clone();
        let mut b = order.clone();
        a.sort_unstable();
        b.sort_unstable();
        if a != b {
            return Err(Error::InvalidChildOrder { parent });
        }
        self.nodes[parent.0].children = order;
        self.invalidate();
        Ok(())
    }

    // ---- unique names ------------------------------------------------------------------------

    /// Assigns (or clears) the unique name of `node`. Names must not be used by another node
    /// reachable from the paint start.
    pub fn set_unique_name(&mut self, node: NodeId, name: Option<String>) -> Result<()> {
        if let Some(name) = &name {
            if let Some(other) = self.find_node_by_unique_name(name) {
                if other != node {
                    return Err(Error::DuplicateUniqueName {
                        name: name.clone(),
                        node: other,
                    });
                }
            }
        }
        self.node_entry_mut(node).unique_name = name;
        Ok(())
    }

    /// Returns the unique name of `node`, generating a fresh one if it has none yet.
    pub fn ensure_unique_name(&mut self, node: NodeId) -> String {
        if let Some(name) = self.node(node).unique_name() {
            return name.to_string();
        }
        let mut name = format!("node-{}", Uuid::new_v4().simple());
        while self.find_node_by_unique_name(&name).is_some() {
            name = format!("node-{}", Uuid::new_v4().simple());
        }
        self.node_entry_mut(node).unique_name = Some(name.clone());
        name
    }

    pub fn find_node_by_unique_name(&self, name: &str) -> Option<NodeId> {
        self.ensure_index().unique_names.get(name).copied()
    }

    // ---- element index -----------------------------------------------------------------------

    pub fn contains_element(&self, element: ElementRef) -> bool {
        self.ensure_index().elements.contains(&element)
    }

    pub fn element_count(&self) -> usize {
        self.ensure_index().elements.len()
    }

    // ---- labels ------------------------------------------------------------------------------

    pub(crate) fn allocate_label_handle(&mut self) -> LabelHandle {
        let handle = LabelHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Inserts `label` without any ID checks. Callers go through [`crate::id_manager`].
    pub(crate) fn attach_label(&mut self, node: NodeId, mut label: Label) -> LabelHandle {
        let handle = match label.handle() {
            Some(h) => h,
            None => {
                let h = self.allocate_label_handle();
                label.set_handle(h);
                h
            }
        };
        let increment = self.line_index_increment;
        self.branch_entry_mut(node).labels_mut().add(label, increment);
        handle
    }

    /// Node whose afferent branch holds the label, if the label is reachable.
    pub fn label_owner(&self, handle: LabelHandle) -> Option<NodeId> {
        self.ensure_index().label_owner.get(&handle).copied()
    }

    pub fn label(&self, handle: LabelHandle) -> Option<&Label> {
        let owner = self.label_owner(handle)?;
        self.branch(owner).labels().get(handle)
    }

    pub fn label_mut(&mut self, handle: LabelHandle) -> Option<LabelMut<'_>> {
        let owner = self.label_owner(handle)?;
        self.branch_entry_mut(owner).labels_mut().get_mut(handle)
    }

    /// Removes a label without recording anything. Returns the node it was attached to.
    pub fn remove_label(&mut self, handle: LabelHandle) -> Result<(NodeId, Label)> {
        let owner = self
            .label_owner(handle)
            .ok_or(Error::UnknownLabel(handle))?;
        let label = self
            .branch_entry_mut(owner)
            .labels_mut()
            .remove(handle)
            .ok_or(Error::UnknownLabel(handle))?;
        Ok((owner, label))
    }

    /// Moves a label to another side/line/position of the same branch. Returns the position the
    /// label ended up at after tie resolution.
    pub fn move_label(
        &mut self,
        handle: LabelHandle,
        side: LabelSide,
        line_number: usize,
        line_position: i64,
    ) -> Result<i64> {
        let (owner, label) = self.remove_label(handle)?;
        let label = label.at(side, line_number, line_position);
        let increment = self.line_index_increment;
        Ok(self.branch_entry_mut(owner).labels_mut().add(label, increment))
    }

    // ---- legends & scale bar -----------------------------------------------------------------

    pub fn legends(&self) -> &Legends {
        &self.legends
    }

    pub fn legend_mut(&mut self, handle: LegendHandle) -> Option<LegendMut<'_>> {
        self.invalidate();
        self.legends.get_mut(handle).map(LegendMut::new)
    }

    /// Restores position order after [`LegendMut::set_position`].
    pub fn sort_legends(&mut self) {
        self.legends.sort();
        self.invalidate();
    }

    pub fn add_legend(&mut self, legend: Legend) -> LegendHandle {
        let handle = LegendHandle(self.next_handle);
        self.next_handle += 1;
        self.legends.insert(legend, handle);
        self.invalidate();
        handle
    }

    pub fn remove_legend(&mut self, handle: LegendHandle) -> Result<Legend> {
        let legend = self
            .legends
            .remove(handle)
            .ok_or(Error::UnknownLegend(handle))?;
        self.invalidate();
        Ok(legend)
    }

    /// Nodes the legend is currently anchored to (anchors without a matching node are skipped).
    pub fn legend_anchor_nodes(&self, handle: LegendHandle) -> Vec<NodeId> {
        let Some(legend) = self.legends.get(handle) else {
            return Vec::new();
        };
        let index = self.ensure_index();
        legend
            .anchors()
            .filter_map(|a| index.unique_names.get(a).copied())
            .collect()
    }

    pub fn scale_bar(&self) -> &ScaleBar {
        &self.scale_bar
    }

    pub fn scale_bar_mut(&mut self) -> &mut ScaleBar {
        self.invalidate();
        &mut self.scale_bar
    }

    // ---- cloning -----------------------------------------------------------------------------

    /// Copies `id` into a new detached node: data, formats, hidden data and the afferent branch
    /// (labels receive new handles). Children and attributes are never copied; the unique name
    /// only if `keep_unique_name` is set.
    pub fn clone_node(&mut self, id: NodeId, keep_unique_name: bool) -> NodeId {
        let source = self.node(id).clone();
        self.copy_detached(&source, keep_unique_name)
    }

    fn copy_detached(&mut self, source: &Node, keep_unique_name: bool) -> NodeId {
        let mut branch = source.branch.clone();
        for label in branch.labels_mut().labels_mut() {
            label.clear_handle();
        }

        let copy = self.new_node();
        {
            let node = &mut self.nodes[copy.0];
            node.data = source.data.clone();
            node.format = source.format.clone();
            node.hidden_data = source.hidden_data.clone();
            node.unique_name = if keep_unique_name {
                source.unique_name.clone()
            } else {
                None
            };
            node.relink(copy);
        }
        self.replace_branch(copy, branch);
        copy
    }

    /// Copies the subtree of `id` from another tree into this one as a detached subtree.
    ///
    /// Same copy rules as [`Tree::clone_node`]; kept unique names are not checked against this
    /// tree.
    pub fn import_subtree(&mut self, source: &Tree, id: NodeId, keep_unique_names: bool) -> NodeId {
        let copy = self.copy_detached(source.node(id), keep_unique_names);
        for &child in source.children(id) {
            let child_copy = self.import_subtree(source, child, keep_unique_names);
            self.nodes[copy.0].children.push(child_copy);
            self.nodes[child_copy.0].parent = Some(copy);
        }
        self.invalidate();
        copy
    }

    /// Recursively clones `id` and its descendants. The copy is detached.
    pub fn clone_with_subtree(&mut self, id: NodeId, keep_unique_names: bool) -> NodeId {
        let copy = self.clone_node(id, keep_unique_names);
        let children = self.node(id).children.clone();
        for child in children {
            let child_copy = self.clone_with_subtree(child, keep_unique_names);
            self.nodes[copy.0].children.push(child_copy);
            self.nodes[child_copy.0].parent = Some(copy);
        }
        self.invalidate();
        copy
    }

    // ---- crate internals used by deltas ------------------------------------------------------

    pub(crate) fn nodes_raw(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn next_handle(&self) -> u64 {
        self.next_handle
    }

    pub(crate) fn restore_parts(
        &mut self,
        nodes: impl IntoIterator<Item = (NodeId, Node)>,
        arena_len: usize,
        shrink: bool,
        paint_start: Option<NodeId>,
        next_handle: u64,
    ) {
        if self.nodes.len() < arena_len {
            let start = self.nodes.len();
            self.nodes
                .extend((start..arena_len).map(|i| Node::new(NodeId(i))));
        } else if shrink && self.nodes.len() > arena_len {
            self.nodes.truncate(arena_len);
        }
        for (id, node) in nodes {
            if id.0 < self.nodes.len() {
                self.nodes[id.0] = node;
            }
        }
        self.paint_start = paint_start;
        self.next_handle = self.next_handle.max(next_handle);
        self.invalidate();
    }

    pub(crate) fn restore_legends(&mut self, legends: Legends) {
        self.legends = legends;
        self.invalidate();
    }

    pub(crate) fn restore_scale_bar(&mut self, scale_bar: ScaleBar) {
        self.scale_bar = scale_bar;
        self.invalidate();
    }
}

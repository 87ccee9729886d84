use super::{NodeId, Tree};
use crate::label::LabelHandle;
use crate::legend::LegendHandle;
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Reference to any element that can be selected or checked for membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Node(NodeId),
    /// The afferent branch of the node.
    Branch(NodeId),
    Label(LabelHandle),
    Legend(LegendHandle),
    ScaleBar,
}

/// Flat membership index of everything reachable from the paint start.
#[derive(Debug, Clone)]
pub(crate) struct ElementIndex {
    pub(crate) generation: u64,
    pub(crate) elements: HashSet<ElementRef>,
    pub(crate) label_owner: HashMap<LabelHandle, NodeId>,
    pub(crate) unique_names: HashMap<String, NodeId>,
}

impl ElementIndex {
    pub(crate) fn build(tree: &Tree) -> Self {
        let mut elements: HashSet<ElementRef> = HashSet::default();
        let mut label_owner: HashMap<LabelHandle, NodeId> = HashMap::default();
        let mut unique_names: HashMap<String, NodeId> = HashMap::default();

        if let Some(root) = tree.paint_start() {
            for id in tree.preorder(root) {
                let node = tree.node(id);
                elements.insert(ElementRef::Node(id));
                elements.insert(ElementRef::Branch(id));
                for label in node.afferent_branch().labels().iter() {
                    if let Some(handle) = label.handle() {
                        elements.insert(ElementRef::Label(handle));
                        label_owner.insert(handle, id);
                    }
                }
                if let Some(name) = node.unique_name() {
                    unique_names.insert(name.to_string(), id);
                }
            }
        }
        for legend in tree.legends().iter() {
            if let Some(handle) = legend.handle() {
                elements.insert(ElementRef::Legend(handle));
            }
        }
        elements.insert(ElementRef::ScaleBar);

        Self {
            generation: tree.generation(),
            elements,
            label_owner,
            unique_names,
        }
    }
}

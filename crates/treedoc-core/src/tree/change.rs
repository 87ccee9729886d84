/// How much of the derived state (layout caches, table views) a committed change invalidates.
///
/// Variants are ordered by severity so that composed changes can take the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ChangeKind {
    /// Formats, labels or values changed; topology and leaf order are untouched.
    #[default]
    Neutral,
    /// Only identifiers or node names were renamed.
    RenameOnly,
    /// Topology changed but the left-to-right order of the leaves did not.
    LeafOrderInvariant,
    /// Arbitrary topology change.
    Topology,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChangeEvent {
    pub kind: ChangeKind,
    /// Generation of the tree after the change.
    pub generation: u64,
}

/// Receives a notification after every committed change, on the mutating thread.
pub trait TreeListener {
    fn tree_changed(&self, event: &TreeChangeEvent);
}

//! Structural queries over the node graph.

use super::{ElementRef, NodeId, Tree};

impl Tree {
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).children.is_empty()
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.node(id).parent.is_none()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// First among its siblings (trivially true for a root).
    pub fn is_first(&self, id: NodeId) -> bool {
        match self.node(id).parent {
            None => true,
            Some(p) => self.node(p).children.first() == Some(&id),
        }
    }

    /// Last among its siblings (trivially true for a root).
    pub fn is_last(&self, id: NodeId) -> bool {
        match self.node(id).parent {
            None => true,
            Some(p) => self.node(p).children.last() == Some(&id),
        }
    }

    pub fn is_only_subelement(&self, id: NodeId) -> bool {
        self.is_first(id) && self.is_last(id)
    }

    pub fn first_leaf(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(&first) = self.node(cur).children.first() {
            cur = first;
        }
        cur
    }

    pub fn last_leaf(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(&last) = self.node(cur).children.last() {
            cur = last;
        }
        cur
    }

    /// Next leaf in drawing order after the subtree of `id`.
    ///
    /// Walks up until a node with a right sibling is found, then descends to that sibling's first
    /// leaf.
    pub fn next_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = id;
        loop {
            let parent = self.node(cur).parent?;
            let index = self.index_in_parent(cur)?;
            if let Some(&sibling) = self.node(parent).children.get(index + 1) {
                return Some(self.first_leaf(sibling));
            }
            cur = parent;
        }
    }

    /// Previous leaf in drawing order before the subtree of `id`.
    pub fn previous_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = id;
        loop {
            let parent = self.node(cur).parent?;
            let index = self.index_in_parent(cur)?;
            if index > 0 {
                return Some(self.last_leaf(self.node(parent).children[index - 1]));
            }
            cur = parent;
        }
    }

    /// `true` if `ancestor` is `node` or lies on the path from `node` to its root.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.node(c).parent;
        }
        false
    }

    /// Walks the ancestors of `a` (starting with `a` itself) and returns the first one that is `b`
    /// or an ancestor of `b`. `None` if the nodes are not in the same tree.
    pub fn most_recent_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut cur = Some(a);
        while let Some(c) = cur {
            if self.is_ancestor_or_self(c, b) {
                return Some(c);
            }
            cur = self.node(c).parent;
        }
        None
    }

    /// Path from `id` (inclusive) up to its root (inclusive).
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut cur = id;
        while let Some(p) = self.node(cur).parent {
            out.push(p);
            cur = p;
        }
        out
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.path_to_root(id).len() - 1
    }

    pub fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    pub fn postorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = self.preorder_reversed_children(root);
        out.reverse();
        out
    }

    // Preorder with children visited right-to-left; reversed it is a left-to-right postorder.
    fn preorder_reversed_children(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().copied());
        }
        out
    }

    /// Leaves below `root` in drawing order.
    pub fn leaves(&self, root: NodeId) -> Vec<NodeId> {
        self.preorder(root)
            .into_iter()
            .filter(|&id| self.is_leaf(id))
            .collect()
    }

    pub fn count_nodes(&self, root: NodeId) -> usize {
        self.preorder(root).len()
    }

    pub fn count_leaves(&self, root: NodeId) -> usize {
        self.leaves(root).len()
    }

    /// Membership test for any element kind. A legend is contained iff all of its anchor nodes
    /// are contained.
    pub fn contained_in_subtree(&self, root: NodeId, element: ElementRef) -> bool {
        match element {
            ElementRef::Node(id) | ElementRef::Branch(id) => self.is_ancestor_or_self(root, id),
            ElementRef::Label(handle) => self.preorder(root).into_iter().any(|id| {
                self.branch(id).labels().get(handle).is_some()
            }),
            ElementRef::Legend(handle) => {
                let Some(legend) = self.legends().get(handle) else {
                    return false;
                };
                let subtree = self.preorder(root);
                legend.anchors().all(|anchor| {
                    subtree
                        .iter()
                        .any(|&id| self.node(id).unique_name() == Some(anchor))
                })
            }
            ElementRef::ScaleBar => false,
        }
    }

    /// Sum of all defined branch lengths below `root` (the root's own branch included).
    pub fn total_branch_length(&self, root: NodeId) -> f64 {
        self.preorder(root)
            .into_iter()
            .filter_map(|id| self.branch(id).defined_length())
            .sum()
    }
}

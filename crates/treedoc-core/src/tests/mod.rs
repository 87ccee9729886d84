mod delta;
mod id_manager;

use crate::tree::{NodeId, Tree};

/// Builds `((A:1,B:2)X:3,C:4)R` and returns the tree with `[R, X, A, B, C]`.
pub(crate) fn sample_tree() -> (Tree, [NodeId; 5]) {
    let mut tree = Tree::new();
    let r = tree.new_node_with_data("R");
    let x = tree.add_new_child(r, "X").unwrap();
    let a = tree.add_new_child(x, "A").unwrap();
    let b = tree.add_new_child(x, "B").unwrap();
    let c = tree.add_new_child(r, "C").unwrap();
    for (node, length) in [(x, 3.0), (a, 1.0), (b, 2.0), (c, 4.0)] {
        tree.branch_mut(node).set_length(length);
    }
    tree.set_paint_start(Some(r)).unwrap();
    (tree, [r, x, a, b, c])
}

mod common;

use common::{find, find_all, newick, tree};
use treedoc_edit::topology::find_reroot_branch;
use treedoc_edit::{DocumentEdit, Error, LeafSet, LeafSetIndex, RerootEdit};

#[test]
fn leaf_set_basics() {
    let mut set = LeafSet::new(130);
    assert!(set.is_empty());
    for i in [0, 63, 64, 129] {
        set.insert(i);
    }
    assert_eq!(set.count(), 4);
    assert!(set.contains(64));
    assert!(!set.contains(65));
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 63, 64, 129]);

    let mut other = LeafSet::new(130);
    other.insert(1);
    other.union_with(&set);
    assert!(other.is_superset_of(&set));
    assert!(!set.is_superset_of(&other));
    assert_eq!(other.count(), 5);
}

#[test]
fn leaf_set_sizes_match_leaf_counts() {
    let t = tree("((A,(B,C)Y)X,(D,E,(F,G,H)W)Z,I)R;");
    let root = t.paint_start().unwrap();
    let index = LeafSetIndex::build(&t, root);

    assert_eq!(index.leaf_count(), 9);
    let all = index.leaf_set(root).unwrap();
    assert_eq!(all.count(), 9);
    assert_eq!(all.iter().collect::<Vec<_>>(), (0..9).collect::<Vec<_>>());

    for node in t.preorder(root) {
        let set = index.leaf_set(node).unwrap();
        assert_eq!(set.count(), t.count_leaves(node), "node {node}");
        if let Some(parent) = t.parent(node) {
            assert!(index.leaf_set(parent).unwrap().is_superset_of(set));
        }
    }

    // Leaves are numbered in drawing order.
    let [a, i] = find_all(&t, ["A", "I"]);
    assert_eq!(index.leaf_index(a), Some(0));
    assert_eq!(index.leaf_index(i), Some(8));
    assert_eq!(index.leaves().len(), 9);
}

#[test]
fn outgroup_clade_below_root() {
    let t = tree("((A:1,B:1)X:1,(C:1,D:1)Y:1)R;");
    let [a, b, x] = find_all(&t, ["A", "B", "X"]);
    let candidates = find_reroot_branch(&t, &[a, b]).unwrap();
    assert_eq!(candidates.clade_root, x);
    assert_eq!(candidates.default, x);
    assert_eq!(candidates.alternatives, vec![x]);
    assert_eq!(candidates.leaf_count, 2);

    let mut t = t;
    let mut edit = RerootEdit::by_leaf_set(&t, &[a, b]).unwrap();
    edit.redo(&mut t).unwrap();
    assert_eq!(newick(&t), "((A:1,B:1)X:0.5,(C:1,D:1)Y:1.5);");
    assert_eq!(edit.candidates().map(|c| c.default), Some(x));
}

#[test]
fn outgroup_spanning_the_root() {
    let t = tree("((A,B)X,C)R;");
    let [a, b, c, r] = find_all(&t, ["A", "B", "C", "R"]);
    let candidates = find_reroot_branch(&t, &[a, c]).unwrap();
    assert_eq!(candidates.clade_root, r);
    assert_eq!(candidates.alternatives, vec![b]);
    assert_eq!(candidates.default, b);
}

#[test]
fn single_leaf_outgroup() {
    let t = tree("((A,B)X,(C,D)Y,E)R;");
    let e = find(&t, "E");
    let candidates = find_reroot_branch(&t, &[e]).unwrap();
    assert_eq!(candidates.default, e);
    assert_eq!(candidates.leaf_count, 4);
}

#[test]
fn largest_separated_clade_wins() {
    let t = tree("((A,B)X,(C,D)Y,E)R;");
    let [a, e, y] = find_all(&t, ["A", "E", "Y"]);
    let candidates = find_reroot_branch(&t, &[a, e]).unwrap();
    assert_eq!(candidates.alternatives, vec![y]);
    assert_eq!(candidates.leaf_count, 2);
}

#[test]
fn ties_are_reported_in_preorder() {
    let t = tree("((A,B)X,(C,D)Y,E)R;");
    let [a, b, c, d, e] = find_all(&t, ["A", "B", "C", "D", "E"]);
    let candidates = find_reroot_branch(&t, &[a, c]).unwrap();
    assert_eq!(candidates.alternatives, vec![e, b, d]);
    assert_eq!(candidates.default, e);

    let mut t = t;
    let mut edit = RerootEdit::by_candidate(&t, d, candidates.clone()).unwrap();
    edit.redo(&mut t).unwrap();
    assert_eq!(t.children(edit.new_root())[0], d);

    let err = RerootEdit::by_candidate(&t, a, candidates).unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }), "{err}");
}

#[test]
fn invalid_outgroups_are_rejected() {
    let t = tree("((A,B)X,C)R;");
    let [a, b, c, x] = find_all(&t, ["A", "B", "C", "X"]);

    assert!(find_reroot_branch(&t, &[]).is_err());
    assert!(find_reroot_branch(&t, &[x]).is_err());
    let err = find_reroot_branch(&t, &[a, b, c]).unwrap_err();
    assert!(err.to_string().contains("every leaf"), "{err}");

    let empty = treedoc_edit::model::Tree::new();
    assert!(find_reroot_branch(&empty, &[a]).is_err());
}

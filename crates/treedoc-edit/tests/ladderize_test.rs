mod common;

use common::{newick, snapshot, tree};
use treedoc_edit::model::{ChangeKind, NodeId, Tree};
use treedoc_edit::{
    DocumentEdit, LadderizeDirection, LadderizeEdit, LadderizeMetric, LadderizeOptions,
};

fn options(direction: LadderizeDirection, metric: LadderizeMetric) -> LadderizeOptions {
    LadderizeOptions { direction, metric }
}

fn ladderize(text: &str, options: LadderizeOptions) -> Tree {
    let mut t = tree(text);
    let root = t.paint_start().unwrap();
    LadderizeEdit::new(&t, root, options)
        .unwrap()
        .redo(&mut t)
        .unwrap();
    t
}

#[test]
fn descending_puts_large_subtrees_first() {
    let t = ladderize(
        "((A,(B,C)Y)X,D)R;",
        options(LadderizeDirection::Descending, LadderizeMetric::NodeCount),
    );
    assert_eq!(newick(&t), "(((B,C)Y,A)X,D)R;");
}

#[test]
fn ascending_puts_small_subtrees_first() {
    let t = ladderize("((A,(B,C)Y)X,D)R;", LadderizeOptions::default());
    assert_eq!(newick(&t), "(D,(A,(B,C)Y)X)R;");
}

#[test]
fn leaf_count_metric_keeps_ties_stable() {
    let text = "((A,B,C)X,(D,(E,F)Z)Y)R;";
    let by_nodes = ladderize(
        text,
        options(LadderizeDirection::Descending, LadderizeMetric::NodeCount),
    );
    assert_eq!(newick(&by_nodes), "(((E,F)Z,D)Y,(A,B,C)X)R;");

    let by_leaves = ladderize(
        text,
        options(LadderizeDirection::Descending, LadderizeMetric::LeafCount),
    );
    assert_eq!(newick(&by_leaves), "((A,B,C)X,((E,F)Z,D)Y)R;");
}

fn check_ordered(t: &Tree, node: NodeId, descending: bool) {
    let sizes: Vec<usize> = t
        .children(node)
        .iter()
        .map(|&c| t.count_leaves(c))
        .collect();
    for pair in sizes.windows(2) {
        if descending {
            assert!(pair[0] >= pair[1], "{sizes:?} at {node}");
        } else {
            assert!(pair[0] <= pair[1], "{sizes:?} at {node}");
        }
    }
    for &child in t.children(node) {
        check_ordered(t, child, descending);
    }
}

#[test]
fn every_level_is_ordered() {
    let text = "(((A,B),(C,(D,E))),((F,(G,(H,I))),J));";
    for (direction, descending) in [
        (LadderizeDirection::Descending, true),
        (LadderizeDirection::Ascending, false),
    ] {
        let t = ladderize(text, options(direction, LadderizeMetric::LeafCount));
        check_ordered(&t, t.paint_start().unwrap(), descending);
        assert_eq!(t.count_leaves(t.paint_start().unwrap()), 10);
    }
}

#[test]
fn ladderize_is_undoable() {
    let mut t = tree("((A,(B,C)Y)X,D)R;");
    let before = snapshot(&t);
    let root = t.paint_start().unwrap();
    let mut edit = LadderizeEdit::new(&t, root, LadderizeOptions::default()).unwrap();
    assert_eq!(edit.change_kind(), ChangeKind::Topology);
    assert_eq!(edit.presentation_name(), "Ladderize (ascending)");

    edit.redo(&mut t).unwrap();
    assert_ne!(snapshot(&t), before);
    edit.undo(&mut t).unwrap();
    assert_eq!(snapshot(&t), before);
}

#[test]
fn ladderize_subtree_only() {
    let mut t = tree("((A,(B,C)Y)X,(D,(E,F)W)V)R;");
    let x = common::find(&t, "X");
    LadderizeEdit::new(
        &t,
        x,
        options(LadderizeDirection::Descending, LadderizeMetric::NodeCount),
    )
    .unwrap()
    .redo(&mut t)
    .unwrap();
    assert_eq!(newick(&t), "(((B,C)Y,A)X,(D,(E,F)W)V)R;");
}

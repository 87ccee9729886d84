use super::sample_tree;
use crate::id_manager::{self, ConflictPolicy};
use crate::label::Label;
use crate::legend::Legend;
use crate::tree::TreeDelta;

#[test]
fn delta_replays_in_both_directions() {
    let (mut tree, [r, x, a, _, c]) = sample_tree();
    let before = tree.fork();

    let mut scratch = tree.fork();
    let m = scratch.new_node_with_data("M");
    scratch.detach(c);
    scratch.add_child(m, c).unwrap();
    scratch.add_child(r, m).unwrap();
    scratch.branch_mut(a).set_length(9.0);
    id_manager::insert_label(&mut scratch, x, Label::text("s", 0.5), ConflictPolicy::Reject)
        .unwrap();
    scratch.add_legend(Legend::new("legend", "x"));
    scratch.scale_bar_mut().length = Some(2.0);

    let delta = TreeDelta::between(&tree, &scratch);
    assert!(!delta.is_empty());
    assert_eq!(delta.created_nodes().collect::<Vec<_>>(), vec![m]);

    delta.apply_forward(&mut tree);
    assert_eq!(tree.arena_len(), scratch.arena_len());
    assert_eq!(tree.preorder(r), scratch.preorder(r));
    assert_eq!(tree.branch(a).length(), 9.0);
    assert_eq!(tree.legends(), scratch.legends());
    assert_eq!(tree.scale_bar().length, Some(2.0));

    delta.apply_backward(&mut tree);
    assert_eq!(tree.arena_len(), before.arena_len());
    assert_eq!(tree.preorder(r), before.preorder(r));
    assert_eq!(tree.branch(a).length(), 1.0);
    assert!(tree.branch(x).labels().is_empty());
    assert!(tree.legends().is_empty());
    assert_eq!(tree.scale_bar(), before.scale_bar());

    delta.apply_forward(&mut tree);
    assert_eq!(tree.children(r), scratch.children(r));
}

#[test]
fn identical_states_produce_an_empty_delta() {
    let (tree, _) = sample_tree();
    let scratch = tree.fork();
    assert!(TreeDelta::between(&tree, &scratch).is_empty());
}

#[test]
fn handles_are_not_reused_after_undo() {
    let (mut tree, [_, x, ..]) = sample_tree();
    let mut scratch = tree.fork();
    let (first, _) =
        id_manager::insert_label(&mut scratch, x, Label::text("s", ""), ConflictPolicy::Reject)
            .unwrap();
    let delta = TreeDelta::between(&tree, &scratch);
    delta.apply_forward(&mut tree);
    delta.apply_backward(&mut tree);

    let (second, _) =
        id_manager::insert_label(&mut tree, x, Label::text("s", ""), ConflictPolicy::Reject)
            .unwrap();
    assert_ne!(first, second);
}

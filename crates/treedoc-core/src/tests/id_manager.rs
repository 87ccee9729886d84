use super::sample_tree;
use crate::adapter::{
    BranchLengthAdapter, HiddenBranchDataAdapter, HiddenNodeDataAdapter, NodeBranchDataAdapter,
    NodeNameAdapter, TextLabelAdapter, UniqueNameAdapter,
};
use crate::config::PieChartPalette;
use crate::error::Error;
use crate::hidden_data::HiddenDataOwner;
use crate::id_manager::{
    self, ConflictPolicy, IdHolder, IdQuery, InsertOutcome, RemovedIdElement,
};
use crate::label::{Label, LabelKindTag};
use crate::text::TextElementData;
use crate::tree::Branch;

#[test]
fn duplicate_id_on_insert_is_rejected() {
    let (mut tree, [_, x, ..]) = sample_tree();
    id_manager::insert_label(&mut tree, x, Label::text("support", 0.9), ConflictPolicy::Reject)
        .unwrap();

    let err = id_manager::insert_hidden_branch_data(
        &mut tree,
        x,
        "support",
        TextElementData::Decimal(0.5),
        ConflictPolicy::Reject,
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateId {
            id: "support".to_string(),
            node: x
        }
    );
    assert!(tree.branch(x).hidden_data().is_empty());
    assert_eq!(tree.branch(x).labels().len(), 1);
}

#[test]
fn replace_policy_hands_back_the_previous_holder() {
    let (mut tree, [_, x, ..]) = sample_tree();
    id_manager::insert_hidden_node_data(&mut tree, x, "n", "old".into(), ConflictPolicy::Reject)
        .unwrap();
    let (handle, outcome) =
        id_manager::insert_label(&mut tree, x, Label::text("n", "new"), ConflictPolicy::Replace)
            .unwrap();
    assert_eq!(
        outcome,
        InsertOutcome::Replaced(RemovedIdElement::HiddenNodeData {
            id: "n".to_string(),
            value: "old".into()
        })
    );
    assert_eq!(
        id_manager::element_with_id(&tree, x, "n"),
        Some(IdHolder::Label(handle))
    );
}

#[test]
fn same_id_may_be_used_on_different_nodes() {
    let (mut tree, [_, x, a, ..]) = sample_tree();
    for node in [x, a] {
        id_manager::insert_hidden_branch_data(
            &mut tree,
            node,
            "support",
            TextElementData::Decimal(1.0),
            ConflictPolicy::Reject,
        )
        .unwrap();
    }
    assert_eq!(id_manager::nodes_with_id(&tree, x, "support"), vec![x, a]);
}

#[test]
fn empty_ids_are_never_checked() {
    let (mut tree, [_, x, ..]) = sample_tree();
    for _ in 0..2 {
        id_manager::insert_label(&mut tree, x, Label::text("", "anon"), ConflictPolicy::Reject)
            .unwrap();
    }
    assert_eq!(tree.branch(x).labels().len(), 2);
    assert!(!id_manager::is_id_present(&tree, x, ""));
    assert!(matches!(
        id_manager::insert_hidden_node_data(&mut tree, x, "", "v".into(), ConflictPolicy::Reject),
        Err(Error::InvalidId { .. })
    ));
}

#[test]
fn change_label_id_checks_collisions() {
    let (mut tree, [_, x, ..]) = sample_tree();
    let (h, _) =
        id_manager::insert_label(&mut tree, x, Label::text("a", ""), ConflictPolicy::Reject)
            .unwrap();
    id_manager::insert_hidden_branch_data(&mut tree, x, "b", "".into(), ConflictPolicy::Reject)
        .unwrap();

    assert!(id_manager::change_label_id(&mut tree, h, "b", ConflictPolicy::Reject).is_err());
    assert_eq!(tree.label(h).unwrap().id(), "a");

    id_manager::change_label_id(&mut tree, h, "c", ConflictPolicy::Reject).unwrap();
    assert_eq!(tree.label(h).unwrap().id(), "c");
    assert!(!id_manager::is_id_present(&tree, x, "a"));
}

#[test]
fn rename_id_rewrites_pie_chart_references() {
    let (mut tree, [r, x, a, ..]) = sample_tree();
    let palette = PieChartPalette::default();
    for node in [x, a] {
        id_manager::insert_hidden_node_data(
            &mut tree,
            node,
            "p1",
            TextElementData::Decimal(1.0),
            ConflictPolicy::Reject,
        )
        .unwrap();
    }
    let (pie, _) = id_manager::insert_label(
        &mut tree,
        x,
        Label::pie_chart("pie", vec!["p1".to_string(), "p2".to_string()], &palette),
        ConflictPolicy::Reject,
    )
    .unwrap();

    let summary = id_manager::rename_id(&mut tree, r, "p1", "freq").unwrap();
    assert_eq!(summary.elements, 2);
    assert_eq!(summary.references, 1);
    assert!(tree.node(a).hidden_data().contains_key("freq"));
    assert_eq!(
        tree.label(pie).unwrap().pie_chart_data().unwrap().value_ids,
        vec!["freq".to_string(), "p2".to_string()]
    );
}

#[test]
fn rename_id_fails_atomically_on_collision() {
    let (mut tree, [r, x, a, ..]) = sample_tree();
    id_manager::insert_hidden_node_data(&mut tree, a, "old", "1".into(), ConflictPolicy::Reject)
        .unwrap();
    id_manager::insert_hidden_node_data(&mut tree, x, "old", "2".into(), ConflictPolicy::Reject)
        .unwrap();
    id_manager::insert_label(&mut tree, x, Label::text("new", ""), ConflictPolicy::Reject)
        .unwrap();

    let err = id_manager::rename_id(&mut tree, r, "old", "new").unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateId {
            id: "new".to_string(),
            node: x
        }
    );
    assert!(tree.node(a).hidden_data().contains_key("old"));
}

#[test]
fn ids_in_subtree_are_sorted_and_deduplicated() {
    let (mut tree, [r, x, a, b, _]) = sample_tree();
    let palette = PieChartPalette::default();
    id_manager::insert_label(&mut tree, a, Label::text("zeta", ""), ConflictPolicy::Reject)
        .unwrap();
    id_manager::insert_label(&mut tree, b, Label::text("zeta", ""), ConflictPolicy::Reject)
        .unwrap();
    id_manager::insert_label(
        &mut tree,
        b,
        Label::pie_chart("pie", Vec::new(), &palette),
        ConflictPolicy::Reject,
    )
    .unwrap();
    id_manager::insert_hidden_node_data(&mut tree, x, "alpha", "".into(), ConflictPolicy::Reject)
        .unwrap();
    id_manager::insert_hidden_branch_data(&mut tree, x, "beta", "".into(), ConflictPolicy::Reject)
        .unwrap();

    assert_eq!(
        id_manager::ids_in_subtree(&tree, r, &IdQuery::all()),
        ["alpha", "beta", "pie", "zeta"]
    );
    assert_eq!(
        id_manager::ids_in_subtree(&tree, r, &IdQuery::labels([LabelKindTag::Text])),
        ["zeta"]
    );
}

#[test]
fn uniquify_and_new_id_avoid_existing_ids() {
    let existing = vec!["id".to_string(), "id2".to_string(), "id3".to_string()];
    assert_eq!(id_manager::uniquify("other", &existing), "other");
    assert_eq!(id_manager::uniquify("id", &existing), "id4");
    let fresh = id_manager::new_id(&existing);
    assert!(!existing.contains(&fresh));
    assert!(fresh.starts_with("ID"));
}

#[test]
fn pie_chart_angles_follow_values() {
    let (mut tree, [_, x, ..]) = sample_tree();
    let palette = PieChartPalette::default();
    id_manager::insert_label(&mut tree, x, Label::text("a", 1.0), ConflictPolicy::Reject)
        .unwrap();
    id_manager::insert_hidden_node_data(&mut tree, x, "b", 3.0.into(), ConflictPolicy::Reject)
        .unwrap();
    let ids = vec!["a".to_string(), "b".to_string()];
    let (pie, _) = id_manager::insert_label(
        &mut tree,
        x,
        Label::pie_chart("pie", ids.clone(), &palette),
        ConflictPolicy::Reject,
    )
    .unwrap();
    let (caption, _) = id_manager::insert_label(
        &mut tree,
        x,
        Label::pie_chart_caption("caption", ids, &palette),
        ConflictPolicy::Reject,
    )
    .unwrap();

    let pie = tree.label(pie).unwrap().clone();
    let caption = tree.label(caption).unwrap().clone();
    assert_eq!(id_manager::pie_chart_angles(&tree, x, &pie), vec![90.0, 270.0]);
    assert_eq!(id_manager::pie_chart_angles(&tree, x, &caption), vec![180.0, 180.0]);
}

#[test]
fn replace_branch_drops_ids_taken_by_node_data() {
    let (mut tree, [_, x, ..]) = sample_tree();
    id_manager::insert_hidden_node_data(&mut tree, x, "dup", "node".into(), ConflictPolicy::Reject)
        .unwrap();
    let (mut donor, _) = sample_tree();
    let donor_node = donor.new_node();
    id_manager::insert_label(&mut donor, donor_node, Label::text("dup", "label"), ConflictPolicy::Reject)
        .unwrap();
    id_manager::insert_label(&mut donor, donor_node, Label::text("keep", "label"), ConflictPolicy::Reject)
        .unwrap();
    let incoming: Branch = donor.branch(donor_node).clone();

    let (previous, dropped) = id_manager::replace_branch(&mut tree, x, incoming);
    assert_eq!(previous.length(), 3.0);
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].id(), "dup");
    assert_eq!(tree.branch(x).labels().len(), 1);
    assert_eq!(tree.branch(x).labels().owner(), Some(x));
}

#[test]
fn adapters_read_and_write_their_sources() {
    let (mut tree, [_, x, a, ..]) = sample_tree();

    assert_eq!(NodeNameAdapter.read(&tree, a), TextElementData::text("A"));
    assert_eq!(BranchLengthAdapter.decimal(&tree, a), Some(1.0));
    BranchLengthAdapter.write(&mut tree, a, "2.5".into()).unwrap();
    assert_eq!(tree.branch(a).length(), 2.5);
    assert!(BranchLengthAdapter.write(&mut tree, a, "long".into()).is_err());
    BranchLengthAdapter.write(&mut tree, a, TextElementData::Empty).unwrap();
    assert!(BranchLengthAdapter.is_empty(&tree, a));

    let support = HiddenBranchDataAdapter::new("support");
    assert!(support.is_empty(&tree, x));
    support.write(&mut tree, x, TextElementData::Decimal(0.7)).unwrap();
    support.write(&mut tree, x, TextElementData::Decimal(0.8)).unwrap();
    assert_eq!(support.decimal(&tree, x), Some(0.8));

    let clash = TextLabelAdapter::new("support");
    assert!(clash.write(&mut tree, x, "no".into()).is_err());

    let text = TextLabelAdapter::new("name");
    text.write(&mut tree, x, "clade".into()).unwrap();
    text.write(&mut tree, x, "clade 2".into()).unwrap();
    assert_eq!(text.read(&tree, x), TextElementData::text("clade 2"));
    assert_eq!(tree.branch(x).labels().len(), 1);

    let hidden = HiddenNodeDataAdapter::new("n");
    hidden.write(&mut tree, a, "v".into()).unwrap();
    hidden.write(&mut tree, a, TextElementData::Empty).unwrap();
    assert!(!tree.node(a).hidden_data().contains_key("n"));

    UniqueNameAdapter.write(&mut tree, a, "leaf-a".into()).unwrap();
    assert_eq!(tree.find_node_by_unique_name("leaf-a"), Some(a));
    assert!(UniqueNameAdapter.write(&mut tree, x, "leaf-a".into()).is_err());
}

#[test]
fn mutable_views_never_introduce_new_ids() {
    let (mut tree, [_, x, a, ..]) = sample_tree();
    id_manager::insert_hidden_node_data(&mut tree, x, "S", "node".into(), ConflictPolicy::Reject)
        .unwrap();
    let (handle, _) =
        id_manager::insert_label(&mut tree, x, Label::text("L", "label"), ConflictPolicy::Reject)
            .unwrap();

    // Updating a missing key through a view is a no-op, so "S" cannot appear twice on X.
    assert_eq!(tree.branch_mut(x).hidden_data_mut().update("S", "dup".into()), None);
    assert_eq!(
        tree.hidden_data_mut(HiddenDataOwner::Branch(x))
            .update("S", "dup".into()),
        None
    );
    assert!(tree.branch(x).hidden_data().is_empty());
    assert_eq!(
        id_manager::element_with_id(&tree, x, "S"),
        Some(IdHolder::HiddenNodeData)
    );

    assert_eq!(
        tree.node_mut(x).hidden_data_mut().update("S", "changed".into()),
        Some(TextElementData::text("node"))
    );
    assert_eq!(
        tree.node(x).hidden_data().get("S"),
        Some(&TextElementData::text("changed"))
    );
    assert_eq!(
        tree.hidden_data_mut(HiddenDataOwner::Node(x)).remove("S"),
        Some(TextElementData::text("changed"))
    );

    // Editing through the views keeps every owner back-reference in place.
    tree.node_mut(x).afferent_branch_mut().set_length(8.0);
    tree.branch_mut(a).format_mut().line_width = 2.0;
    assert_eq!(tree.branch(x).length(), 8.0);
    assert_eq!(tree.branch(x).labels().owner(), Some(x));
    assert_eq!(
        tree.branch(x).hidden_data().owner(),
        Some(HiddenDataOwner::Branch(x))
    );
    assert_eq!(tree.node(x).hidden_data().owner(), Some(HiddenDataOwner::Node(x)));
    assert_eq!(tree.label_owner(handle), Some(x));
    assert_eq!(tree.branch(a).format.line_width, 2.0);
}

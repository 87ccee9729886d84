mod common;

use common::{find, find_all, newick, snapshot, tree};
use treedoc_edit::model::{ChangeKind, ConflictPolicy, Label, TextElementData};
use treedoc_edit::{
    CollapseEdit, ComposedDocumentEdit, ComposedEditBuilder, DocumentEdit, EditState, Error,
    InsertLabelEdit, LadderizeEdit, LadderizeOptions, SeparateEdit, SeparateOptions,
};

#[test]
fn builder_sees_effect_of_previous_edits() {
    let mut t = tree("((A:1,B:2)X:3,C:4)R;");
    let before = snapshot(&t);
    let [a, x] = find_all(&t, ["A", "X"]);

    let mut builder = ComposedEditBuilder::new(&t, "Restructure");
    builder
        .push(|t| CollapseEdit::new(t, &[x]))
        .unwrap()
        .push(|t| SeparateEdit::new(t, a, SeparateOptions::default()))
        .unwrap();
    assert_eq!(builder.len(), 2);
    assert_eq!(newick(builder.scratch()), "((A:0.5):0.5,B:2,C:4)R;");
    assert_eq!(newick(&t), "((A:1,B:2)X:3,C:4)R;");

    let mut composed = builder.build();
    composed.redo(&mut t).unwrap();
    assert_eq!(newick(&t), "((A:0.5):0.5,B:2,C:4)R;");

    composed.undo(&mut t).unwrap();
    assert_eq!(snapshot(&t), before);

    composed.redo(&mut t).unwrap();
    assert_eq!(newick(&t), "((A:0.5):0.5,B:2,C:4)R;");
}

#[test]
fn failing_step_aborts_the_builder() {
    let t = tree("((A,B)X,C)R;");
    let a = find(&t, "A");
    let mut builder = ComposedEditBuilder::new(&t, "Broken");
    let err = builder.push(|t| CollapseEdit::new(t, &[a])).unwrap_err();
    assert!(matches!(err, Error::Precondition { .. }));
    assert!(builder.is_empty());
}

#[test]
fn change_kind_is_the_strongest_child() {
    let t = tree("((A,B)X,C)R;");
    let [a, r] = find_all(&t, ["A", "R"]);
    let mut builder = ComposedEditBuilder::new(&t, "Mixed");
    builder
        .push(|t| SeparateEdit::new(t, a, SeparateOptions::default()))
        .unwrap()
        .push(|t| LadderizeEdit::new(t, r, LadderizeOptions::default()))
        .unwrap();
    let composed = builder.build();
    assert_eq!(composed.change_kind(), ChangeKind::Topology);
    assert_eq!(composed.presentation_name(), "Mixed");
    assert_eq!(composed.len(), 2);
}

#[test]
fn warnings_are_aggregated() {
    let mut t = tree("((A,B)X,C)R;");
    let [a, b] = find_all(&t, ["A", "B"]);
    for node in [a, b] {
        treedoc_edit::model::id_manager::insert_label(
            &mut t,
            node,
            Label::text("note", "old"),
            ConflictPolicy::Reject,
        )
        .unwrap();
    }

    let mut builder = ComposedEditBuilder::new(&t, "Replace notes");
    for node in [a, b] {
        builder
            .push(|t| {
                InsertLabelEdit::new(t, node, Label::text("note", "new"), ConflictPolicy::Replace)
            })
            .unwrap();
    }
    let mut composed = builder.build();
    assert_eq!(composed.warnings().len(), 2);
    let text = composed.warning_text().unwrap();
    assert_eq!(text.lines().count(), 2);

    composed.redo(&mut t).unwrap();
    assert_eq!(t.branch(a).labels().len(), 1);
    assert_eq!(
        t.branch(a).labels().by_id("note").and_then(|l| l.text_data()),
        Some(&TextElementData::text("new"))
    );
}

#[test]
fn state_machine_is_enforced() {
    let mut t = tree("((A,B)X,C)R;");
    let x = find(&t, "X");
    let mut composed = ComposedDocumentEdit::new(
        "Collapse",
        vec![Box::new(CollapseEdit::new(&t, &[x]).unwrap())],
    );

    let err = composed.undo(&mut t).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidState {
            state: EditState::Constructed,
            ..
        }
    ));

    composed.redo(&mut t).unwrap();
    let err = composed.redo(&mut t).unwrap_err();
    assert!(matches!(err, Error::InvalidState { action: "redo", .. }), "{err}");
}

#[test]
fn empty_composed_edit_is_neutral() {
    let mut t = tree("(A,B)R;");
    let before = snapshot(&t);
    let mut composed = ComposedDocumentEdit::new("Nothing", Vec::new());
    assert!(composed.is_empty());
    assert_eq!(composed.change_kind(), ChangeKind::Neutral);
    composed.redo(&mut t).unwrap();
    composed.undo(&mut t).unwrap();
    assert_eq!(snapshot(&t), before);
}

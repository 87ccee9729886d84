use serde_json::json;
use treedoc::edit::{FormatSource, InsertLabelEdit, LadderizeDirection, NodeDataEdit};
use treedoc::model::adapter::NodeNameAdapter;
use treedoc::model::Error as ModelError;
use treedoc::{
    CollapseEdit, ComposedEditBuilder, ConflictPolicy, Document, DocumentConfig, Error, Label,
    LadderizeEdit, LadderizeOptions, NodeId, RerootEdit, SeparateEdit, SeparateOptions,
    TextElementData, Tree,
};

/// ((A:1,B:2)X:3,C:4)R, returning the tree and [R, X, A, B, C].
fn sample() -> (Tree, [NodeId; 5]) {
    let mut t = Tree::new();
    let [r, x, a, b, c] = ["R", "X", "A", "B", "C"].map(|n| t.new_node_with_data(n));
    for (parent, child, length) in [(r, x, 3.0), (x, a, 1.0), (x, b, 2.0), (r, c, 4.0)] {
        t.add_child(parent, child).unwrap();
        t.branch_mut(child).set_length(length);
    }
    t.set_paint_start(Some(r)).unwrap();
    (t, [r, x, a, b, c])
}

fn names(t: &Tree) -> Vec<String> {
    let root = t.paint_start().unwrap();
    t.leaves(root)
        .into_iter()
        .map(|n| t.node(n).data().to_string())
        .collect()
}

#[test]
fn new_document_is_empty_and_clean() {
    let doc = Document::new();
    assert!(doc.tree().is_empty());
    assert!(!doc.is_modified());
    assert!(!doc.can_undo());
    assert!(!doc.can_redo());
    assert_eq!(doc.undo_manager().limit(), Some(100));
    assert_eq!(doc.palette().len(), 8);
}

#[test]
fn edits_are_recorded() {
    let (tree, [r, x, a, ..]) = sample();
    let mut doc = Document::new();
    doc.load_tree(tree);
    assert!(!doc.is_modified());

    doc.apply(|t| CollapseEdit::new(t, &[x])).unwrap();
    assert_eq!(doc.tree().children(r).len(), 3);
    doc.apply(|t| RerootEdit::new(t, a)).unwrap();
    assert_eq!(doc.undo_presentation_name().as_deref(), Some("Undo Reroot"));
    assert!(doc.is_modified());

    doc.undo().unwrap();
    doc.undo().unwrap();
    assert_eq!(doc.tree().paint_start(), Some(r));
    assert_eq!(doc.tree().children(r)[0], x);
    assert_eq!(names(doc.tree()), ["A", "B", "C"]);
    assert!(!doc.is_modified());
    assert_eq!(doc.redo_presentation_name().as_deref(), Some("Redo Collapse node"));

    doc.redo().unwrap();
    assert_eq!(names(doc.tree()), ["A", "B", "C"]);
}

#[test]
fn failed_construction_leaves_document_untouched() {
    let (tree, [_, _, a, ..]) = sample();
    let mut doc = Document::new();
    doc.load_tree(tree);
    let err = doc.apply(|t| CollapseEdit::new(t, &[a])).unwrap_err();
    assert!(matches!(err, Error::Edit(treedoc::edit::Error::Precondition { .. })));
    assert!(!doc.can_undo());
    assert!(!doc.is_modified());
}

#[test]
fn warnings_are_returned() {
    let (mut tree, [_, _, a, ..]) = sample();
    treedoc::model::id_manager::insert_label(
        &mut tree,
        a,
        Label::text("note", "old"),
        ConflictPolicy::Reject,
    )
    .unwrap();
    let mut doc = Document::new();
    doc.load_tree(tree);

    let warnings = doc
        .apply(|t| InsertLabelEdit::new(t, a, Label::text("note", "new"), ConflictPolicy::Replace))
        .unwrap();
    assert!(warnings.is_some());
}

#[test]
fn composed_edit_is_one_undo_step() {
    let (tree, [r, x, ..]) = sample();
    let mut doc = Document::new();
    doc.load_tree(tree);

    let mut builder = ComposedEditBuilder::new(doc.tree(), "Tidy");
    builder
        .push(|t| CollapseEdit::new(t, &[x]))
        .unwrap()
        .push(|t| {
            LadderizeEdit::new(
                t,
                r,
                LadderizeOptions {
                    direction: LadderizeDirection::Descending,
                    ..Default::default()
                },
            )
        })
        .unwrap();
    doc.execute(builder.build()).unwrap();
    assert_eq!(doc.undo_manager().undo_count(), 1);
    assert_eq!(doc.undo_presentation_name().as_deref(), Some("Undo Tidy"));

    doc.undo().unwrap();
    assert_eq!(names(doc.tree()), ["A", "B", "C"]);
    assert_eq!(doc.tree().children(r)[0], x);
}

#[test]
fn config_from_json() {
    let doc = Document::from_config_json(
        r##"{ "undo": { "limit": 5 }, "pieChart": { "colors": ["#ff0000", "#00ff00"] } }"##,
    )
    .unwrap();
    assert_eq!(doc.undo_manager().limit(), Some(5));
    assert_eq!(doc.palette().len(), 2);
    // Untouched keys keep their defaults.
    assert_eq!(doc.config().line_index_increment(), 10);

    let err = Document::from_config_json("[1, 2]").unwrap_err();
    assert!(matches!(err, Error::Model(ModelError::InvalidConfig { .. })));
}

#[test]
fn set_config_value_updates_derived_state() {
    let mut doc = Document::with_config(DocumentConfig::default()).unwrap();
    doc.set_config_value("undo.limit", json!(0)).unwrap();
    assert_eq!(doc.undo_manager().limit(), None);

    doc.set_config_value("labels.lineIndexIncrement", json!(4)).unwrap();
    assert_eq!(doc.tree().line_index_increment(), 4);

    let err = doc
        .set_config_value("pieChart.colors", json!(["not a color"]))
        .unwrap_err();
    assert!(matches!(err, Error::Model(_)));
    assert_eq!(doc.palette().len(), 8);
}

#[test]
fn loading_a_tree_discards_history() {
    let (tree, [_, x, ..]) = sample();
    let mut doc = Document::new();
    doc.load_tree(tree);
    doc.apply(|t| CollapseEdit::new(t, &[x])).unwrap();
    assert!(doc.can_undo());

    let mut other = Tree::new();
    let root = other.new_node_with_data(TextElementData::text("only"));
    other.set_paint_start(Some(root)).unwrap();
    doc.load_tree(other);
    assert!(!doc.can_undo());
    assert!(!doc.is_modified());
    assert_eq!(doc.tree().node(root).data().as_text(), Some("only"));
}

#[test]
fn decimal_settings_format_new_nodes() {
    let mut doc =
        Document::from_config_json(r#"{ "decimal": { "maxFractionDigits": 2 } }"#).unwrap();
    assert_eq!(doc.tree().scale_bar().format.decimal_format.max_fraction_digits, 2);

    let (tree, [r, x, ..]) = sample();
    doc.load_tree(tree);
    let value = TextElementData::decimal(1.23456);
    assert_eq!(doc.tree().format_value(&value), "1.23");

    let options = SeparateOptions {
        format_source: FormatSource::Default,
    };
    doc.apply(|t| SeparateEdit::new(t, x, options)).unwrap();
    let middle = doc.tree().parent(x).unwrap();
    let names = [(middle, value.clone()), (r, value.clone())];
    doc.apply(|t| NodeDataEdit::new(t, &NodeNameAdapter, &names)).unwrap();
    assert_eq!(doc.tree().node_text(middle), "1.23");
    // Nodes of a loaded tree keep their own format.
    assert_eq!(doc.tree().node_text(r), "1.23456");

    doc.set_config_value("decimal.maxFractionDigits", json!(3)).unwrap();
    assert_eq!(doc.tree().format_value(&value), "1.235");
    assert_eq!(doc.tree().node_text(middle), "1.23");
}

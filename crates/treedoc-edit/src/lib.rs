#![forbid(unsafe_code)]

//! Undo/redo edit engine and topology algorithms for `treedoc-core` trees.
//!
//! Every edit is constructed against the current tree, capturing its complete effect eagerly.
//! Constructing an edit never modifies the tree; preconditions are checked at that point.
//! `redo`/`undo` replay the captured change and commit the tree.

pub use treedoc_core as model;

pub mod composed;
pub mod edit;
pub mod edits;
pub mod error;
mod legend_anchor;
pub mod topology;
pub mod undo;

pub use composed::{ComposedDocumentEdit, ComposedEditBuilder};
pub use edit::{DocumentEdit, EditState, EditWarnings, RecordedChange};
pub use edits::{
    ChangeLabelIdEdit, DeleteLabelEdit, DeleteLegendEdit, DeleteSubtreeEdit, HiddenDataEdit,
    HiddenDataTarget, InsertLabelEdit, InsertLegendEdit, NodeDataEdit, PasteSubtreeEdit,
    RenameIdEdit,
};
pub use error::{Error, Result};
pub use topology::{
    CollapseBySupportEdit, CollapseEdit, FormatSource, JoinEdit, LadderizeDirection,
    LadderizeEdit, LadderizeMetric, LadderizeOptions, LeafSet, LeafSetIndex, RerootCandidates,
    RerootEdit, SeparateEdit, SeparateOptions, SortLeavesEdit,
};
pub use undo::UndoManager;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

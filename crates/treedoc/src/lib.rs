#![forbid(unsafe_code)]

//! `treedoc` is the headless document core of a phylogenetic tree editor.
//!
//! A [`Document`] couples a [`Tree`] with its undo history and settings. All changes go through
//! edits (see [`edit`]); every edit is reversible unless it says otherwise.
//!
//! ```
//! use treedoc::{CollapseEdit, Document, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.new_node();
//! let inner = tree.new_node();
//! tree.add_child(root, inner)?;
//! for name in ["A", "B"] {
//!     let leaf = tree.new_node_with_data(name);
//!     tree.add_child(inner, leaf)?;
//! }
//! tree.set_paint_start(Some(root))?;
//!
//! let mut doc = Document::new();
//! doc.load_tree(tree);
//! doc.apply(|t| CollapseEdit::new(t, &[inner]))?;
//! assert_eq!(doc.tree().children(root).len(), 2);
//! assert!(doc.is_modified());
//!
//! doc.undo()?;
//! assert_eq!(doc.tree().children(root), &[inner]);
//! assert!(!doc.is_modified());
//! # Ok::<(), treedoc::Error>(())
//! ```

mod document;
mod error;

pub use document::Document;
pub use error::{Error, Result};

pub use treedoc_core as model;
pub use treedoc_edit as edit;

pub use treedoc_core::{
    Branch, ChangeKind, ConflictPolicy, DocumentConfig, Label, LabelHandle, Legend, LegendHandle,
    NodeBranchDataAdapter, NodeId, PieChartPalette, TextElementData, Tree,
};
pub use treedoc_edit::{
    CollapseBySupportEdit, CollapseEdit, ComposedEditBuilder, DocumentEdit, JoinEdit,
    LadderizeEdit, LadderizeOptions, RerootEdit, SeparateEdit, SeparateOptions, SortLeavesEdit,
    UndoManager,
};

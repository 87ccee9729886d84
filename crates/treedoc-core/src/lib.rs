#![forbid(unsafe_code)]

//! Document model for annotated phylogenetic trees (headless).
//!
//! A [`Tree`] owns an arena of nodes. Every node owns the branch leading to it, and branches
//! carry labels and hidden data. Legends attach to nodes through their unique names. IDs of
//! labels and hidden data are unique per node; [`id_manager`] is the only way to introduce new
//! ones.
//!
//! The edit engine and topology operations live in `treedoc-edit`.

pub mod adapter;
pub mod config;
pub mod error;
pub mod format;
pub mod hidden_data;
pub mod id_manager;
pub mod label;
pub mod legend;
pub mod scale_bar;
pub mod text;
pub mod tree;

pub use adapter::NodeBranchDataAdapter;
pub use config::{DocumentConfig, PieChartPalette};
pub use error::{Error, Result};
pub use hidden_data::{HiddenDataMap, HiddenDataMut, HiddenDataOwner};
pub use id_manager::{ConflictPolicy, IdHolder, InsertOutcome, RemovedIdElement};
pub use label::{Label, LabelHandle, LabelKind, LabelKindTag, LabelSide, Labels};
pub use legend::{Legend, LegendHandle, LegendMut, Legends};
pub use scale_bar::ScaleBar;
pub use text::{DecimalFormat, TextElementData};
pub use tree::{
    Branch, BranchMut, ChangeKind, ElementRef, Node, NodeId, NodeMut, Tree, TreeChangeEvent,
    TreeDelta, TreeListener,
};

#[cfg(test)]
mod tests;

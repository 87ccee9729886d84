//! Edits of labels, hidden data, node values, legends and whole subtrees.

pub mod hidden_data;
pub mod label;
pub mod legend;
pub mod node_data;
pub mod rename_id;
pub mod subtree;

pub use hidden_data::{HiddenDataEdit, HiddenDataTarget};
pub use label::{ChangeLabelIdEdit, DeleteLabelEdit, InsertLabelEdit};
pub use legend::{DeleteLegendEdit, InsertLegendEdit};
pub use node_data::NodeDataEdit;
pub use rename_id::RenameIdEdit;
pub use subtree::{DeleteSubtreeEdit, PasteSubtreeEdit};

use crate::edit::EditWarnings;
use treedoc_core::{InsertOutcome, NodeId};

pub(crate) fn report_replaced(outcome: &InsertOutcome, node: NodeId, warnings: &mut EditWarnings) {
    if let Some(previous) = outcome.replaced() {
        warnings.push(format!(
            "The element with ID \"{}\" on node {node} was replaced.",
            previous.id()
        ));
    }
}

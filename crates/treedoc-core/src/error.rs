use crate::label::LabelHandle;
use crate::legend::LegendHandle;
use crate::tree::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("node {node} already holds an element with ID \"{id}\"")]
    DuplicateId { id: String, node: NodeId },

    #[error("unique node name \"{name}\" is already used by node {node}")]
    DuplicateUniqueName { name: String, node: NodeId },

    #[error("node {child} already has a parent")]
    AlreadyAttached { child: NodeId },

    #[error("attaching node {child} below node {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("child index {index} is out of range for node {parent}")]
    ChildIndexOutOfRange { parent: NodeId, index: usize },

    #[error("new child order of node {parent} is not a permutation of its children")]
    InvalidChildOrder { parent: NodeId },

    #[error("{0} is not part of the tree")]
    UnknownLabel(LabelHandle),

    #[error("{0} is not part of the tree")]
    UnknownLegend(LegendHandle),

    #[error("invalid ID \"{id}\": {message}")]
    InvalidId { id: String, message: String },

    #[error("cannot write {adapter} of node {node}: {message}")]
    AdapterWrite {
        adapter: String,
        node: NodeId,
        message: String,
    },

    #[error("invalid document config: {message}")]
    InvalidConfig { message: String },
}

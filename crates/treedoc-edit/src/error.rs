use crate::edit::EditState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] treedoc_core::Error),

    /// The edit cannot be performed on the current tree. Nothing was modified.
    #[error("cannot {operation}: {message}")]
    Precondition {
        operation: &'static str,
        message: String,
    },

    #[error("cannot {action} \"{edit}\" while it is {state}")]
    InvalidState {
        edit: String,
        action: &'static str,
        state: EditState,
    },

    #[error("\"{0}\" cannot be undone")]
    CannotUndo(String),

    #[error("\"{0}\" cannot be redone")]
    CannotRedo(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

impl Error {
    pub(crate) fn precondition(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Precondition {
            operation,
            message: message.into(),
        }
    }
}

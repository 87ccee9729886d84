pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] treedoc_core::Error),
    #[error(transparent)]
    Edit(#[from] treedoc_edit::Error),
}

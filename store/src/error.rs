use thiserror::Error;

/// Failure surface shared by every repository trait in this crate.
///
/// The in-memory store only ever produces [`StoreError::NotFound`] and
/// [`StoreError::Duplicate`]; the latter doubles as the signal that a
/// one-shot write (cancelling a proposal, committing a tally result,
/// recording a ballot) has already happened. [`StoreError::Backend`] is
/// reserved for implementations sitting on fallible storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("no such record: {0}")]
    NotFound(String),

    /// A write that may happen at most once was attempted again.
    #[error("already recorded: {0}")]
    Duplicate(String),

    /// The underlying storage failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

//! Error type shared by the asset and persistence stores.

/// Errors from reading or writing stored documents.
///
/// Callers on the paint path never see these directly: the session and
/// the write queue log them and carry on with an empty or default value.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be (de)serialized.
    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The addressed record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A key cannot be used as a document name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

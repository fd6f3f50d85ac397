//! Error types for ADF decoding.

/// Error while decoding or encoding an ADF document.
#[derive(Debug, thiserror::Error)]
pub enum AdfError {
    /// JSON serialization/deserialization error.
    #[error("invalid ADF JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Root node is not a `doc`.
    #[error("expected root node of type \"doc\", found \"{0}\"")]
    NotADocument(String),
}

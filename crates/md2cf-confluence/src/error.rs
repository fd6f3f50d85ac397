//! Error types for Confluence integration.

use md2cf_adf::AdfError;

/// Error from a page store or Confluence URL handling.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// Requested resource does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Resource kind ("page", "folder", "space").
        kind: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Page body could not be encoded or decoded as ADF.
    #[error("invalid page body")]
    Adf(#[from] AdfError),

    /// Input is not a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL does not point to a Confluence space, page or folder.
    #[error(
        "Could not parse Confluence URL: {0}. Expected format: https://domain.atlassian.net/wiki/spaces/SPACE/pages/12345 or .../folder/12345"
    )]
    UnrecognizedUrl(String),

    /// Input is neither a page id nor a page URL.
    #[error("No page ID found in: {0}")]
    MissingPageId(String),
}

/// Error while syncing a document to a page.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Page store or URL error.
    #[error(transparent)]
    Confluence(#[from] ConfluenceError),

    /// Remote page body could not be decoded.
    #[error("remote page body is not valid ADF")]
    RemoteBody(#[source] AdfError),

    /// Update requested for a URL without a page id.
    #[error("URL must point to a specific page for updates. To create a new page, use --create flag.")]
    UpdateRequiresPage,
}

//! Error types for merging.

/// Error while configuring a merge.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Strategy name is not one of the known strategies.
    #[error("unknown merge strategy \"{0}\" (expected one of: local-wins, remote-wins, append, auto-merge)")]
    UnknownStrategy(String),
}

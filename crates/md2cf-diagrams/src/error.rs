//! Diagram rendering errors.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Why a diagram could not be rendered.
///
/// The `Display` text is shown in the title of the diagram's source section.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to prepare diagram source: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {status}", program.display())]
    Exit { program: PathBuf, status: ExitStatus },

    /// Message reported by the renderer (stderr for `mmdc`).
    #[error("{0}")]
    Message(String),

    #[error("PNG file was not generated")]
    MissingOutput,
}

//! Rendering through the mermaid CLI (`mmdc`).

use std::path::PathBuf;
use std::process::Command;

use crate::block::{DiagramRenderer, RenderedDiagram};
use crate::error::RenderError;

/// Renders diagrams by running `mmdc` on a temporary file.
///
/// Each call writes the source to a fresh temporary directory, runs
/// `mmdc -i diagram.mmd -o diagram.png -b white -s 2 --quiet` and reads back
/// the PNG. The directory is removed afterwards.
#[derive(Debug, Clone)]
pub struct MmdcRenderer {
    program: PathBuf,
}

impl Default for MmdcRenderer {
    fn default() -> Self {
        Self::new("mmdc")
    }
}

impl MmdcRenderer {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, source: &str, index: usize) -> Result<RenderedDiagram, RenderError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join(format!("diagram-{index}.mmd"));
        let output = dir.path().join(format!("diagram-{index}.png"));
        std::fs::write(&input, source)?;

        tracing::debug!(program = %self.program.display(), index, "Running mermaid CLI");
        let result = Command::new(&self.program)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .args(["-b", "white", "-s", "2", "--quiet"])
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let message = stderr.trim();
            return Err(if message.is_empty() {
                RenderError::Exit {
                    program: self.program.clone(),
                    status: result.status,
                }
            } else {
                RenderError::Message(message.to_owned())
            });
        }

        let png = std::fs::read(&output).map_err(|_| RenderError::MissingOutput)?;
        Ok(RenderedDiagram::new(png, index))
    }
}

impl DiagramRenderer for MmdcRenderer {
    fn render(&self, source: &str, index: usize) -> Result<RenderedDiagram, RenderError> {
        self.run(source, index)
    }
}

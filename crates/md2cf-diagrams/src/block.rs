//! Diagram records and the rendering capability.

use std::collections::HashMap;

use md2cf_converter::Placeholder;

use crate::error::RenderError;

/// Default attachment filename for the diagram at `index`.
#[must_use]
pub fn default_filename(index: usize) -> String {
    format!("mermaid-diagram-{index}.png")
}

/// A successfully rendered diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    /// PNG image bytes.
    pub png: Vec<u8>,
    /// Attachment filename.
    pub filename: String,
}

impl RenderedDiagram {
    /// Rendered diagram with the default filename for `index`.
    #[must_use]
    pub fn new(png: Vec<u8>, index: usize) -> Self {
        Self {
            png,
            filename: default_filename(index),
        }
    }
}

/// Renders diagram source to an image.
///
/// Implemented for closures `Fn(&str, usize) -> Result<RenderedDiagram, RenderError>`.
pub trait DiagramRenderer {
    /// Render trimmed diagram `source`, the `index`-th diagram in the document.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] whose message explains the failure.
    fn render(&self, source: &str, index: usize) -> Result<RenderedDiagram, RenderError>;
}

impl<F> DiagramRenderer for F
where
    F: Fn(&str, usize) -> Result<RenderedDiagram, RenderError>,
{
    fn render(&self, source: &str, index: usize) -> Result<RenderedDiagram, RenderError> {
        self(source, index)
    }
}

/// Result of rendering one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(RenderedDiagram),
    Failed { error: String },
}

/// A mermaid block extracted from Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidBlock {
    pub index: usize,
    /// Trimmed diagram source.
    pub code: String,
    pub outcome: RenderOutcome,
    pub placeholder: String,
}

impl MermaidBlock {
    /// Whether the diagram rendered.
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self.outcome, RenderOutcome::Rendered(_))
    }

    /// Attachment filename of a rendered diagram.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        match &self.outcome {
            RenderOutcome::Rendered(diagram) => Some(&diagram.filename),
            RenderOutcome::Failed { .. } => None,
        }
    }

    /// PNG bytes of a rendered diagram.
    #[must_use]
    pub fn png(&self) -> Option<&[u8]> {
        match &self.outcome {
            RenderOutcome::Rendered(diagram) => Some(&diagram.png),
            RenderOutcome::Failed { .. } => None,
        }
    }

    /// Render error of a failed diagram.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            RenderOutcome::Rendered(_) => None,
            RenderOutcome::Failed { error } => Some(error),
        }
    }
}

impl Placeholder for MermaidBlock {
    fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// An uploaded attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Media file id.
    pub file_id: String,
    /// Media collection name.
    pub collection_name: String,
}

/// Uploaded attachments by filename.
pub type AttachmentMap = HashMap<String, Attachment>;

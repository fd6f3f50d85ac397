//! Mermaid diagram support for md2cf.
//!
//! Diagrams are handled in two phases around the Markdown to ADF conversion:
//!
//! 1. [`strip_diagram_blocks`] renders every ` ```mermaid ` fence through a
//!    [`DiagramRenderer`] and replaces it with a sentinel line.
//! 2. After conversion, and after the caller has uploaded the rendered PNGs,
//!    [`inject_diagram_references`] replaces each sentinel with a
//!    `mediaSingle` image (when an attachment exists) and an `expand` holding
//!    the diagram source.
//!
//! Uploading is not part of this crate. The two phases are separate so that
//! attachment ids, which only exist after the page exists, can be injected
//! afterwards.
//!
//! # Example
//!
//! ```
//! use md2cf_converter::markdown_to_adf;
//! use md2cf_diagrams::{
//!     AttachmentMap, RenderError, RenderedDiagram, inject_diagram_references, strip_diagram_blocks,
//! };
//!
//! let render = |_: &str, index: usize| Ok::<_, RenderError>(RenderedDiagram::new(vec![0x89], index));
//! let extraction = strip_diagram_blocks("```mermaid\ngraph TD; A-->B\n```\n", &render);
//!
//! let doc = markdown_to_adf(&extraction.markdown);
//! let doc = inject_diagram_references(&doc, &extraction.blocks, &AttachmentMap::new());
//! assert_eq!(doc.content[0].node_type, "expand");
//! ```

mod block;
mod error;
mod extract;
mod inject;
mod mmdc;

pub use block::{
    Attachment, AttachmentMap, DiagramRenderer, MermaidBlock, RenderOutcome, RenderedDiagram,
    default_filename,
};
pub use error::RenderError;
pub use extract::{DIAGRAM_PREFIX, DiagramExtraction, ERROR_PREFIX, has_mermaid_blocks, strip_diagram_blocks};
pub use inject::{SOURCE_TITLE, inject_diagram_references};
pub use mmdc::MmdcRenderer;

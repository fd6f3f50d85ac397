//! Atlassian Document Format to Markdown rendering.
//!
//! The inverse of `md2cf-converter`, used to pull a page's current content
//! down as Markdown before merging:
//!
//! | ADF node      | Markdown                              |
//! |---------------|---------------------------------------|
//! | `panel`       | `> [!NOTE]` alert blockquote          |
//! | `expand`      | `:::expand Title` ... `:::`           |
//! | `extension`   | `<!-- confluence:KEY -->`             |
//! | `mediaSingle` | `![alt](url)` or `![alt](attachment:id)` |
//!
//! Rendering never fails. Malformed documents render on a best-effort basis
//! and unknown node types fall back to their text content.
//!
//! # Example
//!
//! ```
//! use md2cf_adf::{AdfDocument, AdfNode};
//! use md2cf_renderer::adf_to_markdown;
//!
//! let doc = AdfDocument::new(vec![
//!     AdfNode::heading(2, vec![AdfNode::text("Setup")]),
//!     AdfNode::paragraph(vec![AdfNode::text("Install it.")]),
//! ]);
//! assert_eq!(adf_to_markdown(&doc), "## Setup\n\nInstall it.\n");
//! ```

mod block;
mod inline;
mod table;

use md2cf_adf::AdfDocument;

/// Render an ADF document to Markdown.
///
/// Top-level blocks are separated by a blank line and the output ends with
/// exactly one newline.
#[must_use]
pub fn adf_to_markdown(doc: &AdfDocument) -> String {
    let mut markdown = block::render_blocks(&doc.content);
    markdown.truncate(markdown.trim_end().len());
    markdown.push('\n');
    markdown
}

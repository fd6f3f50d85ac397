//! Phase 2: replace diagram sentinels with images and source sections.

use md2cf_adf::{AdfDocument, AdfNode};
use md2cf_converter::placeholder;

use crate::block::{AttachmentMap, MermaidBlock, RenderOutcome};

/// Expand title for a rendered diagram's source.
pub const SOURCE_TITLE: &str = "View Mermaid Source Code";

/// Replace each diagram sentinel with an image and a collapsible source.
///
/// A rendered block whose filename is in `attachments` produces a
/// `mediaSingle` node followed by an `expand` holding the source. Failed
/// blocks, and rendered blocks that were never uploaded, produce only the
/// `expand`.
#[must_use]
pub fn inject_diagram_references(
    doc: &AdfDocument,
    blocks: &[MermaidBlock],
    attachments: &AttachmentMap,
) -> AdfDocument {
    placeholder::inject_blocks(doc, blocks, "mermaid", |block| {
        let mut nodes = Vec::with_capacity(2);
        if let Some(filename) = block.filename() {
            match attachments.get(filename) {
                Some(attachment) => nodes.push(
                    AdfNode::new("mediaSingle")
                        .with_attr("layout", "center")
                        .with_content(vec![
                            AdfNode::new("media")
                                .with_attr("type", "file")
                                .with_attr("id", attachment.file_id.as_str())
                                .with_attr("collection", attachment.collection_name.as_str())
                                .with_attr("alt", filename),
                        ]),
                ),
                None => tracing::debug!(index = block.index, filename, "Diagram was not uploaded"),
            }
        }
        nodes.push(source_expand(block));
        nodes
    })
}

fn source_expand(block: &MermaidBlock) -> AdfNode {
    let title = match &block.outcome {
        RenderOutcome::Rendered(_) => SOURCE_TITLE.to_owned(),
        RenderOutcome::Failed { error } if error.is_empty() => {
            "Mermaid Source (render failed: unknown error)".to_owned()
        }
        RenderOutcome::Failed { error } => format!("Mermaid Source (render failed: {error})"),
    };
    AdfNode::expand(
        &title,
        vec![AdfNode::code_block(Some("text"), &block.code)],
    )
}

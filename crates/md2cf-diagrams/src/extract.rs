//! Phase 1: render mermaid fences and replace them with sentinels.

use md2cf_converter::FenceTracker;
use md2cf_converter::placeholder::{self, LineBuffer};

use crate::block::{DiagramRenderer, MermaidBlock, RenderOutcome};

/// Sentinel prefix for rendered diagrams.
pub const DIAGRAM_PREFIX: &str = "MERMAID_DIAGRAM_PLACEHOLDER_";
/// Sentinel prefix for diagrams that failed to render.
pub const ERROR_PREFIX: &str = "MERMAID_ERROR_PLACEHOLDER_";

const MERMAID: &str = "mermaid";

/// Result of [`strip_diagram_blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramExtraction {
    /// Markdown with mermaid fences replaced by sentinels.
    pub markdown: String,
    /// Extracted blocks in document order.
    pub blocks: Vec<MermaidBlock>,
}

impl DiagramExtraction {
    /// Blocks that rendered successfully.
    pub fn rendered(&self) -> impl Iterator<Item = &MermaidBlock> {
        self.blocks.iter().filter(|b| b.success())
    }
}

/// A mermaid fence found in the Markdown.
struct Fence {
    /// Index of the opening fence line.
    start: usize,
    /// Index one past the closing fence line (or the last line).
    end: usize,
    code: String,
}

/// Whether the Markdown contains a mermaid fence outside other fences.
#[must_use]
pub fn has_mermaid_blocks(markdown: &str) -> bool {
    let mut fence = FenceTracker::new();
    markdown
        .lines()
        .any(|line| fence.update(line) && fence.info() == Some(MERMAID))
}

/// Render every mermaid fence and replace it with a sentinel.
///
/// Blocks are rendered in document order with the trimmed source. Rendered
/// blocks get a `MERMAID_DIAGRAM_PLACEHOLDER_` sentinel, failed ones a
/// `MERMAID_ERROR_PLACEHOLDER_` sentinel. A render failure never fails the
/// pass.
pub fn strip_diagram_blocks<R>(markdown: &str, renderer: &R) -> DiagramExtraction
where
    R: DiagramRenderer + ?Sized,
{
    let lines: Vec<&str> = markdown.lines().collect();
    let fences = find_mermaid_fences(&lines);
    if fences.is_empty() {
        return DiagramExtraction {
            markdown: markdown.to_owned(),
            blocks: Vec::new(),
        };
    }

    let nonce = placeholder::nonce(markdown);
    let mut out = LineBuffer::new();
    let mut blocks = Vec::with_capacity(fences.len());
    let mut next_line = 0;

    for (index, fence) in fences.into_iter().enumerate() {
        for line in &lines[next_line..fence.start] {
            out.push(line);
        }
        next_line = fence.end;

        let (prefix, outcome) = match renderer.render(&fence.code, index) {
            Ok(diagram) => (DIAGRAM_PREFIX, RenderOutcome::Rendered(diagram)),
            Err(error) => {
                tracing::warn!(index, %error, "Failed to render mermaid diagram");
                (
                    ERROR_PREFIX,
                    RenderOutcome::Failed {
                        error: error.to_string(),
                    },
                )
            }
        };

        let placeholder = placeholder::sentinel(prefix, index, &nonce);
        out.push_sentinel(&placeholder);

        blocks.push(MermaidBlock {
            index,
            code: fence.code,
            outcome,
            placeholder,
        });
    }
    for line in &lines[next_line..] {
        out.push(line);
    }

    tracing::debug!(
        count = blocks.len(),
        failed = blocks.iter().filter(|b| !b.success()).count(),
        "Extracted mermaid diagrams"
    );
    DiagramExtraction {
        markdown: out.finish(markdown),
        blocks,
    }
}

fn find_mermaid_fences(lines: &[&str]) -> Vec<Fence> {
    let mut fences = Vec::new();
    let mut tracker = FenceTracker::new();
    let mut open: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        if !tracker.update(line) {
            continue;
        }
        match open {
            None if tracker.info() == Some(MERMAID) => open = Some(i),
            Some(start) if !tracker.in_fence() => {
                fences.push(Fence {
                    start,
                    end: i + 1,
                    code: lines[start + 1..i].join("\n").trim().to_owned(),
                });
                open = None;
            }
            _ => {}
        }
    }

    // An unclosed fence runs to the end of the document
    if let Some(start) = open {
        fences.push(Fence {
            start,
            end: lines.len(),
            code: lines[start + 1..].join("\n").trim().to_owned(),
        });
    }
    fences
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::block::RenderedDiagram;
    use crate::error::RenderError;

    fn ok_renderer(source: &str, index: usize) -> Result<RenderedDiagram, RenderError> {
        Ok(RenderedDiagram::new(source.as_bytes().to_vec(), index))
    }

    fn failing_renderer(_: &str, _: usize) -> Result<RenderedDiagram, RenderError> {
        Err(RenderError::Message("Parse error on line 1".to_owned()))
    }

    #[test]
    fn test_extracts_and_renders() {
        let md = "# Doc\n\n```mermaid\n  graph TD\n  A-->B\n```\n\nAfter\n";
        let result = strip_diagram_blocks(md, &ok_renderer);

        assert_eq!(result.blocks.len(), 1);
        let block = &result.blocks[0];
        assert_eq!(block.code, "graph TD\n  A-->B");
        assert!(block.success());
        assert_eq!(block.filename(), Some("mermaid-diagram-0.png"));
        assert!(block.placeholder.starts_with("MERMAID_DIAGRAM_PLACEHOLDER_0_"));
        assert!(result.markdown.contains(&block.placeholder));
        assert!(!result.markdown.contains("```"));
        assert!(result.markdown.starts_with("# Doc\n"));
        assert!(result.markdown.ends_with("After\n"));
    }

    #[test]
    fn test_failed_render_uses_error_sentinel() {
        let result = strip_diagram_blocks("```mermaid\nbad\n```", &failing_renderer);

        let block = &result.blocks[0];
        assert!(!block.success());
        assert_eq!(block.error(), Some("Parse error on line 1"));
        assert!(block.placeholder.starts_with("MERMAID_ERROR_PLACEHOLDER_0_"));
        assert!(result.markdown.contains(&block.placeholder));
    }

    #[test]
    fn test_render_order_and_indexes() {
        let seen = RefCell::new(Vec::new());
        let renderer = |source: &str, index: usize| {
            seen.borrow_mut().push((index, source.to_owned()));
            if index == 1 {
                Err(RenderError::Message("boom".to_owned()))
            } else {
                Ok(RenderedDiagram::new(Vec::new(), index))
            }
        };

        let md = "```mermaid\nA\n```\n\n```mermaid\nB\n```\n\n```mermaid\nC\n```\n";
        let result = strip_diagram_blocks(md, &renderer);

        assert_eq!(
            seen.into_inner(),
            vec![(0, "A".to_owned()), (1, "B".to_owned()), (2, "C".to_owned())]
        );
        let successes: Vec<_> = result.blocks.iter().map(MermaidBlock::success).collect();
        assert_eq!(successes, vec![true, false, true]);
        assert_eq!(result.rendered().count(), 2);
    }

    #[test]
    fn test_other_fences_untouched() {
        let md = "```rust\nfn main() {}\n```\n";
        let result = strip_diagram_blocks(md, &ok_renderer);
        assert!(result.blocks.is_empty());
        assert_eq!(result.markdown, md);
    }

    #[test]
    fn test_mermaid_inside_outer_fence_untouched() {
        let md = "````markdown\n```mermaid\nA-->B\n```\n````\n";
        let result = strip_diagram_blocks(md, &ok_renderer);
        assert!(result.blocks.is_empty());
        assert!(!has_mermaid_blocks(md));
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let result = strip_diagram_blocks("```mermaid\ngraph LR\nA-->B\n", &ok_renderer);
        assert_eq!(result.blocks[0].code, "graph LR\nA-->B");
    }

    #[test]
    fn test_each_call_starts_fresh() {
        let md = "```mermaid\nA\n```\n";
        let first = strip_diagram_blocks(md, &ok_renderer);
        let second = strip_diagram_blocks(md, &ok_renderer);
        assert_eq!(first, second);
        assert_eq!(second.blocks[0].index, 0);
    }

    #[test]
    fn test_has_mermaid_blocks() {
        assert!(has_mermaid_blocks("text\n\n```mermaid\nA\n```"));
        assert!(has_mermaid_blocks("~~~mermaid\nA\n~~~"));
        assert!(!has_mermaid_blocks("```\nmermaid\n```"));
        assert!(!has_mermaid_blocks("no diagrams"));
    }
}

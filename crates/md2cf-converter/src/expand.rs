//! `:::expand` sections as Confluence expand macros.
//!
//! ```markdown
//! :::expand Show details
//! Hidden **content**.
//! :::
//! ```

use std::sync::LazyLock;

use md2cf_adf::{AdfDocument, AdfNode};
use regex::Regex;

use crate::baseline;
use crate::fence::FenceTracker;
use crate::placeholder::{self, EXPAND_PREFIX, LineBuffer, Placeholder};

/// Expand opening line, capturing the title.
static EXPAND_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:::expand(?:\s+(.*?))?\s*$").expect("invalid regex"));

/// A stripped expand section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandBlock {
    pub index: usize,
    pub title: String,
    pub content_markdown: String,
    pub placeholder: String,
}

impl Placeholder for ExpandBlock {
    fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// Result of [`strip_expand_blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandStrip {
    pub markdown: String,
    pub expands: Vec<ExpandBlock>,
}

/// Replace `:::expand` sections with sentinels.
///
/// The body runs to the first line that is exactly `:::` outside a code
/// fence inside the body, or to the end of the document. An opening line
/// inside a body stays part of that body.
#[must_use]
pub fn strip_expand_blocks(markdown: &str) -> ExpandStrip {
    let nonce = placeholder::nonce(markdown);
    let lines: Vec<&str> = markdown.lines().collect();
    let mut out = LineBuffer::new();
    let mut expands = Vec::new();
    let mut fence = FenceTracker::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        let is_fence_line = fence.update(line);
        if is_fence_line || fence.in_fence() {
            out.push(line);
            continue;
        }

        let Some(caps) = EXPAND_OPEN.captures(line) else {
            out.push(line);
            continue;
        };
        let title = caps.get(1).map_or("", |m| m.as_str()).to_owned();

        let mut body = Vec::new();
        let mut body_fence = FenceTracker::new();
        let mut closed = false;
        while let Some(&next) = lines.get(i) {
            i += 1;
            let is_fence_line = body_fence.update(next);
            if !is_fence_line && !body_fence.in_fence() && next.trim() == ":::" {
                closed = true;
                break;
            }
            body.push(next);
        }
        if !closed {
            tracing::warn!(title, "Unterminated expand section runs to end of document");
        }

        let placeholder = placeholder::sentinel(EXPAND_PREFIX, expands.len(), &nonce);
        out.push_sentinel(&placeholder);
        expands.push(ExpandBlock {
            index: expands.len(),
            title,
            content_markdown: placeholder::join_body(&body),
            placeholder,
        });
    }

    if expands.is_empty() {
        return ExpandStrip {
            markdown: markdown.to_owned(),
            expands,
        };
    }

    tracing::debug!(count = expands.len(), "Replaced expand sections");
    ExpandStrip {
        markdown: out.finish(markdown),
        expands,
    }
}

/// Replace expand sentinels with `expand` nodes.
#[must_use]
pub fn inject_expand_adf(doc: &AdfDocument, expands: &[ExpandBlock]) -> AdfDocument {
    inject_expand_adf_with(doc, expands, baseline::convert)
}

/// Replace expand sentinels with `expand` nodes, converting each body with
/// `convert_body`.
///
/// Expands in a converted body become `nestedExpand` nodes.
#[must_use]
pub fn inject_expand_adf_with<F>(doc: &AdfDocument, expands: &[ExpandBlock], convert_body: F) -> AdfDocument
where
    F: Fn(&str) -> AdfDocument,
{
    placeholder::inject_blocks(doc, expands, "expand", |expand| {
        let body = convert_body(&expand.content_markdown);
        let content = body.content.into_iter().map(placeholder::nest_expand).collect();
        vec![AdfNode::expand(&expand.title, content)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_expand() {
        let md = "Before\n\n:::expand Click me\nHidden content\n:::\n\nAfter\n";
        let result = strip_expand_blocks(md);

        assert_eq!(result.expands.len(), 1);
        let expand = &result.expands[0];
        assert_eq!(expand.title, "Click me");
        assert_eq!(expand.content_markdown, "Hidden content");
        assert!(expand.placeholder.starts_with("CONFLUENCE_EXPAND_PLACEHOLDER_0_"));
        assert!(result.markdown.contains(&expand.placeholder));
        assert!(!result.markdown.contains(":::"));
        assert!(result.markdown.contains("Before"));
        assert!(result.markdown.ends_with("After\n"));
    }

    #[test]
    fn test_code_fence_with_colons_inside_expand() {
        let md = ":::expand Example\n```\n:::\n```\n:::\nAfter";
        let result = strip_expand_blocks(md);

        assert_eq!(result.expands[0].content_markdown, "```\n:::\n```");
        assert!(result.markdown.ends_with("After"));
    }

    #[test]
    fn test_unterminated_expand_runs_to_end() {
        let result = strip_expand_blocks(":::expand Title\nline 1\nline 2\n");
        assert_eq!(result.expands[0].content_markdown, "line 1\nline 2");
    }

    #[test]
    fn test_expand_in_code_fence_skipped() {
        let md = "```\n:::expand Title\nbody\n:::\n```\n";
        let result = strip_expand_blocks(md);
        assert!(result.expands.is_empty());
        assert_eq!(result.markdown, md);
    }

    #[test]
    fn test_multiple_expands() {
        let md = ":::expand One\na\n:::\n\n:::expand Two\nb\n:::\n";
        let result = strip_expand_blocks(md);
        let titles: Vec<_> = result.expands.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
        assert_eq!(result.expands[1].index, 1);
    }

    #[test]
    fn test_expand_without_title() {
        let result = strip_expand_blocks(":::expand\nbody\n:::\n");
        assert_eq!(result.expands[0].title, "");
        assert_eq!(result.expands[0].content_markdown, "body");
    }

    #[test]
    fn test_inject_expand_adf() {
        let strip = strip_expand_blocks(":::expand Details\n- one\n- two\n:::\n");
        let doc = baseline::convert(&strip.markdown);

        let result = inject_expand_adf(&doc, &strip.expands);

        assert_eq!(result.content.len(), 1);
        let expand = &result.content[0];
        assert!(expand.is("expand"));
        assert_eq!(expand.attr_str("title"), Some("Details"));
        assert!(expand.children()[0].is("bulletList"));
    }
}

//! Table of contents section replacement.
//!
//! A heading titled "Table of Contents", "TOC" or "Contents" (any level, any
//! case) marks a hand-written TOC. The heading and everything up to the next
//! heading is dropped and replaced by a Confluence `toc` macro.

use std::sync::LazyLock;

use md2cf_adf::{AdfDocument, AdfNode};
use regex::Regex;
use serde_json::json;

use crate::fence::FenceTracker;
use crate::placeholder::{self, LineBuffer, Placeholder, TOC_PREFIX};

/// Extension type of Confluence's built-in macros.
pub const MACRO_EXTENSION_TYPE: &str = "com.atlassian.confluence.macro.core";

/// ATX heading, capturing the title without closing hashes.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}#{1,6}(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").expect("invalid regex")
});

/// Heading titles recognized as a table of contents.
const TOC_TITLES: [&str; 3] = ["table of contents", "toc", "contents"];

/// Heading levels included in the generated TOC macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocLevels {
    pub min: u8,
    pub max: u8,
}

impl Default for TocLevels {
    fn default() -> Self {
        Self { min: 1, max: 2 }
    }
}

/// A replaced TOC section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocSection {
    pub index: usize,
    pub placeholder: String,
}

impl Placeholder for TocSection {
    fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// Result of [`strip_toc_section`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocStrip {
    /// Markdown with TOC sections replaced by sentinels.
    pub markdown: String,
    pub sections: Vec<TocSection>,
}

impl TocStrip {
    /// Whether any TOC section was found.
    #[must_use]
    pub fn has_toc(&self) -> bool {
        !self.sections.is_empty()
    }
}

/// Replace hand-written TOC sections with sentinels.
///
/// Headings inside fenced code blocks are ignored, both when looking for the
/// TOC heading and when looking for the end of the section. Markdown without
/// a TOC section is returned unchanged.
#[must_use]
pub fn strip_toc_section(markdown: &str) -> TocStrip {
    let nonce = placeholder::nonce(markdown);
    let mut out = LineBuffer::new();
    let mut sections = Vec::new();
    let mut fence = FenceTracker::new();
    let mut in_toc = false;

    for line in markdown.lines() {
        let is_fence_line = fence.update(line);
        let is_code = is_fence_line || fence.in_fence();

        if in_toc {
            if is_code || !HEADING.is_match(line) {
                continue;
            }
            in_toc = false;
        }

        if !is_code && is_toc_heading(line) {
            let placeholder = placeholder::sentinel(TOC_PREFIX, sections.len(), &nonce);
            out.push_sentinel(&placeholder);
            sections.push(TocSection {
                index: sections.len(),
                placeholder,
            });
            in_toc = true;
            continue;
        }

        out.push(line);
    }

    if sections.is_empty() {
        return TocStrip {
            markdown: markdown.to_owned(),
            sections,
        };
    }

    tracing::debug!(count = sections.len(), "Replaced TOC sections");
    TocStrip {
        markdown: out.finish(markdown),
        sections,
    }
}

fn is_toc_heading(line: &str) -> bool {
    HEADING
        .captures(line)
        .and_then(|caps| caps.get(1))
        .is_some_and(|title| {
            let title = title.as_str().trim();
            TOC_TITLES.iter().any(|t| t.eq_ignore_ascii_case(title))
        })
}

/// Build the Confluence TOC macro node.
#[must_use]
pub fn toc_extension(levels: TocLevels) -> AdfNode {
    AdfNode::new("extension")
        .with_attr("extensionType", MACRO_EXTENSION_TYPE)
        .with_attr("extensionKey", "toc")
        .with_attr(
            "parameters",
            json!({
                "macroParams": {
                    "maxLevel": { "value": levels.max.to_string() },
                    "minLevel": { "value": levels.min.to_string() },
                },
            }),
        )
        .with_attr("layout", "default")
}

/// Replace TOC sentinels with the TOC macro.
#[must_use]
pub fn inject_toc_macro(doc: &AdfDocument, sections: &[TocSection], levels: TocLevels) -> AdfDocument {
    placeholder::inject_blocks(doc, sections, "toc", |_| vec![toc_extension(levels)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_toc_section() {
        let md = "# Title\n\n## Table of Contents\n\n- [A](#a)\n- [B](#b)\n\n## A\n\nText\n";
        let result = strip_toc_section(md);

        assert!(result.has_toc());
        assert_eq!(result.sections.len(), 1);
        let placeholder = &result.sections[0].placeholder;
        assert!(placeholder.starts_with("CONFLUENCE_TOC_MACRO_PLACEHOLDER_0_"));
        assert!(result.markdown.contains(placeholder.as_str()));
        assert!(!result.markdown.contains("[A](#a)"));
        assert!(!result.markdown.contains("Table of Contents"));
        assert!(result.markdown.contains("## A\n\nText\n"));
        assert!(result.markdown.starts_with("# Title\n"));
    }

    #[test]
    fn test_toc_titles_any_case_and_level() {
        for heading in ["# toc", "### Contents", "## TABLE OF CONTENTS", "## Toc ##"] {
            let result = strip_toc_section(&format!("{heading}\n\n- item\n"));
            assert!(result.has_toc(), "{heading}");
            assert!(!result.markdown.contains("- item"), "{heading}");
        }
    }

    #[test]
    fn test_toc_section_extends_to_end_of_document() {
        let result = strip_toc_section("## Contents\n\n- [A](#a)\n");
        assert!(result.has_toc());
        assert!(!result.markdown.contains("[A]"));
    }

    #[test]
    fn test_no_toc_returns_input() {
        let md = "# Title\n\n## Contents of the box\n\nText";
        let result = strip_toc_section(md);
        assert!(!result.has_toc());
        assert_eq!(result.markdown, md);
    }

    #[test]
    fn test_toc_heading_in_code_fence_ignored() {
        let md = "```markdown\n## Table of Contents\n```\n";
        let result = strip_toc_section(md);
        assert!(!result.has_toc());
        assert_eq!(result.markdown, md);
    }

    #[test]
    fn test_heading_in_fence_does_not_end_toc() {
        let md = "## TOC\n\n```\n# not a heading\n```\n\n## Next\n";
        let result = strip_toc_section(md);
        assert!(!result.markdown.contains("not a heading"));
        assert!(result.markdown.contains("## Next"));
    }

    #[test]
    fn test_toc_extension_attrs() {
        let node = toc_extension(TocLevels::default());
        assert_eq!(node.attr_str("extensionType"), Some(MACRO_EXTENSION_TYPE));
        assert_eq!(node.attr_str("extensionKey"), Some("toc"));
        assert_eq!(node.attr_str("layout"), Some("default"));
        let params = node.attr("parameters").unwrap();
        assert_eq!(params["macroParams"]["maxLevel"]["value"], "2");
        assert_eq!(params["macroParams"]["minLevel"]["value"], "1");
    }

    #[test]
    fn test_inject_toc_macro() {
        let strip = strip_toc_section("## TOC\n\n- a\n\n## Next\n");
        let doc = AdfDocument::new(vec![
            AdfNode::paragraph(vec![AdfNode::text(strip.sections[0].placeholder.clone())]),
            AdfNode::heading(2, vec![AdfNode::text("Next")]),
        ]);

        let levels = TocLevels { min: 2, max: 4 };
        let result = inject_toc_macro(&doc, &strip.sections, levels);

        assert_eq!(result.content[0], toc_extension(levels));
        assert!(result.content[1].is("heading"));
        assert!(!result.contains_text("CONFLUENCE_TOC_MACRO_PLACEHOLDER_"));
    }
}

//! Markdown to Atlassian Document Format conversion.
//!
//! The converter runs the baseline pulldown-cmark conversion wrapped in
//! strip/inject passes for constructs that need Confluence-specific nodes:
//!
//! 1. `:::expand` sections are replaced by sentinels ([`strip_expand_blocks`])
//! 2. GFM alerts are replaced by sentinels ([`strip_panel_blocks`])
//! 3. TOC sections are replaced by sentinels ([`strip_toc_section`])
//! 4. The remaining Markdown is converted ([`baseline::convert_with`])
//! 5. Sentinels are replaced by `extension`, `panel` and `expand` nodes
//!
//! Expand and panel bodies keep their raw Markdown and are converted with the
//! whole pipeline, so alerts, TOC sections and expands nest inside them.
//!
//! Each pass is a pure function over its input and can be used on its own,
//! which is how the sync orchestrator interleaves the diagram pass.
//!
//! # Example
//!
//! ```
//! use md2cf_converter::markdown_to_adf;
//!
//! let doc = markdown_to_adf("> [!WARNING]\n> Back up first.\n");
//! assert_eq!(doc.content[0].node_type, "panel");
//! assert_eq!(doc.content[0].attr_str("panelType"), Some("warning"));
//! ```

pub mod baseline;
mod expand;
mod fence;
mod panel;
pub mod placeholder;
mod title;
mod toc;

use md2cf_adf::AdfDocument;

pub use expand::{
    ExpandBlock, ExpandStrip, inject_expand_adf, inject_expand_adf_with, strip_expand_blocks,
};
pub use fence::FenceTracker;
pub use panel::{
    PanelBlock, PanelStrip, inject_panel_adf, inject_panel_adf_with, strip_panel_blocks,
};
pub use placeholder::Placeholder;
pub use title::{extract_title, title_from_filename};
pub use toc::{
    MACRO_EXTENSION_TYPE, TocLevels, TocSection, TocStrip, inject_toc_macro, strip_toc_section,
    toc_extension,
};

/// Markdown to ADF converter.
///
/// # Example
///
/// ```
/// use md2cf_converter::{MarkdownConverter, TocLevels};
///
/// let doc = MarkdownConverter::new()
///     .with_toc_levels(TocLevels { min: 1, max: 3 })
///     .convert("## Contents\n\n- [Intro](#intro)\n\n## Intro\n");
/// assert_eq!(doc.content[0].node_type, "extension");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter {
    toc_levels: TocLevels,
}

impl MarkdownConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading levels included in generated TOC macros.
    #[must_use]
    pub fn with_toc_levels(mut self, levels: TocLevels) -> Self {
        self.toc_levels = levels;
        self
    }

    /// Convert Markdown to an ADF document.
    #[must_use]
    pub fn convert(&self, markdown: &str) -> AdfDocument {
        let expands = strip_expand_blocks(markdown);
        let panels = strip_panel_blocks(&expands.markdown);
        let toc = strip_toc_section(&panels.markdown);

        let doc = baseline::convert_with(&toc.markdown, self.toc_levels);

        let convert_body = |body: &str| self.convert(body);
        let doc = inject_toc_macro(&doc, &toc.sections, self.toc_levels);
        let doc = inject_panel_adf_with(&doc, &panels.panels, convert_body);
        let doc = inject_expand_adf_with(&doc, &expands.expands, convert_body);

        tracing::debug!(
            blocks = doc.content.len(),
            toc = toc.has_toc(),
            panels = panels.panels.len(),
            expands = expands.expands.len(),
            "Converted markdown to ADF"
        );
        doc
    }
}

/// Convert Markdown to ADF with default settings.
#[must_use]
pub fn markdown_to_adf(markdown: &str) -> AdfDocument {
    MarkdownConverter::new().convert(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn types(doc: &AdfDocument) -> Vec<&str> {
        doc.content.iter().map(|n| n.node_type.as_str()).collect()
    }

    #[test]
    fn test_full_pipeline() {
        let md = "\
# Guide

## Table of Contents

- [Setup](#setup)

## Setup

> [!TIP]
> Use the installer.

:::expand Advanced
Set `FOO=1`.
:::

Done.
";
        let doc = markdown_to_adf(md);

        assert_eq!(
            types(&doc),
            vec!["heading", "extension", "heading", "panel", "expand", "paragraph"]
        );
        assert_eq!(doc.content[3].attr_str("panelType"), Some("success"));
        assert_eq!(doc.content[4].attr_str("title"), Some("Advanced"));
        assert!(!doc.contains_text("PLACEHOLDER"));
    }

    #[test]
    fn test_panel_inside_expand() {
        let doc = markdown_to_adf(":::expand More\n> [!NOTE]\n> inside\n:::\n");

        assert_eq!(types(&doc), vec!["expand"]);
        let panel = &doc.content[0].children()[0];
        assert!(panel.is("panel"));
        assert_eq!(panel.attr_str("panelType"), Some("info"));
        assert!(panel.contains_text("inside"));
        assert!(!doc.contains_text("PLACEHOLDER"));
    }

    #[test]
    fn test_toc_inside_expand() {
        let levels = TocLevels { min: 2, max: 3 };
        let doc = MarkdownConverter::new()
            .with_toc_levels(levels)
            .convert(":::expand More\n## Contents\n- a\n:::\n");

        assert_eq!(types(&doc), vec!["expand"]);
        assert_eq!(doc.content[0].children(), &[toc_extension(levels)]);
    }

    #[test]
    fn test_expand_inside_panel() {
        let doc = markdown_to_adf("> [!TIP]\n> :::expand Details\n> hidden\n> :::\n");

        assert_eq!(types(&doc), vec!["panel"]);
        let expand = &doc.content[0].children()[0];
        assert!(expand.is("expand"));
        assert_eq!(expand.attr_str("title"), Some("Details"));
        assert!(expand.contains_text("hidden"));
    }

    #[test]
    fn test_expand_opener_inside_expand_becomes_nested_expand() {
        let doc = markdown_to_adf(":::expand Outer\nintro\n:::expand Inner\nbody\n:::\n");

        assert_eq!(types(&doc), vec!["expand"]);
        let children = doc.content[0].children();
        assert!(children[0].is("paragraph"));
        assert!(children[1].is("nestedExpand"));
        assert_eq!(children[1].attr_str("title"), Some("Inner"));
        assert!(children[1].contains_text("body"));
    }

    #[test]
    fn test_panel_inside_list_keeps_other_items() {
        let doc = markdown_to_adf("- first\n\n  > [!NOTE]\n  > inside\n\n- second\n");

        assert_eq!(types(&doc), vec!["bulletList", "panel", "bulletList"]);
        assert!(doc.content[0].contains_text("first"));
        assert!(doc.content[1].contains_text("inside"));
        assert!(doc.content[2].contains_text("second"));
    }

    #[test]
    fn test_expand_inside_list_keeps_other_items() {
        let doc = markdown_to_adf("- a\n\n  :::expand More\n  body\n  :::\n\n- b\n");

        assert_eq!(types(&doc), vec!["bulletList", "expand", "bulletList"]);
        assert!(doc.content[0].contains_text("a"));
        assert!(doc.content[1].contains_text("body"));
        assert!(doc.content[2].contains_text("b"));
        assert!(!doc.contains_text("PLACEHOLDER"));
    }

    #[test]
    fn test_alert_inside_blockquote_stays_in_quote() {
        let doc = markdown_to_adf("> intro\n>\n> > [!NOTE]\n> > nested\n\nAfter\n");

        assert_eq!(types(&doc), vec!["blockquote", "paragraph"]);
        assert!(doc.content[0].contains_text("intro"));
        assert!(doc.content[0].contains_text("nested"));
        assert!(!doc.contains_text("PLACEHOLDER"));
    }

    #[test]
    fn test_toc_levels_are_configurable() {
        let doc = MarkdownConverter::new()
            .with_toc_levels(TocLevels { min: 2, max: 5 })
            .convert("## TOC\n\n- a\n");
        assert_eq!(doc.content[0], toc_extension(TocLevels { min: 2, max: 5 }));
    }

    #[test]
    fn test_panel_inside_fence_stays_code() {
        let doc = markdown_to_adf("```md\n> [!NOTE]\n> text\n```\n");
        assert_eq!(types(&doc), vec!["codeBlock"]);
        assert!(doc.contains_text("> [!NOTE]"));
    }

    #[test]
    fn test_expand_containing_code_fence_with_colons() {
        let doc = markdown_to_adf(":::expand Example\n```\n:::\n```\n:::\n\nAfter\n");
        assert_eq!(types(&doc), vec!["expand", "paragraph"]);
        assert!(doc.content[0].children()[0].is("codeBlock"));
    }

    #[test]
    fn test_sentinel_like_text_in_document_is_not_replaced() {
        let doc = markdown_to_adf("> [!NOTE]\n> real\n\nCONFLUENCE_PANEL_PLACEHOLDER_0\n");
        assert_eq!(types(&doc), vec!["panel", "paragraph"]);
        assert!(doc.contains_text("CONFLUENCE_PANEL_PLACEHOLDER_0"));
    }

    #[test]
    fn test_plain_markdown_matches_baseline() {
        let md = "# Title\n\nSome *text*.\n";
        assert_eq!(markdown_to_adf(md), baseline::convert(md));
    }
}

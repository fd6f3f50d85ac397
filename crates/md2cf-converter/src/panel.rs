//! GFM alert blocks as Confluence panels.
//!
//! ```markdown
//! > [!WARNING]
//! > Back up your data first.
//! ```
//!
//! becomes a `panel` node with `panelType: "warning"`. Alert types map as
//! documented on [`PanelType`].

use std::sync::LazyLock;

use md2cf_adf::{AdfDocument, AdfNode, PanelType};
use regex::Regex;

use crate::baseline;
use crate::fence::FenceTracker;
use crate::placeholder::{self, LineBuffer, PANEL_PREFIX, Placeholder};

/// Alert header line (`> [!NOTE]`), capturing the alert name.
static ALERT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s*\[!([A-Za-z]+)\]\s*$").expect("invalid regex"));

/// A stripped alert block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelBlock {
    pub index: usize,
    pub panel_type: PanelType,
    /// Body with the `>` markers removed.
    pub content_markdown: String,
    pub placeholder: String,
}

impl Placeholder for PanelBlock {
    fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// Result of [`strip_panel_blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStrip {
    pub markdown: String,
    pub panels: Vec<PanelBlock>,
}

/// Replace GFM alert blocks with sentinels.
///
/// Only the five known alert types are recognized; other `[!NAME]`
/// blockquotes and plain blockquotes pass through. Alerts inside fenced
/// code blocks are left alone.
#[must_use]
pub fn strip_panel_blocks(markdown: &str) -> PanelStrip {
    let nonce = placeholder::nonce(markdown);
    let lines: Vec<&str> = markdown.lines().collect();
    let mut out = LineBuffer::new();
    let mut panels = Vec::new();
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

        let Some(panel_type) = alert_type(line) else {
            out.push(line);
            continue;
        };

        let mut body = Vec::new();
        while let Some(next) = lines.get(i)
            && next.trim_start().starts_with('>')
        {
            body.push(strip_quote_marker(next));
            i += 1;
        }

        let placeholder = placeholder::sentinel(PANEL_PREFIX, panels.len(), &nonce);
        out.push_sentinel(&placeholder);
        panels.push(PanelBlock {
            index: panels.len(),
            panel_type,
            content_markdown: placeholder::join_body(&body),
            placeholder,
        });
    }

    if panels.is_empty() {
        return PanelStrip {
            markdown: markdown.to_owned(),
            panels,
        };
    }

    tracing::debug!(count = panels.len(), "Replaced alert panels");
    PanelStrip {
        markdown: out.finish(markdown),
        panels,
    }
}

fn alert_type(line: &str) -> Option<PanelType> {
    let caps = ALERT_HEADER.captures(line)?;
    PanelType::from_alert(caps.get(1)?.as_str())
}

/// Remove leading whitespace, the `>` marker and one following space.
fn strip_quote_marker(line: &str) -> &str {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('>').unwrap_or(rest);
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Replace panel sentinels with `panel` nodes.
///
/// Each body is converted with the baseline converter.
#[must_use]
pub fn inject_panel_adf(doc: &AdfDocument, panels: &[PanelBlock]) -> AdfDocument {
    inject_panel_adf_with(doc, panels, baseline::convert)
}

/// Replace panel sentinels with `panel` nodes, converting each body with
/// `convert_body`.
#[must_use]
pub fn inject_panel_adf_with<F>(doc: &AdfDocument, panels: &[PanelBlock], convert_body: F) -> AdfDocument
where
    F: Fn(&str) -> AdfDocument,
{
    placeholder::inject_blocks(doc, panels, "panel", |panel| {
        let body = convert_body(&panel.content_markdown);
        vec![AdfNode::panel(panel.panel_type, body.content)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_single_panel() {
        let md = "Intro\n\n> [!WARNING]\n> Be careful\n\nAfter\n";
        let result = strip_panel_blocks(md);

        assert_eq!(result.panels.len(), 1);
        let panel = &result.panels[0];
        assert_eq!(panel.index, 0);
        assert_eq!(panel.panel_type, PanelType::Warning);
        assert_eq!(panel.content_markdown, "Be careful");
        assert!(panel.placeholder.starts_with("CONFLUENCE_PANEL_PLACEHOLDER_0"));
        assert!(result.markdown.contains(&panel.placeholder));
        assert!(!result.markdown.contains("[!WARNING]"));
        assert!(result.markdown.starts_with("Intro\n"));
        assert!(result.markdown.ends_with("After\n"));
    }

    #[test]
    fn test_multiline_body() {
        let md = "> [!NOTE]\n> Line one.\n> Line two.\n> Line three.";
        let result = strip_panel_blocks(md);
        assert_eq!(result.panels[0].content_markdown, "Line one.\nLine two.\nLine three.");
    }

    #[test]
    fn test_empty_panel() {
        let result = strip_panel_blocks("> [!TIP]\n\nNext");
        assert_eq!(result.panels[0].panel_type, PanelType::Success);
        assert_eq!(result.panels[0].content_markdown, "");
    }

    #[test]
    fn test_all_alert_types() {
        let md = "> [!NOTE]\n> a\n\n> [!TIP]\n> b\n\n> [!IMPORTANT]\n> c\n\n> [!WARNING]\n> d\n\n> [!CAUTION]\n> e\n";
        let types: Vec<_> = strip_panel_blocks(md)
            .panels
            .iter()
            .map(|p| p.panel_type)
            .collect();
        assert_eq!(
            types,
            vec![
                PanelType::Info,
                PanelType::Success,
                PanelType::Note,
                PanelType::Warning,
                PanelType::Error,
            ]
        );
    }

    #[test]
    fn test_regular_blockquote_untouched() {
        let md = "> Just a quote\n> more\n";
        let result = strip_panel_blocks(md);
        assert!(result.panels.is_empty());
        assert_eq!(result.markdown, md);
    }

    #[test]
    fn test_unknown_alert_type_untouched() {
        let md = "> [!DANGER]\n> text\n";
        let result = strip_panel_blocks(md);
        assert!(result.panels.is_empty());
        assert_eq!(result.markdown, md);
    }

    #[test]
    fn test_alert_in_code_fence_skipped() {
        let md = "```markdown\n> [!NOTE]\n> Example\n```\n";
        let result = strip_panel_blocks(md);
        assert!(result.panels.is_empty());
        assert_eq!(result.markdown, md);
    }

    #[test]
    fn test_body_keeps_nested_markdown() {
        let md = "> [!NOTE]\n> - one\n> - two\n>\n> ```sh\n> ls\n> ```";
        let result = strip_panel_blocks(md);
        assert_eq!(
            result.panels[0].content_markdown,
            "- one\n- two\n\n```sh\nls\n```"
        );
    }

    #[test]
    fn test_indexes_follow_document_order() {
        let result = strip_panel_blocks("> [!NOTE]\n> a\n\n> [!CAUTION]\n> b\n");
        assert_eq!(result.panels[0].index, 0);
        assert_eq!(result.panels[1].index, 1);
        assert!(result.panels[1].placeholder.starts_with("CONFLUENCE_PANEL_PLACEHOLDER_1_"));
    }

    #[test]
    fn test_inject_panel_adf() {
        let strip = strip_panel_blocks("> [!WARNING]\n> Be **careful**\n");
        let doc = baseline::convert(&strip.markdown);

        let result = inject_panel_adf(&doc, &strip.panels);

        assert_eq!(result.content.len(), 1);
        let panel = &result.content[0];
        assert!(panel.is("panel"));
        assert_eq!(panel.attr_str("panelType"), Some("warning"));
        assert!(panel.children()[0].is("paragraph"));
        assert!(result.contains_text("careful"));
        assert!(!result.contains_text("CONFLUENCE_PANEL_PLACEHOLDER_"));
    }
}

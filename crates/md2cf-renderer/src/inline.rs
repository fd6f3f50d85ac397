//! Inline node and mark rendering.

use md2cf_adf::{AdfMark, AdfNode};

/// Render inline children to Markdown.
pub(crate) fn render_inline(content: &[AdfNode]) -> String {
    content.iter().map(render_inline_node).collect()
}

/// Render a single inline node.
pub(crate) fn render_inline_node(node: &AdfNode) -> String {
    match node.node_type.as_str() {
        "text" => apply_marks(node.text.as_deref().unwrap_or_default(), node.marks()),
        "hardBreak" => "\n".to_owned(),
        "inlineCard" => node
            .attr_str("url")
            .map(|url| format!("<{url}>"))
            .unwrap_or_default(),
        "mention" | "status" => node.attr_str("text").unwrap_or_default().to_owned(),
        "emoji" => node
            .attr_str("text")
            .or_else(|| node.attr_str("shortName"))
            .unwrap_or_default()
            .to_owned(),
        _ => render_inline(node.children()),
    }
}

/// Position of a mark in the wrapping order (innermost first).
fn mark_rank(mark: &AdfMark) -> Option<u8> {
    match mark.mark_type.as_str() {
        "strong" => Some(0),
        "em" => Some(1),
        "code" => Some(2),
        "strike" => Some(3),
        "link" => Some(4),
        _ => None,
    }
}

/// Wrap text in Markdown syntax for its marks.
///
/// Marks are applied strong, em, code, strike, link, each wrapping the
/// previous result, regardless of their order in the node. Unknown marks
/// and links without an href are dropped.
pub(crate) fn apply_marks(text: &str, marks: &[AdfMark]) -> String {
    let mut ranked: Vec<(u8, &AdfMark)> = marks
        .iter()
        .filter_map(|mark| mark_rank(mark).map(|rank| (rank, mark)))
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);

    let mut result = text.to_owned();
    for (_, mark) in ranked {
        result = match mark.mark_type.as_str() {
            "strong" => format!("**{result}**"),
            "em" => format!("*{result}*"),
            "code" => format!("`{result}`"),
            "strike" => format!("~~{result}~~"),
            "link" => match mark.href() {
                Some(href) => format!("[{result}]({href})"),
                None => result,
            },
            _ => result,
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text() {
        assert_eq!(render_inline(&[AdfNode::text("hello")]), "hello");
    }

    #[test]
    fn test_mark_order_is_fixed() {
        let marks = vec![
            AdfMark::link("https://example.com", None),
            AdfMark::new("em"),
            AdfMark::new("strong"),
        ];
        assert_eq!(apply_marks("x", &marks), "[***x***](https://example.com)");

        let reversed: Vec<_> = marks.into_iter().rev().collect();
        assert_eq!(apply_marks("x", &reversed), "[***x***](https://example.com)");
    }

    #[test]
    fn test_code_and_strike() {
        assert_eq!(apply_marks("x", &[AdfMark::new("code")]), "`x`");
        assert_eq!(
            apply_marks("x", &[AdfMark::new("strike"), AdfMark::new("code")]),
            "~~`x`~~"
        );
    }

    #[test]
    fn test_link_without_href_dropped() {
        assert_eq!(apply_marks("x", &[AdfMark::new("link")]), "x");
        assert_eq!(apply_marks("x", &[AdfMark::new("underline")]), "x");
    }

    #[test]
    fn test_hard_break_and_inline_card() {
        let content = vec![
            AdfNode::text("a"),
            AdfNode::hard_break(),
            AdfNode::new("inlineCard").with_attr("url", "https://x.dev"),
            AdfNode::new("inlineCard"),
        ];
        assert_eq!(render_inline(&content), "a\n<https://x.dev>");
    }

    #[test]
    fn test_mention_and_emoji() {
        let content = vec![
            AdfNode::new("mention").with_attr("text", "@alice"),
            AdfNode::text(" "),
            AdfNode::new("emoji").with_attr("shortName", ":smile:"),
        ];
        assert_eq!(render_inline(&content), "@alice :smile:");
    }

    #[test]
    fn test_unknown_inline_recurses() {
        let node = AdfNode::new("customInline").with_content(vec![AdfNode::text("inner")]);
        assert_eq!(render_inline(&[node]), "inner");
    }
}

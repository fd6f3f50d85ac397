//! Block node rendering.

use md2cf_adf::{AdfNode, PanelType};

use crate::inline::{render_inline, render_inline_node};
use crate::table::render_table;

/// Render a block node. `indent` is the list nesting prefix for list nodes.
pub(crate) fn render_block(node: &AdfNode, indent: &str) -> String {
    match node.node_type.as_str() {
        "heading" => render_heading(node),
        "paragraph" => render_inline(node.children()),
        "bulletList" | "orderedList" => render_list(node, indent),
        "codeBlock" => render_code_block(node),
        "blockquote" => render_blockquote(node),
        "table" => render_table(node),
        "rule" => "---".to_owned(),
        "mediaSingle" => render_media_single(node),
        "panel" => render_panel(node),
        "expand" | "nestedExpand" => render_expand(node),
        "extension" | "bodiedExtension" => render_extension(node),
        other => {
            tracing::debug!(node_type = other, "Rendering unsupported node as text");
            render_inline_node(node)
        }
    }
}

/// Render blocks separated by blank lines.
pub(crate) fn render_blocks(blocks: &[AdfNode]) -> String {
    blocks
        .iter()
        .map(|block| render_block(block, ""))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_heading(node: &AdfNode) -> String {
    let level = node.attr_u64("level").unwrap_or(1).clamp(1, 6);
    let hashes = "#".repeat(usize::try_from(level).unwrap_or(1));
    format!("{hashes} {}", render_inline(node.children()))
}

fn render_list(node: &AdfNode, indent: &str) -> String {
    let ordered = node.is("orderedList");
    node.children()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if ordered {
                format!("{}. ", i + 1)
            } else {
                "- ".to_owned()
            };
            render_list_item(item, indent, &marker)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one list item.
///
/// The first paragraph follows the marker. Nested lists follow on the next
/// line at the item's content column. Any other block follows after a blank
/// line, every line indented to the content column.
fn render_list_item(item: &AdfNode, indent: &str, marker: &str) -> String {
    let child_indent = format!("{indent}{}", " ".repeat(marker.len()));
    let mut children = item.children().iter();

    let first = match item.children().first() {
        Some(first) if first.is("paragraph") => {
            children.next();
            render_inline(first.children())
        }
        _ => String::new(),
    };
    let mut out = format!("{indent}{marker}{}", indent_continuation(&first, &child_indent));

    for child in children {
        if child.is("bulletList") || child.is("orderedList") {
            out.push('\n');
            out.push_str(&render_list(child, &child_indent));
        } else {
            let rendered = render_block(child, &child_indent);
            out.push_str("\n\n");
            out.push_str(&indent_lines(&rendered, &child_indent));
        }
    }
    out
}

/// Indent every line after the first.
fn indent_continuation(text: &str, indent: &str) -> String {
    text.split('\n').collect::<Vec<_>>().join(&format!("\n{indent}"))
}

/// Indent every non-empty line.
fn indent_lines(text: &str, indent: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix every line with `> ` (`>` for empty lines).
fn quote_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_owned()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_code_block(node: &AdfNode) -> String {
    let language = node.attr_str("language").unwrap_or_default();
    let code: String = node
        .children()
        .iter()
        .filter_map(|child| child.text.as_deref())
        .collect();
    let fence = "`".repeat(longest_backtick_run(&code).max(2) + 1);
    format!("{fence}{language}\n{code}\n{fence}")
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

fn render_blockquote(node: &AdfNode) -> String {
    if node.children().is_empty() {
        return ">".to_owned();
    }
    quote_lines(&render_blocks(node.children()))
}

fn render_media_single(node: &AdfNode) -> String {
    let Some(media) = node.children().iter().find(|c| c.is("media")) else {
        return String::new();
    };
    let alt = media.attr_str("alt").unwrap_or("image");
    match media.attr_str("url") {
        Some(url) => format!("![{alt}]({url})"),
        None => format!(
            "![{alt}](attachment:{})",
            media.attr_str("id").unwrap_or_default()
        ),
    }
}

fn render_panel(node: &AdfNode) -> String {
    let panel_type = node
        .attr_str("panelType")
        .and_then(PanelType::parse)
        .unwrap_or_default();
    let header = format!("> [!{}]", panel_type.alert());
    if node.children().is_empty() {
        return header;
    }
    format!("{header}\n{}", quote_lines(&render_blocks(node.children())))
}

fn render_expand(node: &AdfNode) -> String {
    let title = node.attr_str("title").unwrap_or("Details");
    format!(
        ":::expand {title}\n{}\n:::",
        render_blocks(node.children())
    )
}

fn render_extension(node: &AdfNode) -> String {
    let key = node.attr_str("extensionKey").unwrap_or("unknown");
    format!("<!-- confluence:{key} -->")
}

//! Baseline Markdown to ADF conversion.
//!
//! Walks pulldown-cmark events and builds the ADF tree with a stack of open
//! nodes. Handles headings, paragraphs, emphasis, strong, strikethrough,
//! inline code, links, images, lists (including task lists), blockquotes,
//! GFM alerts, fenced and indented code, tables, rules and line breaks.
//!
//! Inline content that appears directly in a block container (tight list
//! items) is wrapped in an implicit paragraph. Images are block-level in
//! ADF, so an image splits its paragraph around a `mediaSingle` node.

use std::sync::LazyLock;

use md2cf_adf::{AdfDocument, AdfMark, AdfNode, PanelType};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::toc::{MACRO_EXTENSION_TYPE, TocLevels, toc_extension};

/// `<!-- confluence:KEY -->` macro comment.
static MACRO_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<!--\s*confluence:([A-Za-z0-9_.-]+)\s*-->$").expect("invalid regex")
});

/// Parser options used for conversion.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Convert Markdown to ADF with default TOC macro levels.
#[must_use]
pub fn convert(markdown: &str) -> AdfDocument {
    convert_with(markdown, TocLevels::default())
}

/// Convert Markdown to ADF.
///
/// `toc_levels` configures the macro emitted for `<!-- confluence:toc -->`.
#[must_use]
pub fn convert_with(markdown: &str, toc_levels: TocLevels) -> AdfDocument {
    let mut builder = AdfBuilder::new(toc_levels);
    for event in Parser::new_ext(markdown, parser_options()) {
        builder.process_event(event);
    }
    builder.finish()
}

/// An open node collecting children.
#[derive(Debug)]
struct Frame {
    node: AdfNode,
    children: Vec<AdfNode>,
    /// Accepts inline nodes (paragraph, heading) rather than blocks.
    inline: bool,
    /// Paragraph opened for inline content in a block container.
    implicit: bool,
}

impl Frame {
    fn block(node: AdfNode) -> Self {
        Self {
            node,
            children: Vec::new(),
            inline: false,
            implicit: false,
        }
    }

    fn inline(node: AdfNode) -> Self {
        Self {
            inline: true,
            ..Self::block(node)
        }
    }

    fn into_node(self) -> AdfNode {
        self.node.with_content(self.children)
    }
}

#[derive(Debug)]
struct CodeState {
    language: Option<String>,
    text: String,
}

#[derive(Debug)]
struct ImageState {
    url: String,
    alt: String,
}

struct AdfBuilder {
    stack: Vec<Frame>,
    marks: Vec<AdfMark>,
    code: Option<CodeState>,
    image: Option<ImageState>,
    html: Option<String>,
    in_table_head: bool,
    toc_levels: TocLevels,
}

impl AdfBuilder {
    fn new(toc_levels: TocLevels) -> Self {
        Self {
            stack: vec![Frame::block(AdfNode::new("doc"))],
            marks: Vec::new(),
            code: None,
            image: None,
            html: None,
            in_table_head: false,
            toc_levels,
        }
    }

    fn finish(mut self) -> AdfDocument {
        self.close_implicit_paragraph();
        while self.stack.len() > 1 {
            self.pop_frame();
        }
        let content = self.stack.pop().map(|root| root.children).unwrap_or_default();
        AdfDocument::new(content)
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => {
                if let Some(buf) = self.html.as_mut() {
                    buf.push_str(&html);
                } else {
                    self.raw_html_block(&html);
                }
            }
            Event::InlineHtml(html) => self.push_text(&html),
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.push_inline(AdfNode::hard_break()),
            Event::Rule => {
                self.close_implicit_paragraph();
                self.attach(AdfNode::rule());
            }
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " });
            }
            Event::FootnoteReference(label) => self.push_text(&format!("[^{label}]")),
            Event::InlineMath(math) => self.push_text(&format!("${math}$")),
            Event::DisplayMath(math) => self.push_text(&format!("$${math}$$")),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.close_implicit_paragraph();
                self.stack.push(Frame::inline(AdfNode::new("paragraph")));
            }
            Tag::Heading { level, .. } => {
                self.close_implicit_paragraph();
                let node = AdfNode::new("heading").with_attr("level", level as u8);
                self.stack.push(Frame::inline(node));
            }
            Tag::BlockQuote(kind) => {
                self.close_implicit_paragraph();
                let node = match kind {
                    Some(kind) => AdfNode::new("panel")
                        .with_attr("panelType", PanelType::from(alert_kind(kind)).as_str()),
                    None => AdfNode::new("blockquote"),
                };
                self.stack.push(Frame::block(node));
            }
            Tag::CodeBlock(kind) => {
                self.close_implicit_paragraph();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeState {
                    language,
                    text: String::new(),
                });
            }
            Tag::HtmlBlock => {
                self.close_implicit_paragraph();
                self.html = Some(String::new());
            }
            Tag::List(start) => {
                self.close_implicit_paragraph();
                let node = match start {
                    Some(1) => AdfNode::new("orderedList"),
                    Some(n) => AdfNode::new("orderedList").with_attr("order", n),
                    None => AdfNode::new("bulletList"),
                };
                self.stack.push(Frame::block(node));
            }
            Tag::Item => self.stack.push(Frame::block(AdfNode::new("listItem"))),
            Tag::Table(_) => {
                self.close_implicit_paragraph();
                self.stack.push(Frame::block(AdfNode::new("table")));
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.stack.push(Frame::block(AdfNode::new("tableRow")));
            }
            Tag::TableRow => self.stack.push(Frame::block(AdfNode::new("tableRow"))),
            Tag::TableCell => {
                let cell = if self.in_table_head {
                    "tableHeader"
                } else {
                    "tableCell"
                };
                self.stack.push(Frame::block(AdfNode::new(cell)));
                self.stack.push(Frame::inline(AdfNode::new("paragraph")));
            }
            Tag::Emphasis => self.marks.push(AdfMark::new("em")),
            Tag::Strong => self.marks.push(AdfMark::new("strong")),
            Tag::Strikethrough => self.marks.push(AdfMark::new("strike")),
            Tag::Link {
                dest_url, title, ..
            } => self.marks.push(AdfMark::link(&dest_url, Some(&*title))),
            Tag::Image { dest_url, .. } => {
                self.image = Some(ImageState {
                    url: dest_url.into_string(),
                    alt: String::new(),
                });
            }
            Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) => self.pop_frame(),
            TagEnd::BlockQuote(_) | TagEnd::List(_) | TagEnd::Item | TagEnd::Table => {
                self.close_implicit_paragraph();
                self.pop_frame();
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    let text = code.text.strip_suffix('\n').unwrap_or(&code.text);
                    self.attach(AdfNode::code_block(code.language.as_deref(), text));
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(html) = self.html.take() {
                    self.raw_html_block(&html);
                }
            }
            TagEnd::TableHead => {
                self.pop_frame();
                self.in_table_head = false;
            }
            TagEnd::TableRow => self.pop_frame(),
            TagEnd::TableCell => {
                // Paragraph, then the cell itself
                self.pop_frame();
                self.pop_frame();
            }
            TagEnd::Emphasis => self.pop_mark("em"),
            TagEnd::Strong => self.pop_mark("strong"),
            TagEnd::Strikethrough => self.pop_mark("strike"),
            TagEnd::Link => self.pop_mark("link"),
            TagEnd::Image => {
                if let Some(image) = self.image.take() {
                    self.emit_image(image);
                }
            }
            TagEnd::FootnoteDefinition
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
        }
    }

    fn text(&mut self, text: &CowStr<'_>) {
        if let Some(code) = self.code.as_mut() {
            code.text.push_str(text);
        } else {
            self.push_text(text);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push_str(code);
            return;
        }
        // ADF only allows links alongside the code mark
        let mut marks: Vec<AdfMark> = self.marks.iter().filter(|m| m.is("link")).cloned().collect();
        marks.push(AdfMark::new("code"));
        self.push_marked_text(code, marks);
    }

    fn push_text(&mut self, text: &str) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push_str(text);
            return;
        }
        self.push_marked_text(text, self.marks.clone());
    }

    /// Append text, merging with a preceding text node that has the same marks.
    fn push_marked_text(&mut self, text: &str, marks: Vec<AdfMark>) {
        if text.is_empty() {
            return;
        }
        let frame = self.inline_frame();
        if let Some(last) = frame.children.last_mut()
            && last.is("text")
            && last.marks() == marks.as_slice()
        {
            last.text.get_or_insert_with(String::new).push_str(text);
            return;
        }
        frame.children.push(AdfNode::text_with_marks(text, marks));
    }

    fn push_inline(&mut self, node: AdfNode) {
        if self.image.is_some() {
            return;
        }
        self.inline_frame().children.push(node);
    }

    /// Frame that accepts inline content, opening an implicit paragraph
    /// when the innermost frame is a block container.
    fn inline_frame(&mut self) -> &mut Frame {
        if !self.stack.last().is_some_and(|f| f.inline) {
            let mut frame = Frame::inline(AdfNode::new("paragraph"));
            frame.implicit = true;
            self.stack.push(frame);
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn close_implicit_paragraph(&mut self) {
        if self.stack.last().is_some_and(|f| f.implicit) {
            self.pop_frame();
        }
    }

    /// Close the innermost frame and attach it to its parent.
    ///
    /// Empty paragraphs are dropped, except inside table cells and list
    /// items where ADF requires a paragraph.
    fn pop_frame(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let is_paragraph = frame.node.is("paragraph");
        let mut node = frame.into_node();
        if node.is("listItem") && node.children().is_empty() {
            node.content = Some(vec![AdfNode::paragraph(Vec::new())]);
        }
        if is_paragraph && node.children().is_empty() && !self.parent_is_cell() {
            return;
        }
        self.attach(node);
    }

    fn parent_is_cell(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|f| f.node.is("tableCell") || f.node.is("tableHeader"))
    }

    fn attach(&mut self, node: AdfNode) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn pop_mark(&mut self, mark_type: &str) {
        if let Some(pos) = self.marks.iter().rposition(|m| m.is(mark_type)) {
            self.marks.remove(pos);
        }
    }

    /// Emit an image as a block-level `mediaSingle`.
    ///
    /// Inside headings and table cells, where blocks are not allowed, the
    /// image degrades to its alt text linked to the source.
    fn emit_image(&mut self, image: ImageState) {
        let media = AdfNode::new("mediaSingle")
            .with_attr("layout", "center")
            .with_content(vec![
                AdfNode::new("media")
                    .with_attr("type", "external")
                    .with_attr("url", image.url.as_str())
                    .with_attr("alt", image.alt.as_str()),
            ]);

        let in_paragraph = self.stack.last().is_some_and(|f| f.node.is("paragraph"));
        let nested_in_cell = self.stack.len() >= 2 && {
            let parent = &self.stack[self.stack.len() - 2].node;
            parent.is("tableCell") || parent.is("tableHeader")
        };
        let in_heading = self.stack.last().is_some_and(|f| f.node.is("heading"));

        if in_heading || nested_in_cell {
            let label = if image.alt.is_empty() {
                image.url.clone()
            } else {
                image.alt
            };
            let mut marks = self.marks.clone();
            marks.push(AdfMark::link(&image.url, None));
            self.push_marked_text(&label, marks);
        } else if in_paragraph {
            // Split the paragraph around the image
            let implicit = self.stack.last().is_some_and(|f| f.implicit);
            self.pop_frame();
            self.attach(media);
            let mut frame = Frame::inline(AdfNode::new("paragraph"));
            frame.implicit = implicit;
            self.stack.push(frame);
        } else {
            self.attach(media);
        }
    }

    /// HTML block: macro comments become extensions, anything else is kept
    /// as a paragraph of literal text.
    fn raw_html_block(&mut self, html: &str) {
        let html = html.trim();
        if html.is_empty() {
            return;
        }
        if let Some(caps) = MACRO_COMMENT.captures(html)
            && let Some(key) = caps.get(1)
        {
            let node = if key.as_str() == "toc" {
                toc_extension(self.toc_levels)
            } else {
                AdfNode::new("extension")
                    .with_attr("extensionType", MACRO_EXTENSION_TYPE)
                    .with_attr("extensionKey", key.as_str())
                    .with_attr("layout", "default")
            };
            self.attach(node);
            return;
        }
        self.attach(AdfNode::paragraph(vec![AdfNode::text(html)]));
    }
}

fn alert_kind(kind: pulldown_cmark::BlockQuoteKind) -> md2cf_adf::AlertKind {
    use md2cf_adf::AlertKind;
    use pulldown_cmark::BlockQuoteKind;

    match kind {
        BlockQuoteKind::Note => AlertKind::Note,
        BlockQuoteKind::Tip => AlertKind::Tip,
        BlockQuoteKind::Important => AlertKind::Important,
        BlockQuoteKind::Warning => AlertKind::Warning,
        BlockQuoteKind::Caution => AlertKind::Caution,
    }
}

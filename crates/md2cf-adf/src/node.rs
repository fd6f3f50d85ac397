//! ADF document, node and mark types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdfError;
use crate::panel::PanelType;

/// Node or mark attributes (a JSON object).
pub type Attrs = serde_json::Map<String, Value>;

/// Root of an ADF document.
///
/// Serializes as `{ "version": 1, "type": "doc", "content": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfDocument {
    /// Format version (always 1).
    #[serde(default = "default_version")]
    pub version: u32,
    /// Node type (always `"doc"`).
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Top-level block nodes in document order.
    #[serde(default)]
    pub content: Vec<AdfNode>,
}

fn default_version() -> u32 {
    AdfDocument::VERSION
}

impl Default for AdfDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AdfDocument {
    /// The only ADF version this crate produces.
    pub const VERSION: u32 = 1;

    /// Create a document from top-level blocks.
    #[must_use]
    pub fn new(content: Vec<AdfNode>) -> Self {
        Self {
            version: Self::VERSION,
            doc_type: "doc".to_owned(),
            content,
        }
    }

    /// Decode a document from its JSON representation.
    ///
    /// The version is normalized to 1.
    ///
    /// # Errors
    ///
    /// Returns [`AdfError::Json`] for malformed JSON and
    /// [`AdfError::NotADocument`] when the root is not a `doc` node.
    pub fn from_json(json: &str) -> Result<Self, AdfError> {
        let mut doc: Self = serde_json::from_str(json)?;
        if doc.doc_type != "doc" {
            return Err(AdfError::NotADocument(doc.doc_type));
        }
        doc.version = Self::VERSION;
        Ok(doc)
    }

    /// Encode the document as compact JSON.
    pub fn to_json(&self) -> Result<String, AdfError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode the document as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, AdfError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a new document by optionally replacing top-level blocks.
    ///
    /// `replace` is called once per top-level block in order. Returning
    /// `Some(nodes)` splices `nodes` in place of the block (an empty vector
    /// removes it); `None` keeps the block unchanged.
    #[must_use]
    pub fn replace_blocks<F>(&self, mut replace: F) -> Self
    where
        F: FnMut(&AdfNode) -> Option<Vec<AdfNode>>,
    {
        let mut content = Vec::with_capacity(self.content.len());
        for node in &self.content {
            match replace(node) {
                Some(replacement) => content.extend(replacement),
                None => content.push(node.clone()),
            }
        }
        Self {
            version: Self::VERSION,
            doc_type: self.doc_type.clone(),
            content,
        }
    }

    /// Whether any text node in the document contains `needle`.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.content.iter().any(|node| node.contains_text(needle))
    }
}

/// A block or inline ADF node.
///
/// The node type is kept as a string so that node types this crate does not
/// know about survive a decode/encode cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfNode {
    /// Node type (`paragraph`, `text`, `panel`, ...).
    #[serde(rename = "type")]
    pub node_type: String,
    /// Node attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    /// Child nodes (absent on leaf nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<AdfNode>>,
    /// Inline marks (text nodes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<AdfMark>>,
    /// Text content (text nodes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AdfNode {
    /// Create a bare node of the given type.
    #[must_use]
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: None,
            content: None,
            marks: None,
            text: None,
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Attrs::new)
            .insert(key.to_owned(), value.into());
        self
    }

    /// Set the child nodes.
    #[must_use]
    pub fn with_content(mut self, content: Vec<AdfNode>) -> Self {
        self.content = Some(content);
        self
    }

    /// Plain text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("text")
        }
    }

    /// Text node carrying marks. An empty mark list is omitted.
    #[must_use]
    pub fn text_with_marks(text: impl Into<String>, marks: Vec<AdfMark>) -> Self {
        let mut node = Self::text(text);
        if !marks.is_empty() {
            node.marks = Some(marks);
        }
        node
    }

    #[must_use]
    pub fn paragraph(content: Vec<AdfNode>) -> Self {
        Self::new("paragraph").with_content(content)
    }

    #[must_use]
    pub fn heading(level: u8, content: Vec<AdfNode>) -> Self {
        Self::new("heading")
            .with_attr("level", level)
            .with_content(content)
    }

    /// Code block with an optional language and a single text child.
    ///
    /// Empty code produces a code block without children.
    #[must_use]
    pub fn code_block(language: Option<&str>, code: &str) -> Self {
        let mut node = Self::new("codeBlock");
        if let Some(lang) = language.filter(|l| !l.is_empty()) {
            node = node.with_attr("language", lang);
        }
        let content = if code.is_empty() {
            Vec::new()
        } else {
            vec![Self::text(code)]
        };
        node.with_content(content)
    }

    /// Confluence panel (colored callout box).
    #[must_use]
    pub fn panel(panel_type: PanelType, content: Vec<AdfNode>) -> Self {
        Self::new("panel")
            .with_attr("panelType", panel_type.as_str())
            .with_content(content)
    }

    /// Confluence expand (collapsible section).
    #[must_use]
    pub fn expand(title: &str, content: Vec<AdfNode>) -> Self {
        Self::new("expand")
            .with_attr("title", title)
            .with_content(content)
    }

    #[must_use]
    pub fn hard_break() -> Self {
        Self::new("hardBreak")
    }

    #[must_use]
    pub fn rule() -> Self {
        Self::new("rule")
    }

    /// Whether this node has the given type.
    #[must_use]
    pub fn is(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    /// Child nodes, or an empty slice for leaf nodes.
    #[must_use]
    pub fn children(&self) -> &[AdfNode] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Marks, or an empty slice.
    #[must_use]
    pub fn marks(&self) -> &[AdfMark] {
        self.marks.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref()?.get(key)
    }

    /// String attribute. Empty strings are treated as absent.
    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key)?.as_str().filter(|s| !s.is_empty())
    }

    /// Integer attribute (accepts JSON numbers and numeric strings).
    #[must_use]
    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        match self.attr(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Whether this node or any descendant is text containing `needle`.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.find_text(|text| text.contains(needle)).is_some()
    }

    /// First text (depth-first) accepted by `predicate`.
    pub fn find_text<P>(&self, mut predicate: P) -> Option<&str>
    where
        P: FnMut(&str) -> bool,
    {
        self.find_text_inner(&mut predicate)
    }

    fn find_text_inner<P>(&self, predicate: &mut P) -> Option<&str>
    where
        P: FnMut(&str) -> bool,
    {
        if let Some(text) = self.text.as_deref()
            && predicate(text)
        {
            return Some(text);
        }
        self.children()
            .iter()
            .find_map(|child| child.find_text_inner(predicate))
    }
}

/// Inline formatting mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfMark {
    /// Mark type (`strong`, `em`, `code`, `strike`, `link`, ...).
    #[serde(rename = "type")]
    pub mark_type: String,
    /// Mark attributes (`href` for links).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

impl AdfMark {
    #[must_use]
    pub fn new(mark_type: impl Into<String>) -> Self {
        Self {
            mark_type: mark_type.into(),
            attrs: None,
        }
    }

    /// Link mark with an optional title.
    #[must_use]
    pub fn link(href: &str, title: Option<&str>) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("href".to_owned(), Value::from(href));
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            attrs.insert("title".to_owned(), Value::from(title));
        }
        Self {
            mark_type: "link".to_owned(),
            attrs: Some(attrs),
        }
    }

    #[must_use]
    pub fn is(&self, mark_type: &str) -> bool {
        self.mark_type == mark_type
    }

    /// Link target. Empty strings are treated as absent.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.attrs
            .as_ref()?
            .get("href")?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_document_json_shape() {
        let doc = AdfDocument::new(vec![AdfNode::paragraph(vec![AdfNode::text_with_marks(
            "bold",
            vec![AdfMark::new("strong")],
        )])]);

        let value: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "version": 1,
                "type": "doc",
                "content": [{
                    "type": "paragraph",
                    "content": [{
                        "type": "text",
                        "text": "bold",
                        "marks": [{ "type": "strong" }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_from_json_preserves_unknown_nodes() {
        let json = r#"{"version":1,"type":"doc","content":[
            {"type":"layoutSection","attrs":{"x":1},"content":[{"type":"text","text":"hi"}]}
        ]}"#;
        let doc = AdfDocument::from_json(json).unwrap();
        assert_eq!(doc.content[0].node_type, "layoutSection");
        assert_eq!(doc.content[0].attr_u64("x"), Some(1));
        assert!(doc.contains_text("hi"));
    }

    #[test]
    fn test_from_json_rejects_non_doc_root() {
        let err = AdfDocument::from_json(r#"{"type":"paragraph"}"#).unwrap_err();
        assert!(matches!(err, AdfError::NotADocument(ref t) if t == "paragraph"));
    }

    #[test]
    fn test_from_json_rejects_malformed_json() {
        let err = AdfDocument::from_json("{not json").unwrap_err();
        assert!(matches!(err, AdfError::Json(_)));
    }

    #[test]
    fn test_from_json_normalizes_version() {
        let doc = AdfDocument::from_json(r#"{"version":3,"type":"doc","content":[]}"#).unwrap();
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_replace_blocks_splices_and_preserves_order() {
        let doc = AdfDocument::new(vec![
            AdfNode::paragraph(vec![AdfNode::text("a")]),
            AdfNode::paragraph(vec![AdfNode::text("MARK")]),
            AdfNode::paragraph(vec![AdfNode::text("c")]),
        ]);

        let replaced = doc.replace_blocks(|node| {
            node.contains_text("MARK")
                .then(|| vec![AdfNode::rule(), AdfNode::rule()])
        });

        let types: Vec<_> = replaced.content.iter().map(|n| n.node_type.as_str()).collect();
        assert_eq!(types, vec!["paragraph", "rule", "rule", "paragraph"]);
        // Original untouched
        assert_eq!(doc.content.len(), 3);
    }

    #[test]
    fn test_replace_blocks_can_remove() {
        let doc = AdfDocument::new(vec![AdfNode::rule(), AdfNode::paragraph(Vec::new())]);
        let replaced = doc.replace_blocks(|node| node.is("rule").then(Vec::new));
        assert_eq!(replaced.content.len(), 1);
        assert!(replaced.content[0].is("paragraph"));
    }

    #[test]
    fn test_find_text_recurses_into_nested_content() {
        let list = AdfNode::new("bulletList").with_content(vec![
            AdfNode::new("listItem").with_content(vec![AdfNode::paragraph(vec![
                AdfNode::text("deep TOKEN_7"),
            ])]),
        ]);
        assert_eq!(list.find_text(|t| t.contains("TOKEN_")), Some("deep TOKEN_7"));
        assert!(list.find_text(|t| t.contains("missing")).is_none());
    }

    #[test]
    fn test_code_block_empty_has_no_children() {
        let node = AdfNode::code_block(Some(""), "");
        assert!(node.attrs.is_none());
        assert_eq!(node.content, Some(Vec::new()));

        let node = AdfNode::code_block(Some("rust"), "fn main() {}");
        assert_eq!(node.attr_str("language"), Some("rust"));
        assert_eq!(node.children()[0].text.as_deref(), Some("fn main() {}"));
    }

    #[test]
    fn test_attr_helpers() {
        let node = AdfNode::new("heading")
            .with_attr("level", 3)
            .with_attr("empty", "")
            .with_attr("numeric", "4");
        assert_eq!(node.attr_u64("level"), Some(3));
        assert_eq!(node.attr_u64("numeric"), Some(4));
        assert_eq!(node.attr_str("empty"), None);
        assert_eq!(node.attr_str("missing"), None);
    }

    #[test]
    fn test_link_mark_href() {
        let mark = AdfMark::link("https://example.com", Some("Example"));
        assert_eq!(mark.href(), Some("https://example.com"));
        assert!(AdfMark::new("link").href().is_none());
        assert!(AdfMark::link("", None).href().is_none());
    }
}

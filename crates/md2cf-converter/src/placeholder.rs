//! Placeholder protocol shared by the strip/inject passes.
//!
//! A strip pass replaces a Markdown construct the baseline converter cannot
//! express with a sentinel line and records the construct. After baseline
//! conversion the matching inject pass finds the top-level block whose text
//! contains the sentinel and replaces that whole block.
//!
//! Sentinels have the form `<PREFIX><index>_<nonce>`. The nonce is derived
//! from the pass input, so it is stable for a given document and cannot be
//! guessed from the document's own text.

use md2cf_adf::{AdfDocument, AdfNode};
use sha2::{Digest, Sha256};

/// Sentinel prefix for the table of contents section.
pub const TOC_PREFIX: &str = "CONFLUENCE_TOC_MACRO_PLACEHOLDER_";
/// Sentinel prefix for GFM alert panels.
pub const PANEL_PREFIX: &str = "CONFLUENCE_PANEL_PLACEHOLDER_";
/// Sentinel prefix for `:::expand` sections.
pub const EXPAND_PREFIX: &str = "CONFLUENCE_EXPAND_PLACEHOLDER_";

/// Number of hex characters in a sentinel nonce.
const NONCE_LEN: usize = 8;

/// A recorded block that is reinserted at its sentinel.
pub trait Placeholder {
    /// Exact sentinel text written into the Markdown.
    fn placeholder(&self) -> &str;
}

/// Derive the sentinel nonce for a pass input.
#[must_use]
pub fn nonce(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let mut hex = hex::encode(hasher.finalize());
    hex.truncate(NONCE_LEN);
    hex
}

/// Build a sentinel.
#[must_use]
pub fn sentinel(prefix: &str, index: usize, nonce: &str) -> String {
    format!("{prefix}{index}_{nonce}")
}

/// Block types searched for sentinels instead of being replaced whole.
///
/// Expand and panel bodies are converted before the passes that run after
/// them, so their sentinels sit one or more levels down.
const CONTAINER_TYPES: [&str; 3] = ["expand", "nestedExpand", "panel"];

/// Replace each block containing a sentinel with built nodes.
///
/// Top-level blocks are replaced whole, except expand and panel containers,
/// whose children are searched the same way. A block that contains several
/// sentinels is replaced by the concatenated replacements, in record order.
/// Expands injected directly into an expand become `nestedExpand` nodes.
/// Sentinels that no longer appear in the document are logged and skipped.
pub fn inject_blocks<B, F>(doc: &AdfDocument, blocks: &[B], kind: &str, mut build: F) -> AdfDocument
where
    B: Placeholder,
    F: FnMut(&B) -> Vec<AdfNode>,
{
    if blocks.is_empty() {
        return doc.clone();
    }

    let mut found = vec![false; blocks.len()];
    let result = doc.replace_blocks(|node| replace_node(node, blocks, &mut found, &mut build, false));

    for (block, _) in blocks.iter().zip(&found).filter(|(_, found)| !**found) {
        tracing::warn!(kind, placeholder = block.placeholder(), "Placeholder not found in document");
    }

    result
}

fn replace_node<B, F>(
    node: &AdfNode,
    blocks: &[B],
    found: &mut [bool],
    build: &mut F,
    in_expand: bool,
) -> Option<Vec<AdfNode>>
where
    B: Placeholder,
    F: FnMut(&B) -> Vec<AdfNode>,
{
    let pending: Vec<usize> = (0..blocks.len())
        .filter(|&i| !found[i] && node.contains_text(blocks[i].placeholder()))
        .collect();
    if pending.is_empty() {
        return None;
    }

    if CONTAINER_TYPES.contains(&node.node_type.as_str()) {
        let inside_expand = node.is("expand") || node.is("nestedExpand");
        let mut children = Vec::with_capacity(node.children().len());
        for child in node.children() {
            match replace_node(child, blocks, found, build, inside_expand) {
                Some(replacement) => children.extend(replacement),
                None => children.push(child.clone()),
            }
        }
        return Some(vec![node.clone().with_content(children)]);
    }

    let mut replacement = Vec::new();
    for i in pending {
        found[i] = true;
        let built = build(&blocks[i]);
        if in_expand {
            replacement.extend(built.into_iter().map(nest_expand));
        } else {
            replacement.extend(built);
        }
    }
    Some(replacement)
}

/// Turn an `expand` into a `nestedExpand`, leaving other nodes alone.
pub(crate) fn nest_expand(mut node: AdfNode) -> AdfNode {
    if node.is("expand") {
        node.node_type = "nestedExpand".to_owned();
    }
    node
}

/// Line buffer for the strip passes.
///
/// Joins lines with `\n` and keeps the input's trailing newline.
#[derive(Debug, Default)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }

    /// Push a sentinel as its own paragraph.
    ///
    /// The sentinel starts at column 0, so it closes any list or indented
    /// block it was found in and always becomes a top-level block.
    pub fn push_sentinel(&mut self, sentinel: &str) {
        self.lines.push(String::new());
        self.lines.push(sentinel.to_owned());
        self.lines.push(String::new());
    }

    pub fn finish(self, input: &str) -> String {
        let mut out = self.lines.join("\n");
        if input.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// Join body lines, dropping blank lines at both ends.
pub(crate) fn join_body(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

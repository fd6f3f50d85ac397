//! Page title derivation.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::fence::FenceTracker;

static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#\s+(.+)$").expect("invalid regex"));

static EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\w+$").expect("invalid regex"));

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_]+").expect("invalid regex"));

/// Text of the first level-1 ATX heading outside code fences.
#[must_use]
pub fn extract_title(markdown: &str) -> Option<String> {
    let mut fence = FenceTracker::new();
    for line in markdown.lines() {
        if fence.update(line) || fence.in_fence() {
            continue;
        }
        if let Some(caps) = H1.captures(line) {
            let title = caps[1].trim();
            if !title.is_empty() {
                return Some(title.to_owned());
            }
        }
    }
    None
}

/// Derive a title from a file path or URL.
///
/// `docs/guides/getting-started.md` becomes `Getting Started`.
#[must_use]
pub fn title_from_filename(source: &str) -> String {
    let segment = last_segment(source);
    let name = if segment.is_empty() { "Untitled" } else { segment.as_str() };
    let stem = EXTENSION.replace(name, "");
    let spaced = SEPARATORS.replace_all(&stem, " ");
    capitalize_words(&spaced)
}

fn last_segment(source: &str) -> String {
    if let Ok(url) = Url::parse(source)
        && url.has_host()
    {
        return url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .unwrap_or_default()
            .to_owned();
    }
    source
        .split(['/', '\\'])
        .rfind(|s| !s.is_empty())
        .unwrap_or_default()
        .to_owned()
}

/// Upper-case the first character of every word.
fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_word = false;
    for c in text.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

//! Code fence tracking for line-based passes.
//!
//! The strip passes rewrite Markdown line by line before it is parsed. They
//! must ignore directive syntax (`> [!NOTE]`, `:::expand`, headings) that
//! appears inside fenced code blocks.

/// Tracks code fence state during line-by-line processing.
///
/// Code fences in `CommonMark` can use backticks or tildes (three or more).
/// The closing fence must use the same character and be at least as long
/// as the opening fence.
#[derive(Debug, Default)]
pub struct FenceTracker {
    /// Character used for the current fence (backtick or tilde).
    fence_char: Option<char>,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
    /// First word of the opening fence's info string.
    info: String,
}

impl FenceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    #[must_use]
    pub fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Language of the open fence (`mermaid` for "```mermaid title").
    ///
    /// Returns `None` outside a fence or when the fence has no info string.
    #[must_use]
    pub fn info(&self) -> Option<&str> {
        if self.in_fence() && !self.info.is_empty() {
            Some(&self.info)
        } else {
            None
        }
    }

    /// Update fence state based on a line.
    ///
    /// Call this for each line. Returns `true` if the line is a fence marker
    /// (opening or closing).
    pub fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_closing_fence(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                self.info.clear();
                return true;
            }
            false
        } else if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            self.info = trimmed[len..]
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_owned();
            true
        } else {
            false
        }
    }
}

/// Detect if a line opens a code fence.
///
/// Returns the fence character and length (in bytes, fence characters are
/// ASCII) if found.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < 3 {
        return None;
    }
    // A backtick fence's info string may not contain backticks
    if first == '`' && trimmed[count..].contains('`') {
        return None;
    }
    Some((first, count))
}

/// Check if a line is a valid closing fence.
///
/// The closing fence must:
/// - Use the same character as opening
/// - Be at least as long as opening
/// - Contain only fence characters (optionally followed by whitespace)
fn is_closing_fence(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected_char) {
        return false;
    }

    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    if count < min_len {
        return false;
    }

    trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        let tracker = FenceTracker::new();
        assert!(!tracker.in_fence());
        assert_eq!(tracker.info(), None);
    }

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```rust"));
        assert!(tracker.in_fence());
        assert_eq!(tracker.info(), Some("rust"));

        assert!(!tracker.update("fn main() {}"));
        assert!(tracker.in_fence());

        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
        assert_eq!(tracker.info(), None);
    }

    #[test]
    fn test_tilde_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("~~~mermaid"));
        assert!(tracker.in_fence());
        assert_eq!(tracker.info(), Some("mermaid"));

        assert!(tracker.update("~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_info_is_first_word() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("```  mermaid title=\"Flow\""));
        assert_eq!(tracker.info(), Some("mermaid"));
    }

    #[test]
    fn test_fence_without_info() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("```"));
        assert!(tracker.in_fence());
        assert_eq!(tracker.info(), None);
    }

    #[test]
    fn test_shorter_fence_not_closing() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("````"));
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());

        assert!(tracker.update("`````"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_mixed_fence_chars() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```"));
        assert!(!tracker.update("~~~"));
        assert!(tracker.in_fence());

        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_closing_fence_with_info_does_not_close() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```"));
        assert!(!tracker.update("```rust"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_indented_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("   ```rust"));
        assert!(tracker.in_fence());

        assert!(tracker.update("  ```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_regular_lines_are_not_fences() {
        let mut tracker = FenceTracker::new();

        assert!(!tracker.update("This is a regular line"));
        assert!(!tracker.update(":::expand Details"));
        assert!(!tracker.update("``inline code``"));
        assert!(!tracker.update("```inline``` code"));
        assert!(!tracker.in_fence());
    }
}

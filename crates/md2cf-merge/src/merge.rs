//! Line-diff based merging.

use similar::{DiffOp, TextDiff};

use crate::MergeStrategy;

/// Separator placed between remote and local content by the append strategy.
const APPEND_SEPARATOR: &str = "\n\n---\n\n";

/// Line counts describing how the result differs from its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    /// Lines added.
    pub added: usize,
    /// Lines removed.
    pub removed: usize,
    /// Lines unchanged.
    pub unchanged: usize,
}

impl MergeStats {
    fn from_ops(ops: &[DiffOp]) -> Self {
        let mut stats = Self::default();
        for op in ops {
            match *op {
                DiffOp::Equal { len, .. } => stats.unchanged += len,
                DiffOp::Delete { old_len, .. } => stats.removed += old_len,
                DiffOp::Insert { new_len, .. } => stats.added += new_len,
                DiffOp::Replace {
                    old_len, new_len, ..
                } => {
                    stats.removed += old_len;
                    stats.added += new_len;
                }
            }
        }
        stats
    }
}

/// Outcome of [`merge_markdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Merged document.
    pub markdown: String,
    /// Whether a remote hunk was overwritten by a conflicting local hunk.
    pub has_conflicts: bool,
    /// Change statistics.
    pub stats: MergeStats,
}

/// Merge local Markdown into the remote page's Markdown.
///
/// `local` is the document being published and `remote` the current page
/// content rendered back to Markdown.
///
/// - [`MergeStrategy::LocalWins`] returns `local`, with stats for the
///   remote to local diff.
/// - [`MergeStrategy::RemoteWins`] returns `remote`, with stats for the
///   local to remote diff.
/// - [`MergeStrategy::Append`] returns `remote`, a horizontal rule, then
///   `local`.
/// - [`MergeStrategy::AutoMerge`] walks the remote to local diff. Additions
///   are kept and removals dropped; a removal directly followed by an
///   addition keeps the local lines and marks the result as conflicting.
///
/// # Example
///
/// ```
/// use md2cf_merge::{MergeStrategy, merge_markdown};
///
/// let result = merge_markdown("line1\nline2\n", "line1\nline3\n", MergeStrategy::AutoMerge);
/// assert_eq!(result.markdown, "line1\nline2\n");
/// assert!(result.has_conflicts);
/// ```
#[must_use]
pub fn merge_markdown(local: &str, remote: &str, strategy: MergeStrategy) -> MergeResult {
    let result = match strategy {
        MergeStrategy::LocalWins => MergeResult {
            markdown: local.to_owned(),
            has_conflicts: false,
            stats: MergeStats::from_ops(TextDiff::from_lines(remote, local).ops()),
        },
        MergeStrategy::RemoteWins => MergeResult {
            markdown: remote.to_owned(),
            has_conflicts: false,
            stats: MergeStats::from_ops(TextDiff::from_lines(local, remote).ops()),
        },
        MergeStrategy::Append => append(local, remote),
        MergeStrategy::AutoMerge => auto_merge(local, remote),
    };

    tracing::debug!(
        strategy = %strategy,
        added = result.stats.added,
        removed = result.stats.removed,
        unchanged = result.stats.unchanged,
        "Merged markdown"
    );
    if result.has_conflicts {
        tracing::warn!(strategy = %strategy, "Conflicting edits resolved in favor of local content");
    }
    result
}

fn append(local: &str, remote: &str) -> MergeResult {
    MergeResult {
        markdown: format!(
            "{}{APPEND_SEPARATOR}{}",
            remote.trim_end(),
            local.trim_start()
        ),
        has_conflicts: false,
        stats: MergeStats {
            added: count_lines(local),
            removed: 0,
            unchanged: count_lines(remote),
        },
    }
}

fn auto_merge(local: &str, remote: &str) -> MergeResult {
    if local == remote {
        return MergeResult {
            markdown: local.to_owned(),
            has_conflicts: false,
            stats: MergeStats {
                unchanged: count_lines(local),
                ..MergeStats::default()
            },
        };
    }

    let diff = TextDiff::from_lines(remote, local);
    let lines = diff.new_slices();
    let mut markdown = String::with_capacity(local.len());
    let mut stats = MergeStats::default();
    let mut has_conflicts = false;

    let mut ops = diff.ops().iter().peekable();
    while let Some(op) = ops.next() {
        match *op {
            DiffOp::Equal { new_index, len, .. } => {
                stats.unchanged += len;
                markdown.extend(lines[new_index..new_index + len].iter().copied());
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                stats.added += new_len;
                markdown.extend(lines[new_index..new_index + new_len].iter().copied());
            }
            DiffOp::Replace {
                old_len,
                new_index,
                new_len,
                ..
            } => {
                stats.removed += old_len;
                stats.added += new_len;
                has_conflicts = true;
                markdown.extend(lines[new_index..new_index + new_len].iter().copied());
            }
            DiffOp::Delete { old_len, .. } => {
                stats.removed += old_len;
                if let Some(&&DiffOp::Insert {
                    new_index, new_len, ..
                }) = ops.peek()
                {
                    ops.next();
                    stats.added += new_len;
                    has_conflicts = true;
                    markdown.extend(lines[new_index..new_index + new_len].iter().copied());
                }
            }
        }
    }

    MergeResult {
        markdown,
        has_conflicts,
        stats,
    }
}

/// Number of lines in `text`. A trailing newline does not start a new line.
#[must_use]
pub fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.strip_suffix('\n').unwrap_or(text).split('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("a"), 1);
        assert_eq!(count_lines("a\n"), 1);
        assert_eq!(count_lines("a\nb"), 2);
        assert_eq!(count_lines("a\n\n"), 2);
        assert_eq!(count_lines("\n"), 1);
    }

    #[test]
    fn test_auto_merge_conflicting_line() {
        let result = merge_markdown("line1\nline2\n", "line1\nline3\n", MergeStrategy::AutoMerge);
        assert!(result.has_conflicts);
        assert!(result.markdown.contains("line2"));
        assert!(!result.markdown.contains("line3"));
        assert_eq!(
            result.stats,
            MergeStats {
                added: 1,
                removed: 1,
                unchanged: 1
            }
        );
    }

    #[test]
    fn test_identical_inputs_for_every_strategy() {
        let text = "# Title\n\nBody line\n";
        for strategy in [
            MergeStrategy::LocalWins,
            MergeStrategy::RemoteWins,
            MergeStrategy::AutoMerge,
        ] {
            let result = merge_markdown(text, text, strategy);
            assert_eq!(result.markdown, text, "{strategy}");
            assert!(!result.has_conflicts);
            assert_eq!(
                result.stats,
                MergeStats {
                    added: 0,
                    removed: 0,
                    unchanged: 3
                }
            );
        }
    }

    #[test]
    fn test_auto_merge_keeps_local_additions() {
        let result = merge_markdown("a\nb\nc\n", "a\nc\n", MergeStrategy::AutoMerge);
        assert_eq!(result.markdown, "a\nb\nc\n");
        assert!(!result.has_conflicts);
        assert_eq!(
            result.stats,
            MergeStats {
                added: 1,
                removed: 0,
                unchanged: 2
            }
        );
    }

    #[test]
    fn test_auto_merge_drops_remote_only_lines() {
        let result = merge_markdown("a\nc\n", "a\nb\nc\n", MergeStrategy::AutoMerge);
        assert_eq!(result.markdown, "a\nc\n");
        assert!(!result.has_conflicts);
        assert_eq!(
            result.stats,
            MergeStats {
                added: 0,
                removed: 1,
                unchanged: 2
            }
        );
    }

    #[test]
    fn test_local_wins_stats() {
        let result = merge_markdown("a\nx\ny\n", "a\nb\n", MergeStrategy::LocalWins);
        assert_eq!(result.markdown, "a\nx\ny\n");
        assert!(!result.has_conflicts);
        assert_eq!(
            result.stats,
            MergeStats {
                added: 2,
                removed: 1,
                unchanged: 1
            }
        );
    }

    #[test]
    fn test_remote_wins_stats_are_mirrored() {
        let result = merge_markdown("a\nx\ny\n", "a\nb\n", MergeStrategy::RemoteWins);
        assert_eq!(result.markdown, "a\nb\n");
        assert_eq!(
            result.stats,
            MergeStats {
                added: 1,
                removed: 2,
                unchanged: 1
            }
        );
    }

    #[test]
    fn test_append() {
        let result = merge_markdown("\n\nlocal\n", "remote\n\n", MergeStrategy::Append);
        assert_eq!(result.markdown, "remote\n\n---\n\nlocal\n");
        assert!(!result.has_conflicts);
        assert_eq!(
            result.stats,
            MergeStats {
                added: 3,
                removed: 0,
                unchanged: 2
            }
        );
    }

    #[test]
    fn test_append_identical_still_appends() {
        let result = merge_markdown("same\n", "same\n", MergeStrategy::Append);
        assert_eq!(result.markdown, "same\n\n---\n\nsame\n");
    }

    #[test]
    fn test_auto_merge_empty_remote() {
        let result = merge_markdown("new\n", "", MergeStrategy::AutoMerge);
        assert_eq!(result.markdown, "new\n");
        assert!(!result.has_conflicts);
        assert_eq!(result.stats.added, 1);
    }
}

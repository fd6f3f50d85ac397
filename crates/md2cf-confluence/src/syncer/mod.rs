//! Page syncer for Confluence.
//!
//! This module provides the [`PageSyncer`] struct that encapsulates the entire
//! workflow for publishing a Markdown document to a Confluence page:
//!
//! 1. Render Mermaid diagrams and replace them with placeholders
//! 2. Convert Markdown to ADF
//! 3. Create the page, or fetch it and merge with its current content
//! 4. Upload rendered diagrams as attachments
//! 5. Update the page again with image references
//!
//! # Example
//!
//! ```ignore
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use md2cf_confluence::{ConfluenceUrl, MockPageStore, PageSyncer, SyncAction, SyncOptions};
//! use md2cf_diagrams::{RenderError, RenderedDiagram};
//!
//! let store = MockPageStore::new().with_space("100", "DOC", "Docs");
//! let render = |_: &str, index: usize| Ok::<_, RenderError>(RenderedDiagram::new(vec![0x89], index));
//! let options = SyncOptions {
//!     create: true,
//!     ..SyncOptions::default()
//! };
//!
//! let syncer = PageSyncer::new(&store, &render, options);
//! let target = ConfluenceUrl::parse("https://acme.atlassian.net/wiki/spaces/DOC")?;
//! let result = syncer.sync("guide.md", "# Guide\n\nHello.\n", &target)?;
//! assert_eq!(result.action, SyncAction::Created);
//! assert_eq!(result.title, "Guide");
//! # Ok(())
//! # }
//! ```

mod executor;

use std::fmt;

use md2cf_converter::TocLevels;
use md2cf_merge::{MergeStats, MergeStrategy};

pub use executor::PageSyncer;

/// Options for a single sync.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Create a new page under the target instead of updating it.
    pub create: bool,
    /// Explicit page title (otherwise first H1, then the source filename).
    pub title: Option<String>,
    /// Plan only; the page store is never called.
    pub dry_run: bool,
    /// Leave Mermaid blocks as plain code blocks.
    pub skip_mermaid: bool,
    /// How local content is merged into an existing page.
    pub strategy: MergeStrategy,
    /// Heading levels listed by TOC macros.
    pub toc_levels: TocLevels,
}

/// What a sync did (or would do, for a dry run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Updated,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
        })
    }
}

/// Outcome of merging with the remote page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Strategy used.
    pub strategy: MergeStrategy,
    /// Line statistics.
    pub stats: MergeStats,
    /// Whether conflicting remote edits were overwritten.
    pub has_conflicts: bool,
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} -{} ~{}",
            self.stats.added, self.stats.removed, self.stats.unchanged
        )
    }
}

/// Result of a sync.
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// Page id (the target page for a dry-run update, `None` for a dry-run create).
    pub page_id: Option<String>,
    /// Web URL of the page, when known.
    pub page_url: Option<String>,
    /// Created or updated.
    pub action: SyncAction,
    /// Page title.
    pub title: String,
    /// Merge outcome, when remote content was merged.
    pub merge: Option<MergeSummary>,
    /// Number of Mermaid blocks found.
    pub diagrams: usize,
    /// Number of diagrams that failed to render.
    pub diagrams_failed: usize,
    /// Number of diagrams uploaded as attachments.
    pub diagrams_uploaded: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

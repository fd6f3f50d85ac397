//! Merging of local and remote Markdown.
//!
//! When a page is updated, its current content is rendered back to Markdown
//! and reconciled with the local document line by line using one of the
//! [`MergeStrategy`] variants. Merging is pure: the same inputs always give
//! the same [`MergeResult`].

mod error;
mod merge;
mod strategy;

pub use error::MergeError;
pub use merge::{MergeResult, MergeStats, count_lines, merge_markdown};
pub use strategy::MergeStrategy;

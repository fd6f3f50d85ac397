//! Confluence page sync for md2cf.
//!
//! Publishes Markdown documents to Confluence Cloud pages through the
//! [`PageStore`] capability:
//!
//! - [`PageSyncer`] drives create and update flows, merging with the current
//!   page content and uploading rendered Mermaid diagrams
//! - [`ConfluenceUrl`] parses space, page and folder URLs
//! - [`Page`] and friends mirror the REST API v2 payloads
//! - [`MockPageStore`] for testing (behind `mock` feature flag)

mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod store;
mod syncer;
mod types;
mod location;

pub use error::{ConfluenceError, SyncError};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockPageStore, RecordedWrite};
pub use store::PageStore;
pub use syncer::{MergeSummary, PageSyncer, SyncAction, SyncOptions, SyncResult};
pub use types::{AtlasDocFormat, Body, Folder, Links, Page, Space, UploadedAttachment, Version};
pub use location::{ConfluenceUrl, UrlTarget, api_base_url, extract_page_id, page_web_url};

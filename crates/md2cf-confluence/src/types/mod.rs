//! Confluence Cloud REST API (v2) types.

mod attachment;
mod page;
mod space;

pub use attachment::UploadedAttachment;
pub use page::{AtlasDocFormat, Body, Links, Page, Version};
pub use space::{Folder, Space};

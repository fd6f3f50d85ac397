//! Page store capability.

use md2cf_adf::AdfDocument;

use crate::error::ConfluenceError;
use crate::types::{Folder, Page, Space, UploadedAttachment};

/// Access to Confluence pages.
///
/// Implemented by an HTTP client against the Confluence Cloud REST API v2,
/// or by [`MockPageStore`](crate::MockPageStore) in tests. Page bodies travel
/// as ADF JSON in `body.atlas_doc_format.value`.
pub trait PageStore {
    /// Fetch a page with its ADF body and version.
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError>;

    /// Fetch a folder.
    fn get_folder(&self, folder_id: &str) -> Result<Folder, ConfluenceError>;

    /// Look up a space by key.
    fn get_space(&self, space_key: &str) -> Result<Space, ConfluenceError>;

    /// Current version number of a page, 0 when unknown.
    fn get_page_version(&self, page_id: &str) -> Result<u32, ConfluenceError> {
        Ok(self.get_page(page_id)?.version_number())
    }

    /// Create a page in `space_id`, under `parent_id` or at the space root.
    fn create_page(
        &self,
        space_id: &str,
        title: &str,
        body: &AdfDocument,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError>;

    /// Replace a page's title and body. `version` is the new version number.
    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &AdfDocument,
        version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError>;

    /// Upload or replace an attachment on a page (upsert by filename).
    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<UploadedAttachment, ConfluenceError>;
}

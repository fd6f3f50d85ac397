//! Mock page store for testing.
//!
//! Provides [`MockPageStore`] for exercising sync flows without network access.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use md2cf_adf::AdfDocument;

use crate::error::ConfluenceError;
use crate::store::PageStore;
use crate::types::{Folder, Page, Space, UploadedAttachment};

/// A page write recorded by [`MockPageStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    /// Page written.
    pub page_id: String,
    /// Title sent.
    pub title: String,
    /// Body sent.
    pub body: AdfDocument,
    /// Version sent (1 for creates).
    pub version: u32,
    /// Version message sent.
    pub message: Option<String>,
    /// Parent id sent with a create.
    pub parent_id: Option<String>,
}

/// In-memory page store.
///
/// Stores pages, folders and spaces in memory and records every write. Use
/// the builder methods to configure test data.
///
/// # Example
///
/// ```ignore
/// use md2cf_confluence::{MockPageStore, Page, PageStore};
///
/// let store = MockPageStore::new()
///     .with_page(Page::new("1", "Guide", "S1").with_version(3));
///
/// assert_eq!(store.get_page_version("1").unwrap(), 3);
/// ```
#[derive(Debug, Default)]
pub struct MockPageStore {
    pages: RwLock<HashMap<String, Page>>,
    folders: RwLock<HashMap<String, Folder>>,
    spaces: RwLock<HashMap<String, Space>>,
    failing_uploads: RwLock<HashSet<String>>,
    uploads: RwLock<Vec<(String, String, usize)>>,
    writes: RwLock<Vec<RecordedWrite>>,
    next_id: RwLock<u64>,
}

impl MockPageStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, page: Page) -> Self {
        self.pages.write().unwrap().insert(page.id.clone(), page);
        self
    }

    /// Add a folder.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_folder(
        self,
        id: impl Into<String>,
        title: impl Into<String>,
        space_id: impl Into<String>,
    ) -> Self {
        let folder = Folder {
            id: id.into(),
            title: title.into(),
            space_id: space_id.into(),
        };
        self.folders.write().unwrap().insert(folder.id.clone(), folder);
        self
    }

    /// Add a space.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_space(
        self,
        id: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let space = Space {
            id: id.into(),
            key: key.into(),
            name: name.into(),
        };
        self.spaces.write().unwrap().insert(space.key.clone(), space);
        self
    }

    /// Make uploads of `filename` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_upload(self, filename: impl Into<String>) -> Self {
        self.failing_uploads.write().unwrap().insert(filename.into());
        self
    }

    /// Current state of a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page(&self, page_id: &str) -> Option<Page> {
        self.pages.read().unwrap().get(page_id).cloned()
    }

    /// All creates and updates, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.read().unwrap().clone()
    }

    /// Successful uploads as `(page_id, filename, byte_len)`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads.read().unwrap().clone()
    }

    fn not_found(kind: &'static str, id: &str) -> ConfluenceError {
        ConfluenceError::NotFound {
            kind,
            id: id.to_owned(),
        }
    }

    fn store_write(&self, write: RecordedWrite, space_id: String) -> Result<Page, ConfluenceError> {
        let page = Page::new(&write.page_id, &write.title, space_id)
            .with_version(write.version)
            .with_adf(&write.body)?
            .with_webui(format!("/spaces/MOCK/pages/{}", write.page_id));
        self.pages
            .write()
            .unwrap()
            .insert(page.id.clone(), page.clone());
        self.writes.write().unwrap().push(write);
        Ok(page)
    }
}

impl PageStore for MockPageStore {
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        self.page(page_id)
            .ok_or_else(|| Self::not_found("page", page_id))
    }

    fn get_folder(&self, folder_id: &str) -> Result<Folder, ConfluenceError> {
        self.folders
            .read()
            .unwrap()
            .get(folder_id)
            .cloned()
            .ok_or_else(|| Self::not_found("folder", folder_id))
    }

    fn get_space(&self, space_key: &str) -> Result<Space, ConfluenceError> {
        self.spaces
            .read()
            .unwrap()
            .get(space_key)
            .cloned()
            .ok_or_else(|| Self::not_found("space", space_key))
    }

    fn create_page(
        &self,
        space_id: &str,
        title: &str,
        body: &AdfDocument,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let id = {
            let mut next_id = self.next_id.write().unwrap();
            *next_id += 1;
            format!("new-{next_id}")
        };
        let write = RecordedWrite {
            page_id: id,
            title: title.to_owned(),
            body: body.clone(),
            version: 1,
            message: None,
            parent_id: parent_id.map(str::to_owned),
        };
        self.store_write(write, space_id.to_owned())
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &AdfDocument,
        version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let existing = self.get_page(page_id)?;
        if version != existing.version_number() + 1 {
            return Err(ConfluenceError::HttpResponse {
                status: 409,
                body: format!(
                    "Version must be incremented on update. Current version is: {}",
                    existing.version_number()
                ),
            });
        }
        let write = RecordedWrite {
            page_id: page_id.to_owned(),
            title: title.to_owned(),
            body: body.clone(),
            version,
            message: message.map(str::to_owned),
            parent_id: None,
        };
        self.store_write(write, existing.space_id)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<UploadedAttachment, ConfluenceError> {
        if self.failing_uploads.read().unwrap().contains(filename) {
            return Err(ConfluenceError::HttpResponse {
                status: 500,
                body: format!("upload of {filename} failed"),
            });
        }
        self.get_page(page_id)?;
        self.uploads
            .write()
            .unwrap()
            .push((page_id.to_owned(), filename.to_owned(), data.len()));
        Ok(UploadedAttachment {
            file_id: Some(format!("file-{filename}")),
            collection_name: None,
        })
    }
}

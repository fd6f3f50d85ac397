//! Confluence attachment types.

use md2cf_diagrams::Attachment;

/// Result of uploading an attachment.
///
/// Only media identifiers are kept. Either may be missing from the response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedAttachment {
    /// Media file id.
    pub file_id: Option<String>,
    /// Media collection name.
    pub collection_name: Option<String>,
}

impl UploadedAttachment {
    /// Media reference for an attachment on `page_id`.
    ///
    /// Returns `None` without a file id. The collection defaults to
    /// `contentId-<page_id>`.
    #[must_use]
    pub fn into_media(self, page_id: &str) -> Option<Attachment> {
        let file_id = self.file_id.filter(|id| !id.is_empty())?;
        Some(Attachment {
            file_id,
            collection_name: self
                .collection_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("contentId-{page_id}")),
        })
    }
}

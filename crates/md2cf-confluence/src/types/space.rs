//! Confluence space and folder types.

use serde::Deserialize;

/// Confluence space.
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    /// Space ID.
    pub id: String,
    /// Space key (e.g. `DOC`).
    pub key: String,
    /// Display name.
    pub name: String,
}

/// Confluence folder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Folder ID.
    pub id: String,
    /// Folder title.
    pub title: String,
    /// ID of the space containing the folder.
    pub space_id: String,
}

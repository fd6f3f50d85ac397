//! Confluence page types.

use md2cf_adf::{AdfDocument, AdfError};
use serde::{Deserialize, Serialize};

/// Body representation name for ADF content.
pub(crate) const ATLAS_DOC_FORMAT: &str = "atlas_doc_format";

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
    /// ID of the space containing the page.
    #[serde(default)]
    pub space_id: String,
    /// Version information.
    #[serde(default)]
    pub version: Option<Version>,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

impl Page {
    /// Page without body or links.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, space_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            space_id: space_id.into(),
            version: None,
            body: None,
            links: None,
        }
    }

    /// Set the version number.
    #[must_use]
    pub fn with_version(mut self, number: u32) -> Self {
        self.version = Some(Version {
            number,
            message: None,
        });
        self
    }

    /// Set the ADF body.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn with_adf(mut self, doc: &AdfDocument) -> Result<Self, AdfError> {
        self.body = Some(Body {
            atlas_doc_format: Some(AtlasDocFormat::new(doc.to_json()?)),
        });
        Ok(self)
    }

    /// Set the web UI link (relative to `<base>/wiki`).
    #[must_use]
    pub fn with_webui(mut self, webui: impl Into<String>) -> Self {
        self.links = Some(Links {
            webui: Some(webui.into()),
        });
        self
    }

    /// Current version number, 0 when unknown.
    #[must_use]
    pub fn version_number(&self) -> u32 {
        self.version.as_ref().map_or(0, |v| v.number)
    }

    /// Raw ADF JSON of the body, if the page was fetched with it.
    #[must_use]
    pub fn adf_value(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.atlas_doc_format.as_ref())
            .map(|f| f.value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// Decoded ADF body, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a valid ADF document.
    pub fn adf(&self) -> Result<Option<AdfDocument>, AdfError> {
        self.adf_value().map(AdfDocument::from_json).transpose()
    }

    /// Web UI path, if the API returned one.
    #[must_use]
    pub fn webui(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.webui.as_deref())
    }
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
    /// Version message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// ADF representation.
    #[serde(default)]
    pub atlas_doc_format: Option<AtlasDocFormat>,
}

/// ADF body representation. `value` holds the document as a JSON string.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AtlasDocFormat {
    /// ADF document JSON.
    pub value: String,
    /// Content representation (always "`atlas_doc_format`").
    pub representation: String,
}

impl AtlasDocFormat {
    pub(crate) fn new(value: String) -> Self {
        Self {
            value,
            representation: ATLAS_DOC_FORMAT.to_owned(),
        }
    }
}

/// Hypermedia links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Links {
    /// Web UI link.
    #[serde(default)]
    pub webui: Option<String>,
}

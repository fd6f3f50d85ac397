//! Confluence URL parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfluenceError;

static FOLDER_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/wiki/spaces/([^/]+)/folder/(\d+)").expect("invalid regex"));

static PAGE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/wiki/spaces/([^/]+)/pages/(\d+)").expect("invalid regex"));

static SPACE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/wiki/spaces/([^/]+)/?$").expect("invalid regex"));

/// What a Confluence URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    /// Space root.
    Space,
    /// Page with the given id.
    Page(String),
    /// Folder with the given id.
    Folder(String),
}

/// A parsed Confluence Cloud URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfluenceUrl {
    /// Scheme and host (e.g. `https://example.atlassian.net`).
    pub base_url: String,
    /// Space key.
    pub space_key: String,
    /// Page, folder or space root.
    pub target: UrlTarget,
}

impl ConfluenceUrl {
    /// Parse a Confluence URL.
    ///
    /// Supported forms:
    ///
    /// - `https://domain.atlassian.net/wiki/spaces/SPACE/pages/12345[/Title]`
    /// - `https://domain.atlassian.net/wiki/spaces/SPACE/folder/12345`
    /// - `https://domain.atlassian.net/wiki/spaces/SPACE`
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::InvalidUrl`] when `input` is not a URL and
    /// [`ConfluenceError::UnrecognizedUrl`] for other paths.
    pub fn parse(input: &str) -> Result<Self, ConfluenceError> {
        let parsed =
            url::Url::parse(input).map_err(|_| ConfluenceError::InvalidUrl(input.to_owned()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ConfluenceError::InvalidUrl(input.to_owned()))?;
        let base_url = match parsed.port() {
            Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
            None => format!("{}://{host}", parsed.scheme()),
        };
        let path = parsed.path();

        let (space_key, target) = if let Some(caps) = FOLDER_PATH.captures(path) {
            (caps[1].to_owned(), UrlTarget::Folder(caps[2].to_owned()))
        } else if let Some(caps) = PAGE_PATH.captures(path) {
            (caps[1].to_owned(), UrlTarget::Page(caps[2].to_owned()))
        } else if let Some(caps) = SPACE_PATH.captures(path) {
            (caps[1].to_owned(), UrlTarget::Space)
        } else {
            return Err(ConfluenceError::UnrecognizedUrl(input.to_owned()));
        };

        Ok(Self {
            base_url,
            space_key,
            target,
        })
    }

    /// Page id, when the URL points at a page.
    #[must_use]
    pub fn page_id(&self) -> Option<&str> {
        match &self.target {
            UrlTarget::Page(id) => Some(id),
            UrlTarget::Space | UrlTarget::Folder(_) => None,
        }
    }

    /// Web URL of the space or page this URL points at.
    #[must_use]
    pub fn web_url(&self) -> String {
        let path = match &self.target {
            UrlTarget::Space => format!("/spaces/{}", self.space_key),
            UrlTarget::Page(id) => format!("/spaces/{}/pages/{id}", self.space_key),
            UrlTarget::Folder(id) => format!("/spaces/{}/folder/{id}", self.space_key),
        };
        page_web_url(&self.base_url, &path)
    }
}

/// Base URL of the Confluence REST API v2.
#[must_use]
pub fn api_base_url(base_url: &str) -> String {
    format!("{}/wiki/api/v2", base_url.trim_end_matches('/'))
}

/// Web URL for a page's `_links.webui` path.
#[must_use]
pub fn page_web_url(base_url: &str, webui: &str) -> String {
    format!("{}/wiki{webui}", base_url.trim_end_matches('/'))
}

/// Page id from a bare numeric id or a page URL.
///
/// # Errors
///
/// Returns an error if `input` is not a URL, or is a URL without a page id.
pub fn extract_page_id(input: &str) -> Result<String, ConfluenceError> {
    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(input.to_owned());
    }
    ConfluenceUrl::parse(input)?
        .page_id()
        .map(str::to_owned)
        .ok_or_else(|| ConfluenceError::MissingPageId(input.to_owned()))
}

//! `md2cf url` command implementation.

use clap::Args;
use md2cf_confluence::{ConfluenceUrl, UrlTarget, api_base_url};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the url command.
#[derive(Args)]
pub(crate) struct UrlArgs {
    /// Confluence page, folder or space URL.
    url: String,
}

impl UrlArgs {
    /// Execute the url command.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a recognized Confluence URL.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let parsed = ConfluenceUrl::parse(&self.url)?;
        Output::new().result(&describe(&parsed))?;
        Ok(())
    }
}

/// `key: value` lines describing a parsed URL.
fn describe(url: &ConfluenceUrl) -> String {
    let (kind, id) = match &url.target {
        UrlTarget::Space => ("space", None),
        UrlTarget::Page(id) => ("page", Some(id.as_str())),
        UrlTarget::Folder(id) => ("folder", Some(id.as_str())),
    };

    let mut lines = vec![
        format!("base_url: {}", url.base_url),
        format!("api_url: {}", api_base_url(&url.base_url)),
        format!("space: {}", url.space_key),
        format!("target: {kind}"),
    ];
    if let Some(id) = id {
        lines.push(format!("id: {id}"));
    }
    lines.push(format!("web_url: {}", url.web_url()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_describe_page_url() {
        let url =
            ConfluenceUrl::parse("https://acme.atlassian.net/wiki/spaces/ENG/pages/42/Setup").unwrap();
        assert_eq!(
            describe(&url),
            "base_url: https://acme.atlassian.net\n\
             api_url: https://acme.atlassian.net/wiki/api/v2\n\
             space: ENG\n\
             target: page\n\
             id: 42\n\
             web_url: https://acme.atlassian.net/wiki/spaces/ENG/pages/42"
        );
    }

    #[test]
    fn test_describe_space_url() {
        let url = ConfluenceUrl::parse("https://acme.atlassian.net/wiki/spaces/ENG").unwrap();
        let text = describe(&url);
        assert!(text.contains("target: space"));
        assert!(!text.contains("id:"));
    }
}

//! `md2cf title` command implementation.

use std::path::Path;

use clap::Args;
use md2cf_converter::{extract_title, title_from_filename};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the title command.
#[derive(Args)]
pub(crate) struct TitleArgs {
    /// Markdown file path or URL.
    source: String,
}

impl TitleArgs {
    /// Execute the title command.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is an existing file that cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let path = Path::new(&self.source);
        let content = if path.is_file() {
            Some(std::fs::read_to_string(path)?)
        } else {
            None
        };
        Output::new().result(&derive_title(&self.source, content.as_deref()))?;
        Ok(())
    }
}

/// First H1 of `content`, falling back to a title built from `source`.
fn derive_title(source: &str, content: Option<&str>) -> String {
    content
        .and_then(extract_title)
        .unwrap_or_else(|| title_from_filename(source))
}

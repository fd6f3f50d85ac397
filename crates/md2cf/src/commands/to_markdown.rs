//! `md2cf to-markdown` command implementation.

use std::path::PathBuf;

use clap::Args;
use md2cf_adf::AdfDocument;
use md2cf_confluence::Page;
use md2cf_renderer::adf_to_markdown;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the to-markdown command.
#[derive(Args)]
pub(crate) struct ToMarkdownArgs {
    /// Path to an ADF document, or a page payload from the Confluence API.
    adf_file: PathBuf,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ToMarkdownArgs {
    /// Execute the to-markdown command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not an ADF document.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let json = std::fs::read_to_string(&self.adf_file)?;
        let markdown = adf_to_markdown(&parse_document(&json)?);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &markdown)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.result(&markdown)?,
        }
        Ok(())
    }
}

/// Decode an ADF document, or the ADF body of a page payload.
fn parse_document(json: &str) -> Result<AdfDocument, CliError> {
    let err = match AdfDocument::from_json(json) {
        Ok(doc) => return Ok(doc),
        Err(err) => err,
    };
    let Ok(page) = serde_json::from_str::<Page>(json) else {
        return Err(err.into());
    };
    page.adf()?.ok_or_else(|| {
        CliError::Validation(format!("page {} has no atlas_doc_format body", page.id))
    })
}

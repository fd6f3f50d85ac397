//! `md2cf convert` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use md2cf_adf::AdfDocument;
use md2cf_config::{CliSettings, Config};
use md2cf_converter::{MarkdownConverter, TocLevels};
use md2cf_diagrams::{
    AttachmentMap, DiagramRenderer, MmdcRenderer, inject_diagram_references, strip_diagram_blocks,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,

    /// Write ADF JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Shallowest heading level listed by TOC macros (overrides config).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
    toc_min: Option<u8>,

    /// Deepest heading level listed by TOC macros (overrides config).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
    toc_max: Option<u8>,

    /// Render Mermaid diagrams and write the PNGs to this directory.
    #[arg(long)]
    diagrams_dir: Option<PathBuf>,

    /// Mermaid CLI executable (overrides config).
    #[arg(long)]
    mmdc: Option<PathBuf>,

    /// Leave Mermaid blocks as code blocks.
    #[arg(long)]
    skip_mermaid: bool,

    /// Emit compact JSON.
    #[arg(long)]
    compact: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or a file cannot be read or written.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            toc_min_level: self.toc_min,
            toc_max_level: self.toc_max,
            skip_mermaid: self.skip_mermaid.then_some(true),
            mmdc: self.mmdc.clone(),
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let levels = TocLevels {
            min: config.convert.toc_min_level,
            max: config.convert.toc_max_level,
        };

        let markdown = std::fs::read_to_string(&self.markdown_file)?;

        let doc = match &self.diagrams_dir {
            Some(dir) if !config.sync_resolved.skip_mermaid => {
                let renderer = MmdcRenderer::new(&config.diagrams.mmdc);
                let (doc, written) = convert_with_diagrams(&markdown, levels, &renderer, dir)?;
                if written > 0 {
                    output.success(&format!(
                        "Wrote {written} diagram(s) to {}",
                        dir.display()
                    ));
                }
                doc
            }
            _ => MarkdownConverter::new()
                .with_toc_levels(levels)
                .convert(&markdown),
        };

        let json = if self.compact {
            doc.to_json()?
        } else {
            doc.to_json_pretty()?
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{json}\n"))?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.result(&json)?,
        }
        Ok(())
    }
}

/// Convert Markdown, rendering Mermaid diagrams into `dir`.
///
/// Diagrams are referenced by their source only, since there is no page to
/// attach the images to. Returns the document and the number of PNGs written.
fn convert_with_diagrams<R: DiagramRenderer + ?Sized>(
    markdown: &str,
    levels: TocLevels,
    renderer: &R,
    dir: &Path,
) -> Result<(AdfDocument, usize), CliError> {
    let extraction = strip_diagram_blocks(markdown, renderer);

    let mut written = 0;
    for block in &extraction.blocks {
        match (block.filename(), block.png()) {
            (Some(filename), Some(png)) => {
                if written == 0 {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(dir.join(filename), png)?;
                written += 1;
            }
            _ => tracing::warn!(
                index = block.index,
                error = block.error().unwrap_or_default(),
                "Diagram not rendered"
            ),
        }
    }

    let doc = MarkdownConverter::new()
        .with_toc_levels(levels)
        .convert(&extraction.markdown);
    let doc = inject_diagram_references(&doc, &extraction.blocks, &AttachmentMap::new());
    Ok((doc, written))
}

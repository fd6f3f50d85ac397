//! md2cf CLI - Markdown to Confluence converter.
//!
//! Provides offline commands over the conversion core:
//! - `convert`: Convert Markdown to ADF JSON
//! - `to-markdown`: Render ADF JSON (or a page payload) as Markdown
//! - `merge`: Merge local Markdown into remote Markdown
//! - `title`: Derive a page title from a document
//! - `url`: Parse a Confluence URL
//! - `config`: Show the resolved configuration

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, ConvertArgs, MergeArgs, TitleArgs, ToMarkdownArgs, UrlArgs};
use output::Output;

/// md2cf - Markdown to Confluence converter.
#[derive(Parser)]
#[command(name = "md2cf", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover md2cf.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Markdown file to ADF JSON.
    Convert(ConvertArgs),
    /// Render an ADF JSON file as Markdown.
    ToMarkdown(ToMarkdownArgs),
    /// Merge local Markdown into remote Markdown.
    Merge(MergeArgs),
    /// Print the page title derived from a document.
    Title(TitleArgs),
    /// Parse a Confluence URL.
    Url(UrlArgs),
    /// Show the resolved configuration.
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Convert(args) => args.execute(config_path),
        Commands::ToMarkdown(args) => args.execute(),
        Commands::Merge(args) => args.execute(config_path),
        Commands::Title(args) => args.execute(),
        Commands::Url(args) => args.execute(),
        Commands::Config(args) => args.execute(config_path),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

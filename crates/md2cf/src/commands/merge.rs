//! `md2cf merge` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use md2cf_config::{CliSettings, Config};
use md2cf_merge::{MergeResult, MergeStrategy, merge_markdown};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the merge command.
#[derive(Args)]
pub(crate) struct MergeArgs {
    /// Local Markdown file (the version being pushed).
    local: PathBuf,

    /// Remote Markdown file (the version currently on the page).
    remote: PathBuf,

    /// Merge strategy (overrides config).
    #[arg(short, long)]
    strategy: Option<MergeStrategy>,

    /// Write the merged Markdown to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl MergeArgs {
    /// Execute the merge command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or a file cannot be read or written.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            strategy: self.strategy,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let strategy = config.sync_resolved.strategy;

        let local = std::fs::read_to_string(&self.local)?;
        let remote = std::fs::read_to_string(&self.remote)?;
        let result = merge_markdown(&local, &remote, strategy);

        match &self.output {
            Some(path) => std::fs::write(path, &result.markdown)?,
            None => output.result(&result.markdown)?,
        }

        let summary = summary_line(strategy, &result);
        if result.has_conflicts {
            output.warning(&format!("{summary} (conflicts resolved in favour of local)"));
        } else {
            output.success(&summary);
        }
        Ok(())
    }
}

fn summary_line(strategy: MergeStrategy, result: &MergeResult) -> String {
    let stats = result.stats;
    format!(
        "Merged with {strategy}: +{} -{} ~{}",
        stats.added, stats.removed, stats.unchanged
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_summary_line() {
        let result = merge_markdown("a\nb\nc", "a\nx\nc", MergeStrategy::AutoMerge);
        assert_eq!(
            summary_line(MergeStrategy::AutoMerge, &result),
            "Merged with auto-merge: +1 -1 ~2"
        );
    }
}

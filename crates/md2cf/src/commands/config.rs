//! `md2cf config` command implementation.

use std::path::Path;

use clap::Args;
use md2cf_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the config command.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Fail if the `[confluence]` section is missing or invalid.
    #[arg(long)]
    check: bool,
}

impl ConfigArgs {
    /// Execute the config command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded, or with `--check` if
    /// the Confluence credentials are missing or invalid.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(config_path, None)?;

        for (label, value) in describe(&config) {
            output.field(label, &value);
        }

        match config.require_confluence() {
            Ok(_) => output.success("Confluence credentials configured"),
            Err(err) if self.check => return Err(err.into()),
            Err(err) => output.warning(&err.to_string()),
        }
        Ok(())
    }
}

/// Labelled values for the resolved configuration.
fn describe(config: &Config) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        (
            "File",
            config
                .config_path
                .as_ref()
                .map_or_else(|| "(defaults)".to_owned(), |p| p.display().to_string()),
        ),
        (
            "TOC",
            format!(
                "H{}-H{}",
                config.convert.toc_min_level, config.convert.toc_max_level
            ),
        ),
        ("Strategy", config.sync_resolved.strategy.to_string()),
        ("Mermaid", mermaid_status(config)),
    ];
    if let Some(confluence) = &config.confluence {
        fields.push(("URL", confluence.base_url.clone()));
        fields.push(("Email", confluence.email.clone()));
        fields.push(("Token", confluence.masked_token()));
    }
    fields
}

fn mermaid_status(config: &Config) -> String {
    if config.sync_resolved.skip_mermaid {
        "skipped".to_owned()
    } else {
        format!("rendered with {}", config.diagrams.mmdc)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_describe_defaults() {
        let config = Config::default();
        let fields = describe(&config);
        assert_eq!(
            fields,
            vec![
                ("File", "(defaults)".to_owned()),
                ("TOC", "H1-H2".to_owned()),
                ("Strategy", "auto-merge".to_owned()),
                ("Mermaid", "rendered with mmdc".to_owned()),
            ]
        );
    }

    #[test]
    fn test_describe_masks_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("md2cf.toml");
        std::fs::write(
            &path,
            r#"
[confluence]
base_url = "https://acme.atlassian.net"
email = "dev@acme.io"
token = "abcd1234efgh5678"

[sync]
skip_mermaid = true
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();
        let fields = describe(&config);

        assert!(fields.contains(&("Token", "abcd****5678".to_owned())));
        assert!(fields.contains(&("Mermaid", "skipped".to_owned())));
        assert!(fields.iter().all(|(_, v)| !v.contains("1234efgh")));
    }
}

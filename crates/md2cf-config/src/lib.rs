//! Configuration management for md2cf.
//!
//! Parses `md2cf.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.email`
//! - `confluence.token`
//! - `sync.strategy`
//! - `diagrams.mmdc`

mod expand;

use std::path::{Path, PathBuf};

use md2cf_merge::MergeStrategy;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override shallowest heading level listed by the TOC macro.
    pub toc_min_level: Option<u8>,
    /// Override deepest heading level listed by the TOC macro.
    pub toc_max_level: Option<u8>,
    /// Override merge strategy.
    pub strategy: Option<MergeStrategy>,
    /// Override diagram skipping.
    pub skip_mermaid: Option<bool>,
    /// Override the Mermaid CLI executable.
    pub mmdc: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "md2cf.toml";

/// Deepest heading level ADF supports.
const MAX_HEADING_LEVEL: u8 = 6;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection (optional section, validated on demand).
    pub confluence: Option<ConfluenceConfig>,
    /// Markdown conversion settings.
    pub convert: ConvertConfig,
    /// Sync settings as parsed from TOML.
    sync: SyncConfigRaw,
    /// Diagram rendering settings.
    pub diagrams: DiagramsConfig,

    /// Resolved sync configuration (set after loading).
    #[serde(skip)]
    pub sync_resolved: SyncConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Confluence Cloud connection settings.
#[derive(Debug, Deserialize)]
pub struct ConfluenceConfig {
    /// Site base URL (e.g. `https://example.atlassian.net`).
    pub base_url: String,
    /// Account email used for API token authentication.
    pub email: String,
    /// API token.
    pub token: String,
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.email, "confluence.email")?;
        require_non_empty(&self.token, "confluence.token")?;
        Ok(())
    }

    /// Token with everything but the first and last four characters hidden.
    ///
    /// Tokens of eight characters or fewer are hidden entirely.
    #[must_use]
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() <= 8 {
            return "****".to_owned();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
    }
}

/// Markdown conversion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Shallowest heading level listed by the TOC macro.
    pub toc_min_level: u8,
    /// Deepest heading level listed by the TOC macro.
    pub toc_max_level: u8,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            toc_min_level: 1,
            toc_max_level: 2,
        }
    }
}

/// Raw sync configuration as parsed from TOML (strategy as a string).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SyncConfigRaw {
    strategy: Option<String>,
    skip_mermaid: Option<bool>,
}

/// Resolved sync configuration.
#[derive(Debug, Default)]
pub struct SyncConfig {
    /// Strategy for merging into existing pages.
    pub strategy: MergeStrategy,
    /// Whether Mermaid diagrams are left as plain code blocks.
    pub skip_mermaid: bool,
}

/// Diagram rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Mermaid CLI executable name or path.
    pub mmdc: String,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            mmdc: "mmdc".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `md2cf.toml` in the current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated again
    /// afterwards so overrides cannot produce an inconsistent TOC range.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(level) = settings.toc_min_level {
            self.convert.toc_min_level = level;
        }
        if let Some(level) = settings.toc_max_level {
            self.convert.toc_max_level = level;
        }
        if let Some(strategy) = settings.strategy {
            self.sync_resolved.strategy = strategy;
        }
        if let Some(skip_mermaid) = settings.skip_mermaid {
            self.sync_resolved.skip_mermaid = skip_mermaid;
        }
        if let Some(mmdc) = &settings.mmdc {
            self.diagrams.mmdc = mmdc.display().to_string();
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        let conf = self.confluence.as_ref().ok_or_else(|| {
            ConfigError::Validation("[confluence] section required in config".into())
        })?;
        conf.validate()?;
        Ok(conf)
    }

    /// Search for a config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.exists())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.resolve_sync()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[confluence]` section is only validated by
    /// [`Config::require_confluence`], since offline commands never need it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_convert()?;
        require_non_empty(&self.diagrams.mmdc, "diagrams.mmdc")?;
        Ok(())
    }

    fn validate_convert(&self) -> Result<(), ConfigError> {
        let ConvertConfig {
            toc_min_level: min,
            toc_max_level: max,
        } = self.convert;

        for (level, field) in [(min, "convert.toc_min_level"), (max, "convert.toc_max_level")] {
            if !(1..=MAX_HEADING_LEVEL).contains(&level) {
                return Err(ConfigError::Validation(format!(
                    "{field} must be between 1 and {MAX_HEADING_LEVEL}"
                )));
            }
        }
        if min > max {
            return Err(ConfigError::Validation(format!(
                "convert.toc_min_level ({min}) cannot exceed convert.toc_max_level ({max})"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut confluence) = self.confluence {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
            confluence.email = expand::expand_env(&confluence.email, "confluence.email")?;
            confluence.token = expand::expand_env(&confluence.token, "confluence.token")?;
        }

        if let Some(ref strategy) = self.sync.strategy {
            self.sync.strategy = Some(expand::expand_env(strategy, "sync.strategy")?);
        }

        self.diagrams.mmdc = expand::expand_env(&self.diagrams.mmdc, "diagrams.mmdc")?;

        Ok(())
    }

    /// Resolve the raw `[sync]` section, rejecting unknown strategy names.
    fn resolve_sync(&mut self) -> Result<(), ConfigError> {
        let strategy = match self.sync.strategy.as_deref() {
            Some(name) => name
                .parse()
                .map_err(|e| ConfigError::Validation(format!("sync.strategy: {e}")))?,
            None => MergeStrategy::default(),
        };

        self.sync_resolved = SyncConfig {
            strategy,
            skip_mermaid: self.sync.skip_mermaid.unwrap_or(false),
        };
        Ok(())
    }
}

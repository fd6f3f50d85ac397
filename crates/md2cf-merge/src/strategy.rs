//! Merge strategy selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MergeError;

/// How local and remote Markdown are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Keep the local document.
    LocalWins,
    /// Keep the remote document.
    RemoteWins,
    /// Remote, a horizontal rule, then local.
    Append,
    /// Line-level merge favoring local edits, flagging conflicting hunks.
    #[default]
    AutoMerge,
}

impl MergeStrategy {
    /// All strategies, in documentation order.
    pub const ALL: [Self; 4] = [
        Self::LocalWins,
        Self::RemoteWins,
        Self::Append,
        Self::AutoMerge,
    ];

    /// Strategy name as used in configuration and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalWins => "local-wins",
            Self::RemoteWins => "remote-wins",
            Self::Append => "append",
            Self::AutoMerge => "auto-merge",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| MergeError::UnknownStrategy(s.to_owned()))
    }
}

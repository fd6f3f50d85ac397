//! CLI command implementations.

mod config;
mod convert;
mod merge;
mod title;
mod to_markdown;
mod url;

pub(crate) use config::ConfigArgs;
pub(crate) use convert::ConvertArgs;
pub(crate) use merge::MergeArgs;
pub(crate) use title::TitleArgs;
pub(crate) use to_markdown::ToMarkdownArgs;
pub(crate) use url::UrlArgs;

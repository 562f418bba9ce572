//! Structured output for command results.

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serializes data to the selected format.
pub fn render<T: Serialize>(data: &T, format: Format) -> Result<String, OutputError> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(data)?),
        Format::Yaml => Ok(serde_yaml::to_string(data)?.trim_end().to_string()),
    }
}

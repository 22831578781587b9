//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::schema::ContinuationsConfig;
use super::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for the schema.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Syntactically valid but semantically broken.
    #[error("validation failed: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ContinuationsConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<ContinuationsConfig, ConfigError> {
    let config: ContinuationsConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

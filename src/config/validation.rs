//! Semantic configuration checks, run after deserialization.

use thiserror::Error;

use super::schema::ContinuationsConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Header name is empty or contains non-token characters.
    #[error("correlation.header_name must be a non-empty ASCII header token")]
    InvalidHeaderName,

    /// Timeout of zero would fail every request.
    #[error("transport.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validate semantic constraints. Collects every failure rather than
/// stopping at the first.
pub fn validate_config(config: &ContinuationsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_header_token(&config.correlation.header_name) {
        errors.push(ValidationError::InvalidHeaderName);
    }
    if config.transport.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_header_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

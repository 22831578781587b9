//! Correlation ID generation.
//!
//! # Responsibilities
//! - Produce a fresh, process-unique identifier per outgoing request
//! - Define the default transport header the ID travels under
//!
//! # Design Decisions
//! - UUID v4: collision probability is negligible for in-flight requests
//! - Generation is infallible and safe to call from any task
//! - IDs are opaque; nothing in the pipeline parses them back

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default header name the correlation ID is attached under and read
/// back from on the response.
pub const X_CORRELATION_ID: &str = "X-Correlation-Id";

/// Opaque token linking one outgoing request to its eventual response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// View the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates correlation IDs. Stateless; cheap to clone and share.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationIdGenerator;

impl CorrelationIdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self
    }

    /// Allocate a fresh correlation ID. Never fails.
    pub fn next(&self) -> CorrelationId {
        CorrelationId(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let generator = CorrelationIdGenerator::new();
        let ids: HashSet<_> = (0..1000).map(|_| generator.next()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    let generator = CorrelationIdGenerator::new();
                    (0..250).map(|_| generator.next()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id), "duplicate correlation ID generated");
            }
        }
        assert_eq!(all.len(), 2000);
    }

    #[test]
    fn test_display_matches_as_str() {
        let id = CorrelationIdGenerator::new().next();
        assert_eq!(id.to_string(), id.as_str());
    }
}

//! correlation.rs - Short identifiers that stitch related log lines together.
//!
//! License: MIT OR Apache-2.0

use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a correlation id in characters.
///
/// Eight characters of a 62-symbol alphabet give ~2.2e14 combinations,
/// which makes collisions negligible across the log volume of one process
/// lifetime.
pub const CORRELATION_ID_LEN: usize = 8;

/// An opaque identifier tagging all log lines that belong to one logical
/// operation. Generated at the start of the operation by the caller and
/// threaded through every log call for it; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generates a fresh id. Stateless and safe to call concurrently.
    pub fn new() -> Self {
        let id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(CORRELATION_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creates a unique correlation id for request tracing.
pub fn new_correlation_id() -> CorrelationId {
    CorrelationId::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_have_expected_shape() {
        let id = new_correlation_id();
        assert_eq!(id.as_str().len(), CORRELATION_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn ten_thousand_ids_are_unique() {
        let ids: HashSet<CorrelationId> = (0..10_000).map(|_| new_correlation_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn display_matches_as_str() {
        let id = new_correlation_id();
        assert_eq!(format!("{id}"), id.as_str());
    }
}

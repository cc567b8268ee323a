//! Combiner configuration.

use serde::{Deserialize, Serialize};

use crate::normalize_endpoint;

/// Endpoint filters for a [`crate::MultiProviderCombiner`].
///
/// Patterns are normalised like endpoints and matched as substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinerConfig {
    /// If non-empty, only endpoints matching one of these are used.
    pub include_endpoints: Vec<String>,
    /// Endpoints matching any of these are never used.
    pub exclude_endpoints: Vec<String>,
}

impl CombinerConfig {
    /// Returns true if a normalised endpoint passes both filters.
    #[must_use]
    pub fn admits(&self, endpoint: &str) -> bool {
        let matches = |pattern: &String| endpoint.contains(&normalize_endpoint(pattern));
        (self.include_endpoints.is_empty() || self.include_endpoints.iter().any(matches))
            && !self.exclude_endpoints.iter().any(matches)
    }
}

//! Orchestrator configuration.

use std::collections::BTreeMap;

use quarry_estimate::DEFAULT_CHUNK_SIZE_BYTES;
use serde::{Deserialize, Serialize};

use crate::AvailabilityMode;

/// Configuration for a [`crate::ProviderOrchestrator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Estimated payload per bulk request before a new chunk is started.
    pub chunk_size_bytes: u64,
    /// Maximum concurrent bulk requests per provider.
    pub concurrency: usize,
    /// Availability modes forced per provider name (lower case).
    ///
    /// `None` forces unreliable availability even if the provider claims
    /// support, for services whose capability descriptions are wrong.
    pub capability_overrides: BTreeMap<String, Option<AvailabilityMode>>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            chunk_size_bytes: DEFAULT_CHUNK_SIZE_BYTES,
            concurrency: 5,
            capability_overrides: BTreeMap::from([("resif".to_string(), None)]),
        }
    }
}

impl OrchestratorConfig {
    /// Returns the override for a provider, if one is configured.
    ///
    /// The outer `Option` tells whether an override exists at all.
    #[must_use]
    pub fn capability_override(&self, provider: &str) -> Option<Option<AvailabilityMode>> {
        self.capability_overrides
            .get(&provider.to_lowercase())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.chunk_size_bytes, 25 * 1024 * 1024);
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.capability_override("RESIF"), Some(None));
        assert_eq!(config.capability_override("IRIS"), None);
    }

    #[test]
    fn test_config_partial_deserialize() {
        let config: OrchestratorConfig = serde_json::from_str(
            r#"{"concurrency": 2, "capability_overrides": {"geofon": "includeavailability"}}"#,
        )
        .unwrap();
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.chunk_size_bytes, 25 * 1024 * 1024);
        assert_eq!(
            config.capability_override("GEOFON"),
            Some(Some(AvailabilityMode::IncludeAvailability))
        );
    }
}

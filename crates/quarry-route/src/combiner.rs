//! Combining several routing providers into one transfer.

use std::collections::btree_map::Entry;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    CombineError, CombinerConfig, Route, RouteError, RouteExecutor, RouteMap, RouteProvider,
    RouteRequest, TransferOptions, normalize_endpoint,
};

/// Routes claimed across all providers, ready for one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRoutes {
    /// Claimed routes keyed by normalised endpoint.
    pub routes: RouteMap,
    /// Options of the last provider that claimed a route.
    pub options: TransferOptions,
}

/// Queries routing providers in order and transfers each endpoint once.
///
/// The first provider to report an endpoint claims it; later providers
/// reporting the same endpoint, under any scheme, are ignored for it.
pub struct MultiProviderCombiner<E> {
    providers: Vec<Arc<dyn RouteProvider>>,
    executor: E,
    config: CombinerConfig,
}

impl<E: std::fmt::Debug> std::fmt::Debug for MultiProviderCombiner<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("MultiProviderCombiner")
            .field("providers", &names)
            .field("executor", &self.executor)
            .field("config", &self.config)
            .finish()
    }
}

impl<E: RouteExecutor> MultiProviderCombiner<E> {
    /// Creates a combiner over `providers`, highest priority first.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn RouteProvider>>, executor: E) -> Self {
        Self {
            providers,
            executor,
            config: CombinerConfig::default(),
        }
    }

    /// Sets the endpoint filters.
    #[must_use]
    pub fn with_config(mut self, config: CombinerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the endpoint filters.
    #[must_use]
    pub const fn config(&self) -> &CombinerConfig {
        &self.config
    }

    /// Returns the executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Resolves and deduplicates routes without transferring anything.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::NoData`] if no provider claimed an endpoint.
    pub async fn resolve(&self, request: &RouteRequest) -> Result<CombinedRoutes, CombineError> {
        let mut routes = RouteMap::new();
        let mut options = None;

        for provider in &self.providers {
            let resolved = match provider.resolve_routes(request).await {
                Ok(resolved) => resolved,
                Err(RouteError::NoData) => {
                    info!(provider = %provider.name(), "No data available from routing provider");
                    continue;
                }
                Err(e) => {
                    error!(provider = %provider.name(), error = %e, "Routing provider failed");
                    continue;
                }
            };

            let mut claimed = 0usize;
            for (endpoint, lines) in resolved.routes {
                let key = normalize_endpoint(&endpoint);
                if !self.config.admits(&key) {
                    debug!(
                        provider = %provider.name(),
                        endpoint = %endpoint,
                        "Endpoint filtered out"
                    );
                    continue;
                }
                match routes.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert(Route {
                            endpoint,
                            provider: provider.name().to_string(),
                            lines,
                        });
                        claimed += 1;
                    }
                    Entry::Occupied(taken) => {
                        debug!(
                            provider = %provider.name(),
                            endpoint = %endpoint,
                            claimed_by = %taken.get().provider,
                            "Endpoint already claimed"
                        );
                    }
                }
            }

            if claimed > 0 {
                info!(provider = %provider.name(), endpoints = claimed, "Claimed endpoints");
                options = Some(resolved.options);
            }
        }

        let Some(options) = options else {
            return Err(CombineError::NoData);
        };
        Ok(CombinedRoutes { routes, options })
    }

    /// Resolves all providers and runs a single transfer over the union.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::NoData`] if nothing was routed, or
    /// [`CombineError::Execute`] if the transfer failed.
    pub async fn run(&self, request: &RouteRequest) -> Result<E::Output, CombineError> {
        let combined = self.resolve(request).await?;
        info!(
            endpoints = combined.routes.len(),
            kind = %combined.options.kind,
            "Starting transfer"
        );
        self.executor
            .execute(&combined.routes, &combined.options)
            .await
            .map_err(CombineError::Execute)
    }
}

//! Routing error types.

use thiserror::Error;

/// Errors reported by a routing provider or transfer executor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No data for the request. Informational.
    #[error("No data available for request")]
    NoData,

    /// The routing service or a data center failed.
    #[error("Service error: {0}")]
    Service(String),
}

impl RouteError {
    /// Returns true for the informational "no data" signal.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Errors from a combined routing run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombineError {
    /// No provider claimed a single endpoint.
    #[error("No data available from any routing provider")]
    NoData,

    /// The single transfer over all claimed routes failed.
    #[error("Transfer failed: {0}")]
    Execute(#[source] RouteError),
}

//! Multi-provider routing for quarry.
//!
//! Several routing services may know about the same data center. This
//! crate merges their answers so that each endpoint is transferred once:
//!
//! - [`RouteProvider`] - Resolves a request to endpoints without transferring
//! - [`RouteExecutor`] - Performs one transfer over a [`RouteMap`]
//! - [`MultiProviderCombiner`] - First-come endpoint claiming across providers
//! - [`normalize_endpoint`] - Scheme-insensitive endpoint identity

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod combiner;
mod config;
mod endpoint;
mod error;
mod route;

pub use combiner::{CombinedRoutes, MultiProviderCombiner};
pub use config::CombinerConfig;
pub use endpoint::normalize_endpoint;
pub use error::{CombineError, RouteError};
pub use route::{
    BulkLine, RequestKind, ResolvedRoutes, Route, RouteExecutor, RouteMap, RouteProvider,
    RouteRequest, TransferOptions,
};

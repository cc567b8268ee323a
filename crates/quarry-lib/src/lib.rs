//! Time-series acquisition orchestration across federated data providers.
//!
//! This is a facade crate that re-exports functionality from the quarry
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use quarry_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let restrictions = Restrictions::new(start, end)?.with_network("XX");
//!     let mut orchestrator = ProviderOrchestrator::new(
//!         Arc::new(my_provider),
//!         Arc::new(restrictions),
//!         Arc::new(GlobalDomain),
//!         Arc::new(DirectoryResolver::with_default_root()),
//!         Arc::new(my_reader),
//!         OrchestratorConfig::default(),
//!     )?;
//!
//!     orchestrator.get_availability().await;
//!     orchestrator.prepare_download()?;
//!     let stats = orchestrator.download().await;
//!     println!("{stats}");
//!
//!     Ok(())
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use quarry_types::*;

// Re-export estimation
pub use quarry_estimate::{
    Chunk, ChunkPlanner, DEFAULT_CHUNK_SIZE_BYTES, PayloadEstimator, SampleRateTable,
};

// Re-export per-provider orchestration
#[cfg(feature = "fetch")]
pub use quarry_fetch::{
    AvailabilityMode, AvailabilitySupport, BulkItem, ChannelInventory, DataAvailability,
    DataProvider, DownloadStats, Inventory, InventoryQuery, NetworkInventory, OrchestratorConfig,
    PriorityError, PriorityList, ProviderError, ProviderOrchestrator, StationInventory,
    TraceHeader, TraceReadError, TraceReader, qc,
};

// Re-export routing
#[cfg(feature = "route")]
pub use quarry_route::{
    BulkLine, CombineError, CombinedRoutes, CombinerConfig, MultiProviderCombiner, RequestKind,
    ResolvedRoutes, Route, RouteError, RouteExecutor, RouteMap, RouteProvider, RouteRequest,
    TransferOptions, normalize_endpoint,
};

/// Prelude module for convenient imports.
///
/// ```
/// use quarry_lib::prelude::*;
/// ```
pub mod prelude {
    pub use quarry_types::{
        CircularDomain, DirectoryResolver, Domain, GlobalDomain, PathResolver, RectangularDomain,
        Restrictions, Station, Status, StoragePath, StreamId,
    };

    #[cfg(feature = "fetch")]
    pub use quarry_fetch::{
        DataProvider, DownloadStats, OrchestratorConfig, ProviderError, ProviderOrchestrator,
        TraceHeader, TraceReader,
    };

    #[cfg(feature = "route")]
    pub use quarry_route::{
        CombineError, MultiProviderCombiner, RouteExecutor, RouteProvider, RouteRequest,
    };
}

//! Per-provider availability discovery and download for quarry.
//!
//! This crate drives a single data provider through a request:
//!
//! - [`DataProvider`] - Inventory and bulk fetch seam implemented by transports
//! - [`TraceReader`] - Header reader used to check downloaded artifacts
//! - [`PriorityList`] - Wildcard tiers selecting the best channels and locations
//! - [`ProviderOrchestrator`] - Availability, preparation, chunked download and QC
//! - [`OrchestratorConfig`] - Chunk size, concurrency and capability overrides
//! - [`DownloadStats`] - Summary of a download run

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod download;
mod orchestrator;
mod priority;
mod provider;
pub mod qc;
mod reader;

pub use config::OrchestratorConfig;
pub use download::DownloadStats;
pub use orchestrator::ProviderOrchestrator;
pub use priority::{PriorityError, PriorityList};
pub use provider::{
    AvailabilityMode, AvailabilitySupport, BulkItem, ChannelInventory, DataAvailability,
    DataProvider, Inventory, InventoryQuery, NetworkInventory, ProviderError, StationInventory,
};
pub use reader::{TraceHeader, TraceReadError, TraceReader};

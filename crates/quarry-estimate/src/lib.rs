//! Payload size estimation and transfer chunk planning for quarry.
//!
//! Data providers serve bulk requests far better than one request per
//! stream, but very large bulk requests time out. This crate sizes bulk
//! requests:
//!
//! - [`SampleRateTable`] - Nominal sample rate per channel band code
//! - [`PayloadEstimator`] - Estimated transfer size of a stream over a window
//! - [`ChunkPlanner`] - Groups work items into size-bounded [`Chunk`]s

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod chunk;
mod data;
mod estimator;

pub use chunk::{Chunk, ChunkPlanner, DEFAULT_CHUNK_SIZE_BYTES};
pub use data::SampleRateTable;
pub use estimator::PayloadEstimator;

//! Chunked, concurrent bulk downloads.

use std::path::PathBuf;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use quarry_estimate::{Chunk, ChunkPlanner, PayloadEstimator};
use quarry_types::ChannelKey;
use tracing::{error, info};

use crate::{BulkItem, DataProvider, ProviderError};

/// Summary of one download run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    /// Bytes of artifacts that passed quality control.
    pub downloaded_bytes: u64,
    /// Bytes that were transferred but deleted afterwards.
    pub discarded_bytes: u64,
    /// Wall time of the bulk transfers, excluding quality control.
    pub elapsed: Duration,
    /// Number of bulk requests issued.
    pub chunks: usize,
    /// Bulk requests that failed with a service error.
    pub failed_chunks: usize,
    /// Bulk requests answered with "no data".
    pub no_data_chunks: usize,
}

impl DownloadStats {
    /// Returns the total number of transferred bytes.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.downloaded_bytes + self.discarded_bytes
    }
}

impl std::fmt::Display for DownloadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in {} ({}), {} discarded, {} chunks ({} failed, {} without data)",
            PayloadEstimator::format_bytes(self.downloaded_bytes),
            PayloadEstimator::format_duration(self.elapsed),
            PayloadEstimator::format_throughput(self.total_bytes(), self.elapsed),
            PayloadEstimator::format_bytes(self.discarded_bytes),
            self.chunks,
            self.failed_chunks,
            self.no_data_chunks,
        )
    }
}

/// Locates one interval inside an orchestrator's station map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct IntervalKey {
    pub(crate) station: (String, String),
    pub(crate) channel: ChannelKey,
    pub(crate) index: usize,
}

/// A single interval to download.
#[derive(Debug, Clone)]
pub(crate) struct WorkItem {
    pub(crate) key: IntervalKey,
    pub(crate) item: BulkItem,
}

/// How a bulk request ended.
#[derive(Debug)]
pub(crate) enum ChunkOutcome {
    Fetched(Vec<PathBuf>),
    NoData,
    Failed,
}

/// Worker-local result of one bulk request, merged after all workers join.
#[derive(Debug)]
pub(crate) struct ChunkReport {
    pub(crate) keys: Vec<IntervalKey>,
    pub(crate) outcome: ChunkOutcome,
}

/// Groups work items into bulk requests of bounded estimated size.
pub(crate) fn plan_chunks(items: Vec<WorkItem>, threshold_bytes: u64) -> Vec<Chunk<WorkItem>> {
    let estimator = PayloadEstimator::new();
    let planner = ChunkPlanner::new(threshold_bytes);
    planner.plan(items.into_iter().map(|work| {
        let seconds = (work.item.end - work.item.start).num_milliseconds() as f64 / 1000.0;
        let bytes = estimator.estimate_bytes(&work.item.stream.channel, seconds);
        (work, bytes)
    }))
}

/// Runs all chunks with at most `concurrency` requests in flight.
///
/// A failing chunk never aborts its siblings.
pub(crate) async fn fetch_chunks(
    provider: &dyn DataProvider,
    chunks: Vec<Chunk<WorkItem>>,
    concurrency: usize,
) -> Vec<ChunkReport> {
    let workers = concurrency.clamp(1, chunks.len().max(1));

    stream::iter(chunks)
        .map(|chunk| fetch_chunk(provider, chunk))
        .buffer_unordered(workers)
        .collect()
        .await
}

async fn fetch_chunk(provider: &dyn DataProvider, chunk: Chunk<WorkItem>) -> ChunkReport {
    let (keys, items): (Vec<_>, Vec<_>) = chunk
        .items
        .into_iter()
        .map(|work| (work.key, work.item))
        .unzip();

    let outcome = match provider.fetch_bulk(&items).await {
        Ok(artifacts) => ChunkOutcome::Fetched(artifacts),
        Err(ProviderError::NoDataAvailable) => {
            info!(
                provider = %provider.name(),
                items = items.len(),
                "No data available for bulk request"
            );
            ChunkOutcome::NoData
        }
        Err(e) => {
            error!(
                provider = %provider.name(),
                items = items.len(),
                error = %e,
                "Bulk request failed"
            );
            ChunkOutcome::Failed
        }
    };

    ChunkReport { keys, outcome }
}

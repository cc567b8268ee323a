//! Per-provider availability discovery and download.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use quarry_estimate::PayloadEstimator;
use quarry_types::{
    Channel, Domain, IntervalError, PathResolver, PrepareError, Restrictions, Station, Status,
    TimeInterval,
};
use tracing::{debug, error, info, warn};

use crate::download::{self, ChunkOutcome, IntervalKey, WorkItem};
use crate::qc::{self, QualityCriteria};
use crate::{
    AvailabilityMode, BulkItem, ChannelInventory, DataProvider, DownloadStats, InventoryQuery,
    OrchestratorConfig, PriorityError, PriorityList, ProviderError, TraceReader,
};

/// Drives one data provider through availability, preparation and download.
///
/// The orchestrator exclusively owns its stations. Every phase takes
/// `&mut self`; only the bulk requests themselves run concurrently.
pub struct ProviderOrchestrator {
    provider: Arc<dyn DataProvider>,
    restrictions: Arc<Restrictions>,
    domain: Arc<dyn Domain>,
    resolver: Arc<dyn PathResolver>,
    reader: Arc<dyn TraceReader>,
    config: OrchestratorConfig,
    channel_priorities: PriorityList,
    location_priorities: PriorityList,
    stations: BTreeMap<(String, String), Station>,
    availability_reliable: Option<bool>,
}

impl std::fmt::Debug for ProviderOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderOrchestrator")
            .field("provider", &self.provider.name())
            .field("restrictions", &self.restrictions)
            .field("domain", &self.domain)
            .field("config", &self.config)
            .field("stations", &self.stations.len())
            .field("availability_reliable", &self.availability_reliable)
            .finish_non_exhaustive()
    }
}

impl ProviderOrchestrator {
    /// Creates an orchestrator for one provider and one request.
    ///
    /// # Errors
    ///
    /// Returns an error if a channel or location priority pattern is invalid.
    pub fn new(
        provider: Arc<dyn DataProvider>,
        restrictions: Arc<Restrictions>,
        domain: Arc<dyn Domain>,
        resolver: Arc<dyn PathResolver>,
        reader: Arc<dyn TraceReader>,
        config: OrchestratorConfig,
    ) -> Result<Self, PriorityError> {
        let channel_priorities = PriorityList::new(&restrictions.channel_priorities)?;
        let location_priorities = PriorityList::new(&restrictions.location_priorities)?;
        Ok(Self {
            provider,
            restrictions,
            domain,
            resolver,
            reader,
            config,
            channel_priorities,
            location_priorities,
            stations: BTreeMap::new(),
            availability_reliable: None,
        })
    }

    /// Returns the provider name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.provider.name()
    }

    /// Returns the provider.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn DataProvider> {
        &self.provider
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Returns whether the last availability query was reliable, `None`
    /// before the first query.
    #[must_use]
    pub const fn availability_reliable(&self) -> Option<bool> {
        self.availability_reliable
    }

    /// Returns the stations in (network, station) order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Returns a station by network and station code.
    #[must_use]
    pub fn station(&self, network: &str, station: &str) -> Option<&Station> {
        self.stations.get(&(network.to_string(), station.to_string()))
    }

    /// Returns the number of stations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if no station is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Removes the given (network, station) ids, returning how many were
    /// present.
    pub fn discard_stations<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        ids.into_iter()
            .filter(|id| self.stations.remove(id).is_some())
            .count()
    }

    /// Tallies intervals per status.
    #[must_use]
    pub fn status_counts(&self) -> BTreeMap<Status, usize> {
        let mut counts = BTreeMap::new();
        let intervals = self
            .stations
            .values()
            .flat_map(|s| s.channels())
            .flat_map(|c| c.intervals());
        for interval in intervals {
            *counts.entry(interval.status()).or_insert(0) += 1;
        }
        counts
    }

    fn status_summary(&self) -> String {
        let counts = self.status_counts();
        if counts.is_empty() {
            return "no intervals".to_string();
        }
        counts
            .iter()
            .map(|(status, count)| format!("{status}={count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn availability_mode(&self) -> Option<AvailabilityMode> {
        self.config
            .capability_override(self.provider.name())
            .unwrap_or_else(|| self.provider.availability_support().preferred())
    }

    /// Queries the provider inventory and builds the station map.
    ///
    /// Replaces any previously discovered stations and returns how many
    /// remain after filtering. Provider failures are logged and yield zero
    /// stations.
    pub async fn get_availability(&mut self) -> usize {
        let mode = self.availability_mode();
        self.availability_reliable = Some(mode.is_some());
        self.stations.clear();

        let name = self.provider.name().to_string();
        match mode {
            Some(mode) => {
                info!(provider = %name, mode = %mode, "Requesting reliable availability");
            }
            None => {
                info!(provider = %name, "Requesting unreliable availability");
            }
        }

        let template = match self.template_intervals() {
            Ok(template) => template,
            Err(e) => {
                error!(provider = %name, error = %e, "Invalid request intervals");
                return 0;
            }
        };

        let query = InventoryQuery {
            network: self.restrictions.network.clone(),
            station: self.restrictions.station.clone(),
            location: self.restrictions.location.clone(),
            channel: self.restrictions.channel.clone(),
            start: self.restrictions.start(),
            end: self.restrictions.end(),
            domain: self.domain.query_parameters(),
            availability: mode,
        };

        let started = Instant::now();
        let inventory = match self.provider.query_inventory(&query).await {
            Ok(inventory) => inventory,
            Err(ProviderError::NoDataAvailable) => {
                info!(provider = %name, "No data available for request");
                return 0;
            }
            Err(e) => {
                error!(provider = %name, error = %e, "Failed to get availability");
                return 0;
            }
        };
        let latency = started.elapsed();

        // Several station epochs may share one (network, station) id.
        let mut candidates: BTreeMap<(String, String), (f64, f64, Vec<ChannelInventory>)> =
            BTreeMap::new();
        for network in inventory.networks {
            for station in network.stations {
                if self.domain.contains(station.latitude, station.longitude) == Some(false) {
                    continue;
                }
                let id = (network.code.clone(), station.code);
                let usable: Vec<_> = station
                    .channels
                    .into_iter()
                    .filter(|c| self.is_channel_usable(&id, c, mode))
                    .collect();
                candidates
                    .entry(id)
                    .or_insert_with(|| (station.latitude, station.longitude, Vec::new()))
                    .2
                    .extend(usable);
            }
        }

        for ((network, code), (latitude, longitude, channels)) in candidates {
            let channels: Vec<Channel> = self
                .select_channels(channels)
                .into_iter()
                .filter_map(|c| {
                    Channel::new(c.location, c.code, template.clone())
                        .inspect_err(|e| warn!(provider = %name, error = %e, "Skipping channel"))
                        .ok()
                })
                .collect();
            if channels.is_empty() {
                continue;
            }
            let station = Station::new(network, code, latitude, longitude, channels);
            self.stations.insert(station.id(), station);
        }

        let channel_count: usize = self.stations.values().map(Station::channel_count).sum();
        info!(
            provider = %name,
            stations = self.stations.len(),
            channels = channel_count,
            latency = %PayloadEstimator::format_duration(latency),
            "Found {} stations with {} channels",
            self.stations.len(),
            channel_count,
        );

        self.stations.len()
    }

    /// Fresh intervals for each channel, one per request sub-window.
    fn template_intervals(&self) -> Result<Vec<TimeInterval>, IntervalError> {
        self.restrictions
            .intervals()
            .into_iter()
            .map(|(start, end)| TimeInterval::new(start, end))
            .collect()
    }

    fn is_channel_usable(
        &self,
        id: &(String, String),
        channel: &ChannelInventory,
        mode: Option<AvailabilityMode>,
    ) -> bool {
        let (start, end) = (self.restrictions.start(), self.restrictions.end());
        if !channel.covers(start, end) {
            return false;
        }
        if mode != Some(AvailabilityMode::IncludeAvailability) {
            return true;
        }
        match channel.availability {
            Some(availability) => availability.covers(start, end),
            None => {
                warn!(
                    provider = %self.provider.name(),
                    channel = %format!("{}.{}.{}.{}", id.0, id.1, channel.location, channel.code),
                    "Provider did not return availability for channel, skipping"
                );
                false
            }
        }
    }

    /// Applies channel priorities per location, then location priorities.
    fn select_channels(&self, channels: Vec<ChannelInventory>) -> Vec<ChannelInventory> {
        let mut by_location: BTreeMap<String, Vec<ChannelInventory>> = BTreeMap::new();
        for channel in channels {
            by_location
                .entry(channel.location.clone())
                .or_default()
                .push(channel);
        }

        let selected: Vec<_> = by_location
            .into_values()
            .flat_map(|group| self.channel_priorities.filter(group, |c| c.code.as_str()))
            .collect();
        self.location_priorities
            .filter(selected, |c| c.location.as_str())
    }

    /// Assigns destinations and planning statuses to every interval.
    ///
    /// # Errors
    ///
    /// Returns an error if a destination directory cannot be created.
    pub fn prepare_download(&mut self) -> Result<(), PrepareError> {
        for station in self.stations.values_mut() {
            station.prepare_download(self.resolver.as_ref())?;
        }
        info!(
            provider = %self.provider.name(),
            status = %self.status_summary(),
            "Prepared download"
        );
        Ok(())
    }

    /// Downloads all pending intervals with the configured chunk size and
    /// concurrency.
    pub async fn download(&mut self) -> DownloadStats {
        let (chunk_size_bytes, concurrency) =
            (self.config.chunk_size_bytes, self.config.concurrency);
        self.download_with(chunk_size_bytes, concurrency).await
    }

    /// Downloads all [`Status::NeedsDownloading`] intervals.
    ///
    /// Intervals are grouped into bulk requests of at most
    /// `chunk_size_bytes` estimated payload, with up to `concurrency`
    /// requests in flight. Every artifact is then checked and each pending
    /// interval ends as downloaded, failed or rejected.
    pub async fn download_with(
        &mut self,
        chunk_size_bytes: u64,
        concurrency: usize,
    ) -> DownloadStats {
        let name = self.provider.name().to_string();
        info!(provider = %name, status = %self.status_summary(), "Status before downloading");

        let chunks = download::plan_chunks(self.work_items(), chunk_size_bytes);
        let mut stats = DownloadStats {
            chunks: chunks.len(),
            ..DownloadStats::default()
        };
        if !chunks.is_empty() {
            info!(
                provider = %name,
                chunks = chunks.len(),
                concurrency,
                "Downloading in {} bulk requests",
                chunks.len()
            );
        }

        let started = Instant::now();
        let reports = download::fetch_chunks(self.provider.as_ref(), chunks, concurrency).await;
        stats.elapsed = started.elapsed();

        let mut failed = HashSet::new();
        for report in reports {
            match report.outcome {
                ChunkOutcome::Fetched(artifacts) => {
                    debug!(provider = %name, artifacts = artifacts.len(), "Bulk request finished");
                }
                ChunkOutcome::NoData => {
                    stats.no_data_chunks += 1;
                    failed.extend(report.keys);
                }
                ChunkOutcome::Failed => {
                    stats.failed_chunks += 1;
                    failed.extend(report.keys);
                }
            }
        }

        self.check_downloads(&failed, &mut stats);

        info!(
            provider = %name,
            downloaded = %PayloadEstimator::format_bytes(stats.downloaded_bytes),
            discarded = %PayloadEstimator::format_bytes(stats.discarded_bytes),
            throughput = %PayloadEstimator::format_throughput(stats.total_bytes(), stats.elapsed),
            "Downloaded {}",
            stats
        );
        info!(provider = %name, status = %self.status_summary(), "Status after downloading");

        stats
    }

    fn work_items(&self) -> Vec<WorkItem> {
        let mut items = Vec::new();
        for (station_id, station) in &self.stations {
            for channel in station.channels() {
                let stream = channel.stream_id(&station.network, &station.station);
                for (index, interval) in channel.intervals().iter().enumerate() {
                    if interval.status() != Status::NeedsDownloading {
                        continue;
                    }
                    let Some(path) = interval.path() else {
                        warn!(
                            provider = %self.provider.name(),
                            interval = %interval,
                            stream = %stream,
                            "Interval has no destination, it will not be downloaded"
                        );
                        continue;
                    };
                    items.push(WorkItem {
                        key: IntervalKey {
                            station: station_id.clone(),
                            channel: (channel.location().to_string(), channel.code().to_string()),
                            index,
                        },
                        item: BulkItem {
                            stream: stream.clone(),
                            start: interval.start(),
                            end: interval.end(),
                            path: path.to_path_buf(),
                        },
                    });
                }
            }
        }
        items
    }

    /// Settles every pending interval after all bulk requests have joined.
    fn check_downloads(&mut self, failed: &HashSet<IntervalKey>, stats: &mut DownloadStats) {
        let criteria = QualityCriteria::from_restrictions(&self.restrictions);
        let reader = self.reader.as_ref();

        for (station_id, station) in &mut self.stations {
            for channel in station.channels_mut() {
                let channel_key = (channel.location().to_string(), channel.code().to_string());
                for (index, interval) in channel.intervals_mut().iter_mut().enumerate() {
                    if interval.status() != Status::NeedsDownloading {
                        continue;
                    }
                    let key = IntervalKey {
                        station: station_id.clone(),
                        channel: channel_key.clone(),
                        index,
                    };

                    let outcome = match interval.path() {
                        None => Status::DownloadFailed,
                        // Partial output of a failed request is never trusted.
                        Some(path) if failed.contains(&key) => {
                            stats.discarded_bytes += qc::remove_artifact(path);
                            Status::DownloadFailed
                        }
                        Some(path) => {
                            let verdict = qc::inspect_artifact(
                                path,
                                interval.duration_seconds(),
                                criteria,
                                reader,
                            );
                            stats.downloaded_bytes += verdict.downloaded_bytes;
                            stats.discarded_bytes += verdict.discarded_bytes;
                            verdict.status
                        }
                    };

                    if let Err(e) = interval.finish(outcome) {
                        error!(error = %e, "Failed to record download outcome");
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for ProviderOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let availability = match self.availability_reliable {
            Some(true) => "reliable",
            Some(false) => "unreliable",
            None => "not yet queried",
        };
        let channels: usize = self.stations.values().map(Station::channel_count).sum();
        let intervals: usize = self.stations.values().map(Station::interval_count).sum();
        write!(
            f,
            "Orchestrator for '{}' ({}): availability {}, \
             {} stations, {} channels, {} time intervals",
            self.provider.name(),
            self.provider.base_url(),
            availability,
            self.stations.len(),
            channels,
            intervals,
        )?;
        for (status, count) in self.status_counts() {
            write!(f, "\n\t{status}: {count}")?;
        }
        Ok(())
    }
}

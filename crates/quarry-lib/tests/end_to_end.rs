//! End-to-end scenarios across routing and per-provider download.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use quarry_lib::*;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap()
}

struct RoutingService {
    name: &'static str,
    routes: std::result::Result<Vec<&'static str>, RouteError>,
}

fn routing_service(
    name: &'static str,
    routes: std::result::Result<Vec<&'static str>, RouteError>,
) -> Arc<dyn RouteProvider> {
    Arc::new(RoutingService { name, routes })
}

#[async_trait]
impl RouteProvider for RoutingService {
    fn name(&self) -> &str {
        self.name
    }

    async fn resolve_routes(
        &self,
        request: &RouteRequest,
    ) -> std::result::Result<ResolvedRoutes, RouteError> {
        let endpoints = self.routes.clone()?;
        Ok(ResolvedRoutes {
            routes: endpoints
                .into_iter()
                .map(|e| (e.to_string(), request.lines.clone()))
                .collect(),
            options: TransferOptions {
                kind: request.kind,
                ..TransferOptions::default()
            },
        })
    }
}

#[derive(Debug, Default)]
struct BulkTransfer {
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl RouteExecutor for BulkTransfer {
    type Output = usize;

    async fn execute(
        &self,
        routes: &RouteMap,
        _options: &TransferOptions,
    ) -> std::result::Result<usize, RouteError> {
        let mut calls = self.calls.lock().unwrap();
        for (endpoint, route) in routes {
            calls.push((endpoint.clone(), route.bulk_body()));
        }
        Ok(routes.len())
    }
}

#[tokio::test]
async fn test_combined_run_transfers_once() {
    init_tracing();

    let request = RouteRequest::waveforms(vec![BulkLine::new(
        StreamId::new("XX", "YY0", "*", "*"),
        start(),
        end(),
    )]);
    let combiner = MultiProviderCombiner::new(
        vec![
            routing_service("A", Err(RouteError::NoData)),
            routing_service("B", Ok(vec!["http://dc1/fdsnws"])),
        ],
        BulkTransfer::default(),
    );

    assert_eq!(combiner.run(&request).await, Ok(1));

    let calls = combiner.executor().calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "dc1/fdsnws");
    assert!(calls[0].1.starts_with("XX YY0 * * 2024-01-01T00:00:00Z"));
}

#[tokio::test]
async fn test_combined_run_without_routes() {
    init_tracing();

    let combiner = MultiProviderCombiner::new(
        vec![
            routing_service("A", Err(RouteError::NoData)),
            routing_service("B", Err(RouteError::NoData)),
        ],
        BulkTransfer::default(),
    );

    let request = RouteRequest::waveforms(Vec::new());
    assert_eq!(combiner.run(&request).await, Err(CombineError::NoData));
    assert!(combiner.executor().calls.lock().unwrap().is_empty());
}

/// A data center holding one hour of XX.YY0 on three channels.
struct DataCenter {
    fetched: Mutex<Vec<usize>>,
}

#[async_trait]
impl DataProvider for DataCenter {
    fn name(&self) -> &str {
        "dc1"
    }

    fn base_url(&self) -> &str {
        "http://dc1/fdsnws"
    }

    fn availability_support(&self) -> AvailabilitySupport {
        AvailabilitySupport {
            match_timeseries: true,
            include_availability: true,
        }
    }

    async fn query_inventory(
        &self,
        query: &InventoryQuery,
    ) -> std::result::Result<Inventory, ProviderError> {
        assert_eq!(query.availability, Some(AvailabilityMode::MatchTimeSeries));
        let channel = |code: &str| ChannelInventory {
            location: String::new(),
            code: code.to_string(),
            start_date: start() - TimeDelta::days(30),
            end_date: None,
            availability: None,
        };
        Ok(Inventory {
            networks: vec![NetworkInventory {
                code: "XX".to_string(),
                stations: vec![StationInventory {
                    code: "YY0".to_string(),
                    latitude: 46.2,
                    longitude: 7.3,
                    channels: vec![channel("HHZ"), channel("HHN"), channel("HHE")],
                }],
            }],
        })
    }

    async fn fetch_bulk(
        &self,
        items: &[BulkItem],
    ) -> std::result::Result<Vec<PathBuf>, ProviderError> {
        self.fetched.lock().unwrap().push(items.len());
        for item in items {
            // The east component holds 8 minutes per interval.
            let body: &[u8] = if item.stream.channel == "HHE" {
                b"short"
            } else {
                b"full"
            };
            fs::write(&item.path, body).map_err(|e| ProviderError::Service(e.to_string()))?;
        }
        Ok(items.iter().map(|i| i.path.clone()).collect())
    }
}

fn read_headers(path: &Path) -> std::result::Result<Vec<TraceHeader>, TraceReadError> {
    let minutes = match fs::read(path) {
        Ok(bytes) if bytes == b"full" => 20,
        Ok(bytes) if bytes == b"short" => 8,
        Ok(_) => return Err(TraceReadError::new(path, "unknown content")),
        Err(e) => return Err(TraceReadError::new(path, e.to_string())),
    };
    Ok(vec![TraceHeader::new(
        start(),
        start() + TimeDelta::minutes(minutes),
    )])
}

#[tokio::test]
async fn test_orchestrator_pipeline() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let provider = Arc::new(DataCenter {
        fetched: Mutex::new(Vec::new()),
    });
    let restrictions = Restrictions::new(start(), end())
        .unwrap()
        .with_network("XX")
        .with_station("YY0")
        .with_chunk_length(TimeDelta::minutes(20))
        .unwrap()
        .with_minimum_length(0.5)
        .unwrap();

    let mut orchestrator = ProviderOrchestrator::new(
        provider.clone(),
        Arc::new(restrictions),
        Arc::new(GlobalDomain),
        Arc::new(DirectoryResolver::new(dir.path().join("waveforms"))),
        Arc::new(read_headers),
        OrchestratorConfig::default(),
    )
    .unwrap();

    assert_eq!(orchestrator.get_availability().await, 1);
    orchestrator.prepare_download().unwrap();
    assert_eq!(
        orchestrator.status_counts(),
        BTreeMap::from([(Status::NeedsDownloading, 9)])
    );

    let stats = orchestrator.download().await;
    // Nine 20 minute HH? intervals fit comfortably in one default chunk.
    assert_eq!(stats.chunks, 1);
    assert_eq!(*provider.fetched.lock().unwrap(), vec![9]);
    assert_eq!(stats.downloaded_bytes, 6 * 4);
    assert_eq!(stats.discarded_bytes, 3 * 5);
    assert_eq!(
        orchestrator.status_counts(),
        BTreeMap::from([(Status::Downloaded, 6), (Status::DownloadRejected, 3)])
    );

    // A second pass finds everything in place and transfers nothing.
    let mut again = ProviderOrchestrator::new(
        provider.clone(),
        Arc::new(
            Restrictions::new(start(), end())
                .unwrap()
                .with_chunk_length(TimeDelta::minutes(20))
                .unwrap(),
        ),
        Arc::new(GlobalDomain),
        Arc::new(DirectoryResolver::new(dir.path().join("waveforms"))),
        Arc::new(read_headers),
        OrchestratorConfig::default(),
    )
    .unwrap();
    again.get_availability().await;
    again.prepare_download().unwrap();
    assert_eq!(
        again.status_counts(),
        BTreeMap::from([(Status::Exists, 6), (Status::NeedsDownloading, 3)])
    );
}

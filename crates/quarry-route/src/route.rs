//! Routes, requests and the provider/executor seams.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use quarry_types::{QueryParams, StreamId};
use serde::{Deserialize, Serialize};

use crate::RouteError;

/// One line of a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BulkLine {
    /// Requested stream. Codes may contain wildcards.
    pub stream: StreamId,
    /// Window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
}

impl BulkLine {
    /// Creates a bulk line.
    #[must_use]
    pub const fn new(stream: StreamId, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { stream, start, end }
    }
}

impl std::fmt::Display for BulkLine {
    /// `NET STA LOC CHA START END`, with `--` for an empty location.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let location = if self.stream.location.is_empty() {
            "--"
        } else {
            self.stream.location.as_str()
        };
        write!(
            f,
            "{} {} {} {} {} {}",
            self.stream.network,
            self.stream.station,
            location,
            self.stream.channel,
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }
}

/// What a routed request transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Time-series data.
    #[default]
    Waveforms,
    /// Station metadata.
    Stations,
}

impl RequestKind {
    /// Returns the service name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waveforms => "dataselect",
            Self::Stations => "station",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to be routed to data centers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteRequest {
    /// What to transfer.
    pub kind: RequestKind,
    /// Bulk lines of the request.
    pub lines: Vec<BulkLine>,
    /// Extra service parameters.
    pub params: QueryParams,
}

impl RouteRequest {
    /// Creates a waveform request.
    #[must_use]
    pub fn waveforms(lines: Vec<BulkLine>) -> Self {
        Self {
            kind: RequestKind::Waveforms,
            lines,
            params: QueryParams::new(),
        }
    }

    /// Creates a station metadata request.
    #[must_use]
    pub fn stations(lines: Vec<BulkLine>) -> Self {
        Self {
            kind: RequestKind::Stations,
            lines,
            params: QueryParams::new(),
        }
    }

    /// Adds a service parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Options handed to the single transfer of a combined run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferOptions {
    /// What to transfer.
    pub kind: RequestKind,
    /// Per-request timeout, if any.
    pub timeout: Option<Duration>,
    /// Extra service parameters.
    pub extra: QueryParams,
}

/// Routes one provider resolved, keyed by endpoint URL as reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedRoutes {
    /// Bulk lines per endpoint.
    pub routes: BTreeMap<String, Vec<BulkLine>>,
    /// Transfer options the provider would use.
    pub options: TransferOptions,
}

/// A claimed endpoint in a combined route map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Endpoint URL as reported by the claiming provider.
    pub endpoint: String,
    /// Name of the claiming provider.
    pub provider: String,
    /// Bulk lines to send to the endpoint.
    pub lines: Vec<BulkLine>,
}

impl Route {
    /// Renders the bulk request body for this endpoint.
    #[must_use]
    pub fn bulk_body(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Claimed routes keyed by normalised endpoint.
pub type RouteMap = BTreeMap<String, Route>;

/// A routing service that maps a request to data center endpoints.
///
/// Resolution never transfers data.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Provider name, used for logging.
    fn name(&self) -> &str;

    /// Resolves the endpoints serving `request`.
    async fn resolve_routes(&self, request: &RouteRequest) -> Result<ResolvedRoutes, RouteError>;
}

/// Performs the actual transfer over a route map.
#[async_trait]
pub trait RouteExecutor: Send + Sync {
    /// The transfer result.
    type Output: Send;

    /// Transfers all routes in one run.
    async fn execute(
        &self,
        routes: &RouteMap,
        options: &TransferOptions,
    ) -> Result<Self::Output, RouteError>;
}

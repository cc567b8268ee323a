//! The data provider seam: inventory queries and bulk fetches.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quarry_types::{QueryParams, StreamId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a data provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider has no data for the request. Informational.
    #[error("No data available for request")]
    NoDataAvailable,

    /// Communication with the provider failed.
    #[error("Service error: {0}")]
    Service(String),
}

impl ProviderError {
    /// Returns true for the informational "no data" signal.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoDataAvailable)
    }
}

/// How a provider can report which streams actually hold data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityMode {
    /// Only return channels that have matching time series.
    MatchTimeSeries,
    /// Attach data availability spans to every channel.
    IncludeAvailability,
}

impl AvailabilityMode {
    /// Returns the query parameter name of this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MatchTimeSeries => "matchtimeseries",
            Self::IncludeAvailability => "includeavailability",
        }
    }
}

impl std::fmt::Display for AvailabilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Availability parameters a provider advertises for its station service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilitySupport {
    /// Supports `matchtimeseries`.
    pub match_timeseries: bool,
    /// Supports `includeavailability`.
    pub include_availability: bool,
}

impl AvailabilitySupport {
    /// Returns the preferred mode, `matchtimeseries` first.
    #[must_use]
    pub const fn preferred(&self) -> Option<AvailabilityMode> {
        if self.match_timeseries {
            Some(AvailabilityMode::MatchTimeSeries)
        } else if self.include_availability {
            Some(AvailabilityMode::IncludeAvailability)
        } else {
            None
        }
    }
}

/// A channel-level inventory request.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryQuery {
    /// Network code pattern.
    pub network: Option<String>,
    /// Station code pattern.
    pub station: Option<String>,
    /// Location code pattern.
    pub location: Option<String>,
    /// Channel code pattern.
    pub channel: Option<String>,
    /// Window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
    /// Spatial parameters from the request domain.
    pub domain: QueryParams,
    /// Availability mode to request, if any.
    pub availability: Option<AvailabilityMode>,
}

impl InventoryQuery {
    /// Flattens the query into `key=value` parameters.
    #[must_use]
    pub fn parameters(&self) -> QueryParams {
        let mut params = self.domain.clone();
        let codes = [
            ("network", &self.network),
            ("station", &self.station),
            ("location", &self.location),
            ("channel", &self.channel),
        ];
        for (key, value) in codes {
            if let Some(value) = value {
                params.insert(key.to_string(), value.clone());
            }
        }
        params.insert("starttime".to_string(), self.start.to_rfc3339());
        params.insert("endtime".to_string(), self.end.to_rfc3339());
        params.insert("level".to_string(), "channel".to_string());
        if let Some(mode) = self.availability {
            params.insert(mode.as_str().to_string(), "true".to_string());
        }
        params
    }
}

/// Inventory returned by a provider, networks → stations → channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Networks in the response.
    pub networks: Vec<NetworkInventory>,
}

/// One network of an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInventory {
    /// Network code.
    pub code: String,
    /// Stations of the network.
    pub stations: Vec<StationInventory>,
}

/// One station of an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInventory {
    /// Station code.
    pub code: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Channel epochs of the station.
    pub channels: Vec<ChannelInventory>,
}

/// One channel epoch of an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInventory {
    /// Location code.
    pub location: String,
    /// Channel code.
    pub code: String,
    /// Epoch start.
    pub start_date: DateTime<Utc>,
    /// Epoch end, `None` while the channel is still operating.
    pub end_date: Option<DateTime<Utc>>,
    /// Data availability span, when the provider reports one.
    pub availability: Option<DataAvailability>,
}

impl ChannelInventory {
    /// Returns true if the metadata epoch covers `[start, end]` completely.
    #[must_use]
    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date <= start && self.end_date.is_none_or(|e| e >= end)
    }
}

/// The span over which a channel actually holds data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataAvailability {
    /// First available sample.
    pub start: DateTime<Utc>,
    /// Last available sample.
    pub end: DateTime<Utc>,
}

impl DataAvailability {
    /// Returns true if the span covers `[start, end]` completely.
    #[must_use]
    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= start && self.end >= end
    }
}

/// One line of a bulk fetch: a stream, a window and where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItem {
    /// The stream to fetch.
    pub stream: StreamId,
    /// Window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
    /// Destination file.
    pub path: PathBuf,
}

/// A routing/data-provider service.
///
/// Implementations own the wire protocol. The orchestrator only relies on
/// the two calls below and on the [`ProviderError`] classification.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Short provider name, used for logging and capability overrides.
    fn name(&self) -> &str;

    /// Base URL of the provider.
    fn base_url(&self) -> &str;

    /// Availability parameters supported by the station service.
    fn availability_support(&self) -> AvailabilitySupport {
        AvailabilitySupport::default()
    }

    /// Issues one channel-level inventory query.
    async fn query_inventory(&self, query: &InventoryQuery) -> Result<Inventory, ProviderError>;

    /// Fetches all items in one bulk request and splits the result into the
    /// items' destination files, returning the files that were written.
    async fn fetch_bulk(&self, items: &[BulkItem]) -> Result<Vec<PathBuf>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn test_preferred_mode() {
        let both = AvailabilitySupport {
            match_timeseries: true,
            include_availability: true,
        };
        assert_eq!(both.preferred(), Some(AvailabilityMode::MatchTimeSeries));

        let include = AvailabilitySupport {
            match_timeseries: false,
            include_availability: true,
        };
        assert_eq!(include.preferred(), Some(AvailabilityMode::IncludeAvailability));
        assert_eq!(AvailabilitySupport::default().preferred(), None);
    }

    #[test]
    fn test_query_parameters() {
        let query = InventoryQuery {
            network: Some("XX".to_string()),
            station: None,
            location: None,
            channel: Some("HH?".to_string()),
            start: hour(0),
            end: hour(1),
            domain: QueryParams::from([("minlatitude".to_string(), "10".to_string())]),
            availability: Some(AvailabilityMode::MatchTimeSeries),
        };
        let params = query.parameters();

        assert_eq!(params["network"], "XX");
        assert_eq!(params["channel"], "HH?");
        assert_eq!(params["minlatitude"], "10");
        assert_eq!(params["matchtimeseries"], "true");
        assert_eq!(params["level"], "channel");
        assert!(!params.contains_key("station"));
    }

    #[test]
    fn test_channel_epoch_coverage() {
        let open = ChannelInventory {
            location: String::new(),
            code: "HHZ".to_string(),
            start_date: hour(0),
            end_date: None,
            availability: None,
        };
        assert!(open.covers(hour(1), hour(5)));

        let closed = ChannelInventory {
            end_date: Some(hour(2)),
            ..open.clone()
        };
        assert!(closed.covers(hour(0), hour(2)));
        assert!(!closed.covers(hour(1), hour(3)));

        let late = ChannelInventory {
            start_date: hour(1),
            ..open
        };
        assert!(!late.covers(hour(0), hour(2)));
    }

    #[test]
    fn test_error_classification() {
        assert!(ProviderError::NoDataAvailable.is_no_data());
        assert!(!ProviderError::Service("timeout".to_string()).is_no_data());
    }
}

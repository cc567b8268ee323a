//! Non-spatial request restrictions.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::RestrictionsError;

/// Default channel priority tiers, best first.
pub const DEFAULT_CHANNEL_PRIORITIES: [&str; 5] =
    ["HH[ZNE]", "BH[ZNE]", "MH[ZNE]", "EH[ZNE]", "LH[ZNE]"];

/// Default location priority tiers, best first.
pub const DEFAULT_LOCATION_PRIORITIES: [&str; 3] = ["", "00", "10"];

/// The temporal and code restrictions of one data request.
///
/// Code fields accept the wildcard syntax understood by the data provider
/// (`*`, `?`, comma separated lists).
///
/// Deserialized values go through the same checks as the builder methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRestrictions")]
pub struct Restrictions {
    /// Network code pattern.
    pub network: Option<String>,
    /// Station code pattern.
    pub station: Option<String>,
    /// Location code pattern.
    pub location: Option<String>,
    /// Channel code pattern.
    pub channel: Option<String>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    chunk_length_seconds: Option<i64>,
    /// Reject artifacts that contain more than one contiguous trace.
    pub reject_channels_with_gaps: bool,
    minimum_length: Option<f64>,
    /// Channel code priority tiers, best first. Empty disables the filter.
    pub channel_priorities: Vec<String>,
    /// Location code priority tiers, best first. Empty disables the filter.
    pub location_priorities: Vec<String>,
}

/// Unvalidated serialized form of [`Restrictions`].
#[derive(Debug, Deserialize)]
struct RawRestrictions {
    network: Option<String>,
    station: Option<String>,
    location: Option<String>,
    channel: Option<String>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    chunk_length_seconds: Option<i64>,
    reject_channels_with_gaps: bool,
    minimum_length: Option<f64>,
    channel_priorities: Vec<String>,
    location_priorities: Vec<String>,
}

impl TryFrom<RawRestrictions> for Restrictions {
    type Error = RestrictionsError;

    fn try_from(raw: RawRestrictions) -> Result<Self, Self::Error> {
        let mut restrictions = Self::new(raw.start, raw.end)?
            .with_reject_gaps(raw.reject_channels_with_gaps)
            .with_channel_priorities(raw.channel_priorities)
            .with_location_priorities(raw.location_priorities);
        restrictions.network = raw.network;
        restrictions.station = raw.station;
        restrictions.location = raw.location;
        restrictions.channel = raw.channel;

        if let Some(seconds) = raw.chunk_length_seconds {
            let length = TimeDelta::try_seconds(seconds)
                .ok_or(RestrictionsError::InvalidChunkLength { seconds })?;
            restrictions = restrictions.with_chunk_length(length)?;
        }
        if let Some(fraction) = raw.minimum_length {
            restrictions = restrictions.with_minimum_length(fraction)?;
        }
        Ok(restrictions)
    }
}

impl Restrictions {
    /// Creates restrictions for the window `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if start is not before end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RestrictionsError> {
        if start >= end {
            return Err(RestrictionsError::InvalidWindow { start, end });
        }
        Ok(Self {
            network: None,
            station: None,
            location: None,
            channel: None,
            start,
            end,
            chunk_length_seconds: None,
            reject_channels_with_gaps: false,
            minimum_length: None,
            channel_priorities: DEFAULT_CHANNEL_PRIORITIES.map(String::from).to_vec(),
            location_priorities: DEFAULT_LOCATION_PRIORITIES.map(String::from).to_vec(),
        })
    }

    /// Sets the network code pattern.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Sets the station code pattern.
    #[must_use]
    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    /// Sets the location code pattern.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the channel code pattern.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Splits the request window into sub-windows of `length`.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not positive.
    pub fn with_chunk_length(mut self, length: TimeDelta) -> Result<Self, RestrictionsError> {
        let seconds = length.num_seconds();
        if seconds <= 0 {
            return Err(RestrictionsError::InvalidChunkLength { seconds });
        }
        self.chunk_length_seconds = Some(seconds);
        Ok(self)
    }

    /// Rejects artifacts with gaps or overlaps.
    #[must_use]
    pub const fn with_reject_gaps(mut self, reject: bool) -> Self {
        self.reject_channels_with_gaps = reject;
        self
    }

    /// Requires artifacts to cover at least `fraction` of their interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the fraction lies outside `[0, 1]`.
    pub fn with_minimum_length(mut self, fraction: f64) -> Result<Self, RestrictionsError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(RestrictionsError::InvalidMinimumLength(fraction));
        }
        self.minimum_length = Some(fraction);
        Ok(self)
    }

    /// Replaces the channel priority tiers.
    #[must_use]
    pub fn with_channel_priorities<I, S>(mut self, priorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channel_priorities = priorities.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the location priority tiers.
    #[must_use]
    pub fn with_location_priorities<I, S>(mut self, priorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location_priorities = priorities.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the request start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the request end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the sub-window length, if the window is split.
    #[must_use]
    pub fn chunk_length(&self) -> Option<TimeDelta> {
        self.chunk_length_seconds.and_then(TimeDelta::try_seconds)
    }

    /// Returns the minimum length fraction, if configured.
    ///
    /// A fraction of zero is treated as unset.
    #[must_use]
    pub fn minimum_length(&self) -> Option<f64> {
        self.minimum_length.filter(|f| *f > 0.0)
    }

    /// Returns the requested sub-windows in order.
    ///
    /// Without a chunk length this is the single window `[start, end]`;
    /// otherwise consecutive windows of that length, the last one truncated
    /// at `end`.
    #[must_use]
    pub fn intervals(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        let Some(length) = self.chunk_length() else {
            return vec![(self.start, self.end)];
        };

        let mut windows = Vec::new();
        let mut current = self.start;
        while current < self.end {
            let next = current
                .checked_add_signed(length)
                .map_or(self.end, |next| next.min(self.end));
            windows.push((current, next));
            current = next;
        }
        windows
    }
}

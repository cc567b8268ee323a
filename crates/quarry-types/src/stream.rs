//! Stream identity.

use serde::{Deserialize, Serialize};

/// Unique (network, station, location, channel) time-series identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamId {
    /// Network code (e.g., "IU").
    pub network: String,
    /// Station code (e.g., "ANMO").
    pub station: String,
    /// Location code, possibly empty.
    pub location: String,
    /// Channel code (e.g., "BHZ").
    pub channel: String,
}

impl StreamId {
    /// Creates a new stream identity.
    #[must_use]
    pub fn new(
        network: impl Into<String>,
        station: impl Into<String>,
        location: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            network: network.into(),
            station: station.into(),
            location: location.into(),
            channel: channel.into(),
        }
    }

    /// Returns the band code, the upper-cased first character of the channel code.
    #[must_use]
    pub fn band_code(&self) -> Option<char> {
        self.channel.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }
}

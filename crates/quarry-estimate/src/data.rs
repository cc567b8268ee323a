//! Nominal sample rates per band code.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

/// Embedded JSON data with the nominal sample rate of every band code.
const BAND_RATES_JSON: &str = include_str!("../data/band_rates.json");

/// Static sample rate table instance.
static RATES: OnceLock<SampleRateTable> = OnceLock::new();

/// Raw JSON structure for deserialization.
#[derive(Debug, Deserialize)]
struct RawRateData {
    default_rate_hz: f64,
    bands: HashMap<String, f64>,
}

/// Nominal sample rate, in Hz, of each channel band code.
///
/// The band code is the first character of a channel code. Exotic codes
/// that are not in the table fall back to a generic rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRateTable {
    bands: HashMap<char, f64>,
    default_rate_hz: f64,
}

impl SampleRateTable {
    /// Returns the global table instance.
    ///
    /// This lazily initializes the table from embedded JSON on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        RATES.get_or_init(|| {
            Self::from_json(BAND_RATES_JSON).expect("embedded band_rates.json should be valid")
        })
    }

    /// Creates a table from a JSON string.
    ///
    /// Band keys are upper-cased; only their first character is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawRateData = serde_json::from_str(json)?;
        let bands = raw
            .bands
            .into_iter()
            .filter_map(|(band, rate)| {
                let code = band.chars().next()?;
                Some((code.to_ascii_uppercase(), rate))
            })
            .collect();
        Ok(Self {
            bands,
            default_rate_hz: raw.default_rate_hz,
        })
    }

    /// Returns the rate for a band code, if it is known.
    #[must_use]
    pub fn get(&self, band: char) -> Option<f64> {
        self.bands.get(&band.to_ascii_uppercase()).copied()
    }

    /// Returns the rate used for unknown band codes.
    #[must_use]
    pub const fn default_rate(&self) -> f64 {
        self.default_rate_hz
    }

    /// Returns the nominal rate of a channel code.
    ///
    /// Empty codes and unknown bands get [`SampleRateTable::default_rate`].
    #[must_use]
    pub fn rate_for_channel(&self, channel_code: &str) -> f64 {
        channel_code
            .chars()
            .next()
            .and_then(|band| self.get(band))
            .unwrap_or(self.default_rate_hz)
    }

    /// Returns the number of known band codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Returns true if the table has no band codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl Default for SampleRateTable {
    fn default() -> Self {
        Self::global().clone()
    }
}

//! Benchmark utilities for quarry.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use quarry_estimate::PayloadEstimator;
use quarry_types::StreamId;

/// Channel codes cycled through by synthetic workloads.
pub const CHANNELS: [&str; 9] = [
    "HHZ", "HHN", "HHE", "BHZ", "BHN", "BHE", "LHZ", "LHN", "LHE",
];

/// A synthetic download workload.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    /// Number of stations.
    pub stations: usize,
    /// Channels per station, taken from [`CHANNELS`].
    pub channels_per_station: usize,
    /// Sub-windows per channel.
    pub intervals_per_channel: usize,
    /// Length of each sub-window.
    pub interval: TimeDelta,
}

impl Workload {
    /// Returns the total number of intervals.
    pub const fn len(&self) -> usize {
        self.stations * self.channels_per_station * self.intervals_per_channel
    }

    /// Returns true if the workload has no intervals.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn origin() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// Generates `(stream, start, end)` triples in station/channel/time order.
    pub fn intervals(&self) -> Vec<(StreamId, DateTime<Utc>, DateTime<Utc>)> {
        let mut out = Vec::with_capacity(self.len());
        for station in 0..self.stations {
            let code = format!("S{station:04}");
            for channel in CHANNELS.iter().cycle().take(self.channels_per_station) {
                let stream = StreamId::new("XX", code.clone(), "", *channel);
                for i in 0..self.intervals_per_channel {
                    let start = Self::origin() + self.interval * i as i32;
                    out.push((stream.clone(), start, start + self.interval));
                }
            }
        }
        out
    }

    /// Generates `(stream, estimated_bytes)` pairs ready for chunk planning.
    pub fn estimated(&self, estimator: &PayloadEstimator) -> Vec<(StreamId, f64)> {
        self.intervals()
            .into_iter()
            .map(|(stream, start, end)| {
                let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
                let bytes = estimator.estimate_bytes(&stream.channel, seconds);
                (stream, bytes)
            })
            .collect()
    }
}

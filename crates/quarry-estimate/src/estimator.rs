//! Payload size estimation.

use std::time::Duration;

use crate::data::SampleRateTable;

/// Bytes per sample before compression.
const BYTES_PER_SAMPLE: f64 = 4.0;

/// STEIM compression shrinks data to about a third of its raw size.
const COMPRESSION_RATIO: f64 = 3.0;

/// Estimates the transfer size of a stream over a time window.
#[derive(Debug, Clone)]
pub struct PayloadEstimator {
    table: &'static SampleRateTable,
}

impl PayloadEstimator {
    /// Creates an estimator backed by the global sample rate table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: SampleRateTable::global(),
        }
    }

    /// Creates an estimator backed by a custom table.
    #[must_use]
    pub const fn with_table(table: &'static SampleRateTable) -> Self {
        Self { table }
    }

    /// Returns the sample rate table in use.
    #[must_use]
    pub const fn table(&self) -> &'static SampleRateTable {
        self.table
    }

    /// Estimates the payload, in bytes, of `duration_seconds` of a channel.
    ///
    /// `nominal_rate(band) * duration * 4 / 3`. Negative durations estimate
    /// to zero.
    #[must_use]
    pub fn estimate_bytes(&self, channel_code: &str, duration_seconds: f64) -> f64 {
        let rate = self.table.rate_for_channel(channel_code);
        rate * duration_seconds.max(0.0) * BYTES_PER_SAMPLE / COMPRESSION_RATIO
    }

    /// Formats bytes in human-readable form (e.g., "1.5 GB", "250 MB").
    #[must_use]
    pub fn format_bytes(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * KB;
        const GB: u64 = 1024 * MB;
        const TB: u64 = 1024 * GB;

        if bytes >= TB {
            format!("{:.2} TB", bytes as f64 / TB as f64)
        } else if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    /// Formats a transfer rate in KB/s over the given elapsed time.
    #[must_use]
    pub fn format_throughput(bytes: u64, elapsed: Duration) -> String {
        let seconds = elapsed.as_secs_f64();
        if seconds <= 0.0 {
            return "n/a".to_string();
        }
        format!("{:.2} KB/sec", bytes as f64 / 1024.0 / seconds)
    }

    /// Formats duration in human-readable form (e.g., "2h 30m", "45m").
    #[must_use]
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            if minutes > 0 {
                format!("{hours}h {minutes}m")
            } else {
                format!("{hours}h")
            }
        } else if minutes > 0 {
            if seconds > 0 && minutes < 10 {
                format!("{minutes}m {seconds}s")
            } else {
                format!("{minutes}m")
            }
        } else {
            format!("{:.2}s", duration.as_secs_f64())
        }
    }
}

impl Default for PayloadEstimator {
    fn default() -> Self {
        Self::new()
    }
}

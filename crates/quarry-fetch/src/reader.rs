//! The time-series format seam.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A file could not be parsed as time-series data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to read '{path}': {message}")]
pub struct TraceReadError {
    /// The file that failed to parse.
    pub path: PathBuf,
    /// Reader-specific description.
    pub message: String,
}

impl TraceReadError {
    /// Creates a new read error.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Header of one contiguous trace in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceHeader {
    /// First sample time.
    pub start: DateTime<Utc>,
    /// Last sample time.
    pub end: DateTime<Utc>,
}

impl TraceHeader {
    /// Creates a trace header.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns the trace length in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }
}

/// Reads trace headers from a downloaded artifact.
///
/// Only headers are needed, so implementations should skip sample data.
/// Implemented for any `Fn(&Path) -> Result<Vec<TraceHeader>, TraceReadError>`.
pub trait TraceReader: Send + Sync {
    /// Returns one header per contiguous trace in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not valid time-series data.
    fn read_headers(&self, path: &Path) -> Result<Vec<TraceHeader>, TraceReadError>;
}

impl<F> TraceReader for F
where
    F: Fn(&Path) -> Result<Vec<TraceHeader>, TraceReadError> + Send + Sync,
{
    fn read_headers(&self, path: &Path) -> Result<Vec<TraceHeader>, TraceReadError> {
        self(path)
    }
}

//! Time intervals and channels.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};

use crate::{IntervalError, Status, StreamId, TransitionError};

/// The smallest unit of work: one stream over one time window.
///
/// The bounds are fixed at construction. The destination path and status
/// change only through the checked transitions below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    path: Option<PathBuf>,
    status: Status,
}

impl TimeInterval {
    /// Creates a new interval with status [`Status::None`].
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::Inverted { start, end });
        }
        Ok(Self {
            start,
            end,
            path: None,
            status: Status::None,
        })
    }

    /// Returns the interval start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the interval end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the interval length.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns the interval length in (fractional) seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 1000.0
    }

    /// Returns the destination path, if one has been assigned.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Assigns a planning status and destination path.
    ///
    /// # Errors
    ///
    /// Returns an error if `status` is not a planning status or if the
    /// interval already carries a download outcome.
    pub fn plan(&mut self, status: Status, path: Option<PathBuf>) -> Result<(), TransitionError> {
        if !status.is_planned() {
            return Err(TransitionError {
                from: self.status,
                to: status,
            });
        }
        self.status.check_transition(status)?;
        self.status = status;
        self.path = path;
        Ok(())
    }

    /// Records the outcome of a download attempt.
    ///
    /// # Errors
    ///
    /// Returns an error unless the interval is [`Status::NeedsDownloading`]
    /// and `outcome` is one of the download outcomes.
    pub fn finish(&mut self, outcome: Status) -> Result<(), TransitionError> {
        if self.status != Status::NeedsDownloading || !outcome.is_download_outcome() {
            return Err(TransitionError {
                from: self.status,
                to: outcome,
            });
        }
        self.status = outcome;
        Ok(())
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeInterval({} - {}", self.start, self.end)?;
        if let Some(path) = &self.path {
            write!(f, ", {}", path.display())?;
        }
        write!(f, ", {})", self.status)
    }
}

/// All intervals requested for one location/channel code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    location: String,
    code: String,
    intervals: Vec<TimeInterval>,
}

impl Channel {
    /// Creates a channel, ordering the intervals by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if any two intervals overlap. Intervals that merely
    /// touch (one ends where the next starts) are accepted.
    pub fn new(
        location: impl Into<String>,
        code: impl Into<String>,
        mut intervals: Vec<TimeInterval>,
    ) -> Result<Self, IntervalError> {
        intervals.sort_by_key(TimeInterval::start);
        for pair in intervals.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(IntervalError::Overlap {
                    first_start: pair[0].start,
                    first_end: pair[0].end,
                    second_start: pair[1].start,
                    second_end: pair[1].end,
                });
            }
        }
        Ok(Self {
            location: location.into(),
            code: code.into(),
            intervals,
        })
    }

    /// Returns the location code.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the channel code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the intervals ordered by start time.
    #[must_use]
    pub fn intervals(&self) -> &[TimeInterval] {
        &self.intervals
    }

    /// Returns mutable access to the intervals.
    ///
    /// A slice is handed out so the ordering cannot be disturbed.
    pub fn intervals_mut(&mut self) -> &mut [TimeInterval] {
        &mut self.intervals
    }

    /// Builds the stream identity of this channel at the given station.
    #[must_use]
    pub fn stream_id(&self, network: &str, station: &str) -> StreamId {
        StreamId::new(network, station, &self.location, &self.code)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Channel '{}.{}':", self.location, self.code)?;
        for interval in &self.intervals {
            write!(f, "\n\t{interval}")?;
        }
        Ok(())
    }
}

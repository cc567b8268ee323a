//! Error types for quarry.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::Status;

/// An interval was asked to move to a status it cannot reach.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Illegal status transition: {from} -> {to}")]
pub struct TransitionError {
    /// Status before the attempted transition.
    pub from: Status,
    /// Rejected target status.
    pub to: Status,
}

/// Errors for invalid time intervals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// Start is after end.
    #[error("Invalid interval: {start} > {end}")]
    Inverted {
        /// The start time.
        start: DateTime<Utc>,
        /// The end time.
        end: DateTime<Utc>,
    },

    /// Two intervals of the same channel overlap.
    #[error(
        "Overlapping intervals: [{first_start}, {first_end}] and [{second_start}, {second_end}]"
    )]
    Overlap {
        /// Start of the earlier interval.
        first_start: DateTime<Utc>,
        /// End of the earlier interval.
        first_end: DateTime<Utc>,
        /// Start of the later interval.
        second_start: DateTime<Utc>,
        /// End of the later interval.
        second_end: DateTime<Utc>,
    },
}

/// Errors for invalid request restrictions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RestrictionsError {
    /// Start time is not before end time.
    #[error("Invalid request window: {start} >= {end}")]
    InvalidWindow {
        /// The start time.
        start: DateTime<Utc>,
        /// The end time.
        end: DateTime<Utc>,
    },

    /// Chunk length is zero or negative.
    #[error("Chunk length must be positive, got {seconds} s")]
    InvalidChunkLength {
        /// The rejected chunk length.
        seconds: i64,
    },

    /// Minimum length fraction outside `[0, 1]`.
    #[error("Minimum length must be within [0, 1], got {0}")]
    InvalidMinimumLength(f64),
}

/// Errors raised while distributing destination paths.
#[derive(Error, Debug)]
pub enum PrepareError {
    /// Failed to create the parent directory of a destination path.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An interval refused its planning status.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

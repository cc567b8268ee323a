//! Per-interval download status.

use serde::{Deserialize, Serialize};

use crate::TransitionError;

/// Current status of a single (station, channel, interval) unit of work.
///
/// The string vocabulary returned by [`Status::as_str`] is stable and is
/// intended for downstream logging and metrics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Nothing has been decided yet.
    #[default]
    None,
    /// The interval has a destination path and must be fetched.
    NeedsDownloading,
    /// The interval was fetched and passed quality control.
    Downloaded,
    /// The storage resolver asked for this interval to be skipped.
    Ignore,
    /// The destination file is already present on disk.
    Exists,
    /// The fetch produced no usable file.
    DownloadFailed,
    /// The fetched file was rejected by quality control.
    DownloadRejected,
}

impl Status {
    /// All statuses in vocabulary order.
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::NeedsDownloading,
        Self::Downloaded,
        Self::Ignore,
        Self::Exists,
        Self::DownloadFailed,
        Self::DownloadRejected,
    ];

    /// Returns the status as a stable string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NeedsDownloading => "needs_downloading",
            Self::Downloaded => "downloaded",
            Self::Ignore => "ignore",
            Self::Exists => "exists",
            Self::DownloadFailed => "download_failed",
            Self::DownloadRejected => "download_rejected",
        }
    }

    /// Returns true for statuses assigned while planning a download.
    #[must_use]
    pub const fn is_planned(&self) -> bool {
        matches!(self, Self::Ignore | Self::Exists | Self::NeedsDownloading)
    }

    /// Returns true for the outcomes of an attempted download.
    #[must_use]
    pub const fn is_download_outcome(&self) -> bool {
        matches!(
            self,
            Self::Downloaded | Self::DownloadFailed | Self::DownloadRejected
        )
    }

    /// Returns true if no further transition is possible in this pass.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ignore | Self::Exists) || self.is_download_outcome()
    }

    /// Returns true if moving from `self` to `next` is a legal step.
    ///
    /// Planning statuses may be recomputed among themselves, which keeps
    /// repeated planning idempotent. Download outcomes are only reachable
    /// from [`Status::NeedsDownloading`] and never change afterwards.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::None | Self::Ignore | Self::Exists => next.is_planned(),
            Self::NeedsDownloading => next.is_planned() || next.is_download_outcome(),
            Self::Downloaded | Self::DownloadFailed | Self::DownloadRejected => false,
        }
    }

    /// Validates a transition, returning an error for illegal steps.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if `next` is not reachable from `self`.
    pub const fn check_transition(&self, next: Self) -> Result<(), TransitionError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(TransitionError { from: *self, to: next })
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Post-download quality control of a single artifact.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use quarry_types::{Restrictions, Status};
use tracing::{info, warn};

use crate::TraceReader;

/// Quality criteria applied to every downloaded artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityCriteria {
    /// Reject artifacts holding more than one contiguous trace.
    pub reject_gaps: bool,
    /// Minimum covered fraction of the requested interval.
    pub minimum_length: Option<f64>,
}

impl QualityCriteria {
    /// Extracts the criteria of a request.
    #[must_use]
    pub fn from_restrictions(restrictions: &Restrictions) -> Self {
        Self {
            reject_gaps: restrictions.reject_channels_with_gaps,
            minimum_length: restrictions.minimum_length(),
        }
    }
}

/// The verdict on one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// The download outcome for the interval.
    pub status: Status,
    /// Bytes kept on disk.
    pub downloaded_bytes: u64,
    /// Bytes transferred but deleted afterwards.
    pub discarded_bytes: u64,
}

impl Verdict {
    const fn failed(discarded_bytes: u64) -> Self {
        Self {
            status: Status::DownloadFailed,
            downloaded_bytes: 0,
            discarded_bytes,
        }
    }

    const fn rejected(discarded_bytes: u64) -> Self {
        Self {
            status: Status::DownloadRejected,
            downloaded_bytes: 0,
            discarded_bytes,
        }
    }

    const fn downloaded(downloaded_bytes: u64) -> Self {
        Self {
            status: Status::Downloaded,
            downloaded_bytes,
            discarded_bytes: 0,
        }
    }
}

/// Inspects the artifact at `path` for an interval of `interval_seconds`.
///
/// Artifacts that fail any check are deleted. Checks run in this order:
/// missing, empty, unreadable, no traces, gaps, minimum length.
pub fn inspect_artifact(
    path: &Path,
    interval_seconds: f64,
    criteria: QualityCriteria,
    reader: &dyn TraceReader,
) -> Verdict {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(_) => return Verdict::failed(0),
    };

    if size == 0 {
        warn!(path = %path.display(), "Zero byte file, will be deleted");
        remove_artifact(path);
        return Verdict::failed(0);
    }

    let traces = match reader.read_headers(path) {
        Ok(traces) => traces,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read file, will be discarded");
            remove_artifact(path);
            return Verdict::failed(size);
        }
    };

    if traces.is_empty() {
        warn!(path = %path.display(), "Empty file, will be deleted");
        remove_artifact(path);
        return Verdict::failed(size);
    }

    if criteria.reject_gaps && traces.len() > 1 {
        info!(
            path = %path.display(),
            traces = traces.len(),
            "File contains gaps or overlaps, will be deleted"
        );
        remove_artifact(path);
        return Verdict::rejected(size);
    }

    if let Some(fraction) = criteria.minimum_length {
        let covered: f64 = traces.iter().map(|t| t.duration_seconds()).sum();
        let required = fraction * interval_seconds;
        if covered < required {
            info!(
                path = %path.display(),
                covered_seconds = covered,
                required_seconds = required,
                "File is shorter than the minimum length, will be deleted"
            );
            remove_artifact(path);
            return Verdict::rejected(size);
        }
    }

    Verdict::downloaded(size)
}

/// Deletes an artifact, logging rather than failing on errors.
///
/// Returns the size of the removed file, zero if there was none.
pub fn remove_artifact(path: &Path) -> u64 {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    match fs::remove_file(path) {
        Ok(()) => size,
        Err(e) if e.kind() == ErrorKind::NotFound => 0,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to delete file");
            0
        }
    }
}

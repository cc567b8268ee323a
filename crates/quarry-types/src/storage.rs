//! Destination path resolution.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;

use crate::StreamId;

/// Where a single interval should be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoragePath {
    /// Store the interval at this path.
    Path(PathBuf),
    /// Do not download this interval at all.
    Skip,
}

/// Decides where each (stream, interval) unit is written.
///
/// Implemented for any `Fn(&StreamId, start, end) -> StoragePath`, so a
/// closure is usually all a caller needs.
pub trait PathResolver: Send + Sync {
    /// Resolves the destination of one interval.
    fn resolve(&self, stream: &StreamId, start: DateTime<Utc>, end: DateTime<Utc>)
    -> StoragePath;
}

impl<F> PathResolver for F
where
    F: Fn(&StreamId, DateTime<Utc>, DateTime<Utc>) -> StoragePath + Send + Sync,
{
    fn resolve(
        &self,
        stream: &StreamId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoragePath {
        self(stream, start, end)
    }
}

/// Timestamp layout used in file names.
const FILENAME_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Stores every interval as one file in a flat directory.
///
/// File names follow `{NET}.{STA}.{LOC}.{CHA}__{start}__{end}.mseed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    /// Creates a resolver writing below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the default storage directory.
    ///
    /// Uses the platform data directory (e.g. `~/.local/share/quarry/waveforms`
    /// on Linux), falling back to `./waveforms`.
    #[must_use]
    pub fn default_root() -> PathBuf {
        ProjectDirs::from("", "", "quarry").map_or_else(
            || PathBuf::from("waveforms"),
            |dirs| dirs.data_dir().join("waveforms"),
        )
    }

    /// Creates a resolver at [`DirectoryResolver::default_root`].
    #[must_use]
    pub fn with_default_root() -> Self {
        Self::new(Self::default_root())
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file name used for an interval.
    #[must_use]
    pub fn file_name(stream: &StreamId, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{}__{}__{}.mseed",
            stream,
            start.format(FILENAME_TIME_FORMAT),
            end.format(FILENAME_TIME_FORMAT)
        )
    }
}

impl Default for DirectoryResolver {
    fn default() -> Self {
        Self::with_default_root()
    }
}

impl PathResolver for DirectoryResolver {
    fn resolve(
        &self,
        stream: &StreamId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoragePath {
        StoragePath::Path(self.root.join(Self::file_name(stream, start, end)))
    }
}

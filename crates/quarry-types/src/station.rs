//! Stations and download preparation.

use std::collections::BTreeMap;
use std::fs;

use crate::{Channel, PathResolver, PrepareError, Status, StoragePath};

/// Key of a channel within a station: (location code, channel code).
pub type ChannelKey = (String, String);

/// A station with its channels and coordinates.
///
/// Channels are kept in a [`BTreeMap`] so every walk over them happens in
/// the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    channels: BTreeMap<ChannelKey, Channel>,
}

impl Station {
    /// Creates a station owning the given channels.
    ///
    /// A later channel with the same (location, code) replaces an earlier one.
    #[must_use]
    pub fn new(
        network: impl Into<String>,
        station: impl Into<String>,
        latitude: f64,
        longitude: f64,
        channels: impl IntoIterator<Item = Channel>,
    ) -> Self {
        let channels = channels
            .into_iter()
            .map(|c| ((c.location().to_string(), c.code().to_string()), c))
            .collect();
        Self {
            network: network.into(),
            station: station.into(),
            latitude,
            longitude,
            channels,
        }
    }

    /// Returns the (network, station) key of this station.
    #[must_use]
    pub fn id(&self) -> (String, String) {
        (self.network.clone(), self.station.clone())
    }

    /// Returns the channels in stable (location, code) order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// Returns mutable access to the channels in stable order.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.values_mut()
    }

    /// Returns a channel by location and channel code.
    #[must_use]
    pub fn channel(&self, location: &str, code: &str) -> Option<&Channel> {
        self.channels.get(&(location.to_string(), code.to_string()))
    }

    /// Returns the number of channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Returns the number of intervals across all channels.
    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.channels.values().map(|c| c.intervals().len()).sum()
    }

    /// Distributes destination paths and a planning status to every interval.
    ///
    /// For each interval the resolver decides the destination:
    ///
    /// - [`StoragePath::Skip`] sets [`Status::Ignore`].
    /// - An existing file sets [`Status::Exists`].
    /// - Otherwise the parent directory is created if needed and the
    ///   interval becomes [`Status::NeedsDownloading`].
    ///
    /// Intervals that already carry a download outcome are left untouched,
    /// everything else is recomputed, so calling this twice without
    /// filesystem changes gives the same result.
    ///
    /// # Errors
    ///
    /// Returns an error if a missing parent directory cannot be created.
    pub fn prepare_download(&mut self, resolver: &dyn PathResolver) -> Result<(), PrepareError> {
        for channel in self.channels.values_mut() {
            let stream = channel.stream_id(&self.network, &self.station);
            for interval in channel.intervals_mut() {
                if interval.status().is_download_outcome() {
                    continue;
                }

                match resolver.resolve(&stream, interval.start(), interval.end()) {
                    StoragePath::Skip => interval.plan(Status::Ignore, None),
                    StoragePath::Path(path) if path.exists() => {
                        interval.plan(Status::Exists, Some(path))
                    }
                    StoragePath::Path(path) => {
                        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                            fs::create_dir_all(parent).map_err(|e| PrepareError::CreateDir {
                                path: parent.to_path_buf(),
                                source: e,
                            })?;
                        }
                        interval.plan(Status::NeedsDownloading, Some(path))
                    }
                }?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Station '{}.{}' [Lat: {:.2}, Lng: {:.2}]",
            self.network, self.station, self.latitude, self.longitude
        )?;
        for channel in self.channels.values() {
            for line in channel.to_string().lines() {
                write!(f, "\n\t{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DirectoryResolver, StreamId, TimeInterval};
    use chrono::{DateTime, TimeZone, Utc};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap()
    }

    fn create_test_station() -> Station {
        let intervals = || {
            vec![
                TimeInterval::new(hour(0), hour(1)).unwrap(),
                TimeInterval::new(hour(1), hour(2)).unwrap(),
            ]
        };
        Station::new(
            "XX",
            "YY0",
            10.0,
            20.0,
            [
                Channel::new("", "HHZ", intervals()).unwrap(),
                Channel::new("", "LHZ", intervals()).unwrap(),
            ],
        )
    }

    fn statuses(station: &Station) -> Vec<Status> {
        station
            .channels()
            .flat_map(|c| c.intervals().iter().map(TimeInterval::status))
            .collect()
    }

    #[test]
    fn test_channels_are_ordered() {
        let station = create_test_station();
        let codes: Vec<_> = station.channels().map(Channel::code).collect();
        assert_eq!(codes, vec!["HHZ", "LHZ"]);
        assert_eq!(station.interval_count(), 4);
        assert!(station.channel("", "HHZ").is_some());
    }

    #[test]
    fn test_prepare_download_statuses() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("dir");
        let resolver = DirectoryResolver::new(&root);

        // Pre-create the first HHZ file so it is reported as existing.
        std::fs::create_dir_all(&root).unwrap();
        let existing = root.join(DirectoryResolver::file_name(
            &StreamId::new("XX", "YY0", "", "HHZ"),
            hour(0),
            hour(1),
        ));
        std::fs::write(&existing, b"data").unwrap();

        let skip_long_period = move |stream: &StreamId, start, end| {
            if stream.channel == "LHZ" {
                StoragePath::Skip
            } else {
                resolver.resolve(stream, start, end)
            }
        };

        let mut station = create_test_station();
        station.prepare_download(&skip_long_period).unwrap();

        assert_eq!(
            statuses(&station),
            vec![
                Status::Exists,
                Status::NeedsDownloading,
                Status::Ignore,
                Status::Ignore,
            ]
        );
        let hhz = station.channel("", "HHZ").unwrap();
        assert_eq!(hhz.intervals()[0].path(), Some(existing.as_path()));
    }

    #[test]
    fn test_prepare_download_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("a").join("b");
        let resolver = DirectoryResolver::new(&root);

        let mut station = create_test_station();
        station.prepare_download(&resolver).unwrap();

        assert!(root.is_dir());
        assert!(
            statuses(&station)
                .iter()
                .all(|s| *s == Status::NeedsDownloading)
        );
    }

    #[test]
    fn test_prepare_download_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = DirectoryResolver::new(temp_dir.path());

        let mut station = create_test_station();
        station.prepare_download(&resolver).unwrap();
        let first = station.clone();
        station.prepare_download(&resolver).unwrap();

        assert_eq!(station, first);
    }

    #[test]
    fn test_prepare_download_keeps_outcomes() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = DirectoryResolver::new(temp_dir.path());

        let mut station = create_test_station();
        station.prepare_download(&resolver).unwrap();
        for channel in station.channels_mut() {
            channel.intervals_mut()[0]
                .finish(Status::Downloaded)
                .unwrap();
        }
        station.prepare_download(&resolver).unwrap();

        assert_eq!(
            statuses(&station),
            vec![
                Status::Downloaded,
                Status::NeedsDownloading,
                Status::Downloaded,
                Status::NeedsDownloading,
            ]
        );
    }

    #[test]
    fn test_prepare_download_bare_file_name() {
        let mut station = create_test_station();
        let resolver = |stream: &StreamId, _: DateTime<Utc>, _: DateTime<Utc>| {
            StoragePath::Path(PathBuf::from(format!("quarry-test-missing-{stream}")))
        };
        station.prepare_download(&resolver).unwrap();
        assert!(
            statuses(&station)
                .iter()
                .all(|s| *s == Status::NeedsDownloading)
        );
    }
}

//! Core types for the quarry time-series acquisition orchestrator.
//!
//! This crate provides the data model shared by the other quarry crates:
//!
//! - [`TimeInterval`] - One stream over one time window, with its [`Status`]
//! - [`Channel`] - Ordered intervals of one location/channel code
//! - [`Station`] - Channels of one station plus coordinates
//! - [`Restrictions`] - Codes, window and quality criteria of a request
//! - [`Domain`] - Spatial part of a request
//! - [`PathResolver`] - Storage policy for downloaded intervals

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/quarry/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod domain;
mod error;
mod interval;
mod restrictions;
mod station;
mod status;
mod storage;
mod stream;

pub use domain::{CircularDomain, Domain, GlobalDomain, QueryParams, RectangularDomain};
pub use error::{IntervalError, PrepareError, RestrictionsError, TransitionError};
pub use interval::{Channel, TimeInterval};
pub use restrictions::{DEFAULT_CHANNEL_PRIORITIES, DEFAULT_LOCATION_PRIORITIES, Restrictions};
pub use station::{ChannelKey, Station};
pub use status::Status;
pub use storage::{DirectoryResolver, PathResolver, StoragePath};
pub use stream::StreamId;

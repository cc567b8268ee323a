//! Spatial request domains.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Extra query parameters passed through to a provider.
pub type QueryParams = BTreeMap<String, String>;

/// The spatial part of a data request.
///
/// A domain contributes query parameters to the inventory request and may
/// additionally judge individual station coordinates. Domains that the
/// provider query can express exactly return `None` from [`Domain::contains`],
/// which skips post-filtering altogether.
pub trait Domain: Send + Sync + std::fmt::Debug {
    /// Query parameters restricting the inventory request.
    fn query_parameters(&self) -> QueryParams;

    /// Returns whether the coordinates lie inside the domain, or `None` if
    /// the domain does not filter after the query.
    fn contains(&self, latitude: f64, longitude: f64) -> Option<bool> {
        let _ = (latitude, longitude);
        None
    }
}

/// No spatial restriction at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalDomain;

impl Domain for GlobalDomain {
    fn query_parameters(&self) -> QueryParams {
        QueryParams::new()
    }
}

/// A latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularDomain {
    /// Southern bound in degrees.
    pub min_latitude: f64,
    /// Northern bound in degrees.
    pub max_latitude: f64,
    /// Western bound in degrees.
    pub min_longitude: f64,
    /// Eastern bound in degrees.
    pub max_longitude: f64,
}

impl Domain for RectangularDomain {
    fn query_parameters(&self) -> QueryParams {
        QueryParams::from([
            ("minlatitude".to_string(), self.min_latitude.to_string()),
            ("maxlatitude".to_string(), self.max_latitude.to_string()),
            ("minlongitude".to_string(), self.min_longitude.to_string()),
            ("maxlongitude".to_string(), self.max_longitude.to_string()),
        ])
    }

    fn contains(&self, latitude: f64, longitude: f64) -> Option<bool> {
        let lat_ok = (self.min_latitude..=self.max_latitude).contains(&latitude);
        // A box crossing the antimeridian has min > max.
        let lng_ok = if self.min_longitude <= self.max_longitude {
            (self.min_longitude..=self.max_longitude).contains(&longitude)
        } else {
            longitude >= self.min_longitude || longitude <= self.max_longitude
        };
        Some(lat_ok && lng_ok)
    }
}

/// A ring around a point, radii in degrees of arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularDomain {
    /// Centre latitude in degrees.
    pub latitude: f64,
    /// Centre longitude in degrees.
    pub longitude: f64,
    /// Inner radius in degrees.
    pub min_radius: f64,
    /// Outer radius in degrees.
    pub max_radius: f64,
}

impl CircularDomain {
    /// Great-circle distance from the centre to a point, in degrees.
    #[must_use]
    pub fn distance_degrees(&self, latitude: f64, longitude: f64) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        (2.0 * a.sqrt().min(1.0).asin()).to_degrees()
    }
}

impl Domain for CircularDomain {
    fn query_parameters(&self) -> QueryParams {
        QueryParams::from([
            ("latitude".to_string(), self.latitude.to_string()),
            ("longitude".to_string(), self.longitude.to_string()),
            ("minradius".to_string(), self.min_radius.to_string()),
            ("maxradius".to_string(), self.max_radius.to_string()),
        ])
    }

    fn contains(&self, latitude: f64, longitude: f64) -> Option<bool> {
        let distance = self.distance_degrees(latitude, longitude);
        Some(distance >= self.min_radius && distance <= self.max_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_domain() {
        assert!(GlobalDomain.query_parameters().is_empty());
        assert_eq!(GlobalDomain.contains(12.0, 34.0), None);
    }

    #[test]
    fn test_rectangular_domain() {
        let domain = RectangularDomain {
            min_latitude: 30.0,
            max_latitude: 50.0,
            min_longitude: 5.0,
            max_longitude: 35.0,
        };
        assert_eq!(domain.contains(40.0, 10.0), Some(true));
        assert_eq!(domain.contains(60.0, 10.0), Some(false));
        assert_eq!(domain.query_parameters()["maxlongitude"], "35");
    }

    #[test]
    fn test_rectangular_domain_antimeridian() {
        let domain = RectangularDomain {
            min_latitude: -10.0,
            max_latitude: 10.0,
            min_longitude: 170.0,
            max_longitude: -170.0,
        };
        assert_eq!(domain.contains(0.0, 175.0), Some(true));
        assert_eq!(domain.contains(0.0, -175.0), Some(true));
        assert_eq!(domain.contains(0.0, 0.0), Some(false));
    }

    #[test]
    fn test_circular_domain() {
        let domain = CircularDomain {
            latitude: 0.0,
            longitude: 0.0,
            min_radius: 10.0,
            max_radius: 30.0,
        };
        assert!((domain.distance_degrees(0.0, 20.0) - 20.0).abs() < 1e-9);
        assert_eq!(domain.contains(0.0, 20.0), Some(true));
        assert_eq!(domain.contains(0.0, 5.0), Some(false));
        assert_eq!(domain.contains(45.0, 0.0), Some(false));
    }
}

//! Geographic point type and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Mean Earth radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 longitude/latitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees, range [-180, 180].
    pub longitude: f64,
    /// Latitude in degrees, range [-90, 90].
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a point, validating coordinate ranges.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, AppError> {
        if !(-180.0..=180.0).contains(&longitude) || !longitude.is_finite() {
            return Err(AppError::validation(format!(
                "Longitude {longitude} out of range [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) || !latitude.is_finite() {
            return Err(AppError::validation(format!(
                "Latitude {latitude} out of range [-90, 90]"
            )));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Great-circle distance to another point in meters (haversine).
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(181.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -91.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(180.0, 90.0).is_ok());
    }

    #[test]
    fn test_zero_distance_to_self() {
        let p = GeoPoint::new(10.5, 45.0).unwrap();
        assert!(p.distance_meters(&p) < 1e-6);
    }

    #[test]
    fn test_one_degree_latitude_is_about_111_km() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.0, 1.0).unwrap();
        let d = a.distance_meters(&b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }
}

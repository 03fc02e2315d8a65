use serde::Serialize;

use crate::error::AppError;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated WGS84 coordinate. Construction is the only way to get one,
/// so every `GeoPoint` in the system is in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, AppError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidArgument(
                "latitude must be between -90 and 90".to_string(),
            ));
        }

        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::InvalidArgument(
                "longitude must be between -180 and 180".to_string(),
            ));
        }

        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance in meters (haversine). Symmetric and
    /// non-negative; ignores road networks by design of the planner.
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let sin_lat = (delta_lat / 2.0).sin();
        let sin_lng = (delta_lng / 2.0).sin();

        let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
        let central_angle = 2.0 * haversine.sqrt().asin();

        EARTH_RADIUS_M * central_angle
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint::new(30.0444, 31.2357).unwrap();
        let distance = p.distance_meters(&p);
        assert!(distance < 1e-9);
    }

    #[test]
    fn cairo_to_alexandria_is_around_180_km() {
        let cairo = GeoPoint::new(30.0444, 31.2357).unwrap();
        let alexandria = GeoPoint::new(31.2001, 29.9187).unwrap();
        let distance = cairo.distance_meters(&alexandria);
        assert!((distance - 180_000.0).abs() < 5_000.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(30.0, 31.0).unwrap();
        let b = GeoPoint::new(31.0, 30.0).unwrap();
        assert_eq!(a.distance_meters(&b), b.distance_meters(&a));
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        assert!(GeoPoint::new(90.1, 0.0).is_err());
        assert!(GeoPoint::new(-90.1, 0.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        assert!(GeoPoint::new(0.0, 180.1).is_err());
        assert!(GeoPoint::new(0.0, -180.1).is_err());
    }
}

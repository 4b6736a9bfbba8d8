//! Great-circle distance.
//!
//! The clusterer works in angular units: a neighborhood threshold given in
//! kilometers is divided by Earth's mean radius and compared against the
//! haversine central angle between two points. The kilometer wrapper exists
//! for callers and tests that want surface distance directly.

/// Earth's mean radius in kilometers (IUGG mean radius).
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0088;

/// Haversine central angle between two points, in radians.
///
/// Inputs are decimal degrees. The result is the angle subtended at Earth's
/// center; multiply by [`EARTH_MEAN_RADIUS_KM`] for the surface distance.
pub fn haversine_radians(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Haversine distance between two points in kilometers.
///
/// All inputs in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH_MEAN_RADIUS_KM * haversine_radians(lat1, lon1, lat2, lon2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine_radians(48.85, 2.35, 48.85, 2.35), 0.0);
        assert_eq!(haversine_km(-12.0, 130.0, -12.0, 130.0), 0.0);
    }

    #[test]
    fn symmetric_in_its_arguments() {
        let ab = haversine_km(52.52, 13.40, 41.90, 12.50);
        let ba = haversine_km(41.90, 12.50, 52.52, 13.40);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        // One degree of arc on the mean-radius sphere is ~111.195 km.
        let d = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.1949).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn antipodal_points_along_the_equator() {
        let angle = haversine_radians(0.0, 0.0, 0.0, 180.0);
        assert!((angle - std::f64::consts::PI).abs() < 1e-12);
    }
}

//! Great-circle distance math for the dedup scan and nothing else.

/// Earth's radius in kilometers (for Haversine formula)
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates in kilometers.
///
/// Callers are expected to reject NaN/out-of-range coordinates before
/// invoking; this function does no validation of its own.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let d = haversine_km(-6.2088, 106.8456, -6.2088, 106.8456);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let a = haversine_km(51.5074, -0.1278, 48.8566, 2.3522);
        let b = haversine_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_known_pairs() {
        // London -> Paris, approx 343.5 km great-circle
        let d = haversine_km(51.5074, -0.1278, 48.8566, 2.3522);
        assert!(d > 340.0 && d < 348.0, "got {}", d);

        // Jakarta -> Bandung, approx 116 km great-circle
        let d = haversine_km(-6.2088, 106.8456, -6.9175, 107.6191);
        assert!(d > 110.0 && d < 125.0, "got {}", d);
    }

    #[test]
    fn test_fifty_meters_in_latitude() {
        // 0.00045 degrees of latitude is just over 50 m
        let d = haversine_km(-6.2, 106.8, -6.20045, 106.8);
        assert!(d > 0.049 && d < 0.051, "got {}", d);
    }
}

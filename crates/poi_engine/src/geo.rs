//! Spherical-earth navigation math and the search ring.
//!
//! The upstream geosearch caps its radius at 10 km. To cover a wider
//! neighborhood the watcher searches around the vessel itself plus eight
//! satellite points placed on the compass rose at a fixed distance.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Bearing: degrees true, clockwise from north; both -180..180 and 0..360
//!   are accepted
//! - Distance: kilometers

use std::f64::consts::PI;

use common::Coordinate;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Bearings of the satellite points, in emitted order.
pub const RING_BEARINGS: [f64; 8] = [0.0, -45.0, -90.0, -135.0, 180.0, 135.0, 90.0, 45.0];

/// Number of coordinates in a ring: the center plus one per bearing.
pub const RING_SIZE: usize = RING_BEARINGS.len() + 1;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Project `center` along `bearing_deg` for `distance_km` on a great circle.
///
/// No longitude normalization or latitude clamping is applied, so inputs at
/// the poles or near the antimeridian come back exactly as the formula
/// yields them.
///
/// # Example
///
/// ```
/// use common::Coordinate;
/// use poi_engine::geo::destination;
///
/// // ~111 km north of the equator is about one degree of latitude.
/// let p = destination(Coordinate::new(0.0, 0.0), 0.0, 111.195);
/// assert!((p.latitude - 1.0).abs() < 0.001);
/// assert!(p.longitude.abs() < 1e-9);
/// ```
pub fn destination(center: Coordinate, bearing_deg: f64, distance_km: f64) -> Coordinate {
    let lat1 = center.latitude * DEG_TO_RAD;
    let lon1 = center.longitude * DEG_TO_RAD;
    let bearing = bearing_deg * DEG_TO_RAD;
    let angular = distance_km / EARTH_RADIUS_KM;

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = angular.sin_cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * bearing.cos()).asin();
    let lon2 = lon1 + (bearing.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin());

    Coordinate::new(lat2 * RAD_TO_DEG, lon2 * RAD_TO_DEG)
}

/// The center followed by one point per [`RING_BEARINGS`] entry at `radius_km`.
pub fn ring(center: Coordinate, radius_km: f64) -> [Coordinate; RING_SIZE] {
    let mut points = [center; RING_SIZE];
    for (slot, bearing) in points[1..].iter_mut().zip(RING_BEARINGS) {
        *slot = destination(center, bearing, radius_km);
    }
    points
}

/// Haversine great-circle distance in kilometers.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude * DEG_TO_RAD;
    let lat2 = to.latitude * DEG_TO_RAD;
    let dlat = lat2 - lat1;
    let dlon = (to.longitude - from.longitude) * DEG_TO_RAD;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Farthest distance from `center` to any of `points`, in kilometers.
pub fn reach_km(center: Coordinate, points: &[Coordinate]) -> f64 {
    points
        .iter()
        .map(|p| distance_km(center, *p))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEATTLE: Coordinate = Coordinate {
        latitude: 47.6062,
        longitude: -122.3321,
    };

    #[test]
    fn test_north_and_south_move_latitude_by_angular_distance() {
        for &(lat, lon) in &[(0.0, 0.0), (47.6062, -122.3321), (-33.86, 151.21), (60.0, 5.0)] {
            let start = Coordinate::new(lat, lon);
            for d in [0.0, 1.0, 20.0, 150.0] {
                let expected_deg = d / EARTH_RADIUS_KM * RAD_TO_DEG;

                let north = destination(start, 0.0, d);
                assert!((north.latitude - lat - expected_deg).abs() < 1e-9);
                assert!((north.longitude - lon).abs() < 1e-9);

                let south = destination(start, 180.0, d);
                assert!((lat - south.latitude - expected_deg).abs() < 1e-9);
                assert!((south.longitude - lon).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_negative_bearing_matches_positive_equivalent() {
        let a = destination(SEATTLE, -45.0, 20.0);
        let b = destination(SEATTLE, 315.0, 20.0);
        assert!((a.latitude - b.latitude).abs() < 1e-12);
        assert!((a.longitude - b.longitude).abs() < 1e-12);
    }

    #[test]
    fn test_east_and_west_are_symmetric() {
        let east = destination(SEATTLE, 90.0, 20.0);
        let west = destination(SEATTLE, -90.0, 20.0);
        assert!(east.longitude > SEATTLE.longitude);
        assert!(west.longitude < SEATTLE.longitude);
        assert!((east.latitude - west.latitude).abs() < 1e-9);
        assert!(((east.longitude - SEATTLE.longitude) + (west.longitude - SEATTLE.longitude)).abs() < 1e-9);
    }

    #[test]
    fn test_pole_is_accepted() {
        let p = destination(Coordinate::new(90.0, 0.0), 45.0, 20.0);
        assert!(p.latitude.is_finite());
        assert!(p.latitude < 90.0);
    }

    #[test]
    fn test_ring_has_center_and_eight_points() {
        let points = ring(SEATTLE, 20.0);

        assert_eq!(points.len(), 9);
        assert_eq!(points[0], SEATTLE);
        assert_eq!(points.iter().filter(|p| **p == SEATTLE).count(), 1);
    }

    #[test]
    fn test_ring_points_lie_on_radius() {
        let points = ring(SEATTLE, 20.0);

        for p in &points[1..] {
            let d = distance_km(SEATTLE, *p);
            assert!((d - 20.0).abs() < 0.01, "point {p} is {d} km away");
            assert!(d <= 20.1);
        }
    }

    #[test]
    fn test_ring_order_follows_bearings() {
        let points = ring(SEATTLE, 20.0);

        // north, then counter-clockwise through west and south to east
        assert!(points[1].latitude > SEATTLE.latitude);
        assert!(points[3].longitude < SEATTLE.longitude);
        assert!(points[5].latitude < SEATTLE.latitude);
        assert!(points[7].longitude > SEATTLE.longitude);
    }

    #[test]
    fn test_reach_is_ring_radius() {
        let points = ring(SEATTLE, 20.0);
        assert!((reach_km(SEATTLE, &points) - 20.0).abs() < 0.01);
        assert_eq!(reach_km(SEATTLE, &[SEATTLE]), 0.0);
        assert_eq!(reach_km(SEATTLE, &[]), 0.0);
    }

    #[test]
    fn test_distance_one_degree_of_latitude() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01);
        assert_eq!(distance_km(SEATTLE, SEATTLE), 0.0);
    }
}

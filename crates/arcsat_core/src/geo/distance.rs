use crate::GeoPoint;

/// Earth's mean radius in meters.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Distance between two points in meters.
pub trait DistanceMetric {
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64;
}

/// Great-circle distance on a sphere of [`EARTH_MEAN_RADIUS_M`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        haversine_m(a, b)
    }
}

pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.latitude().to_radians(), b.latitude().to_radians());
    let dlat = (b.latitude() - a.latitude()).to_radians();
    let dlng = (b.longitude() - a.longitude()).to_radians();
    let s1 = (dlat / 2.0).sin();
    let s2 = (dlng / 2.0).sin();
    let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
    // rounding can push h a hair above 1 for antipodal points
    2.0 * EARTH_MEAN_RADIUS_M * h.min(1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::{DistanceMetric, EARTH_MEAN_RADIUS_M, Haversine, haversine_m};
    use crate::GeoPoint;

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).expect("valid point")
    }

    #[test]
    fn distance_is_symmetric_and_zero_for_same_point() {
        let a = p(37.7749, -122.4194);
        let b = p(34.0522, -118.2437);

        let dab = Haversine.distance(a, b);
        let dba = Haversine.distance(b, a);

        assert!((dab - dba).abs() < 1e-6);
        assert!(Haversine.distance(a, a).abs() < 1e-12);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_m(p(0.0, 0.0), p(1.0, 0.0));
        let expected = EARTH_MEAN_RADIUS_M * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-6);
        assert!((d / 1000.0 - 111.19).abs() < 0.01);
    }

    #[test]
    fn campinas_to_santos_matches_known_distance() {
        let campinas = p(-22.9099, -47.0626);
        let santos = p(-23.9618, -46.3322);
        let km = haversine_m(campinas, santos) / 1000.0;
        assert!((km - 138.0).abs() < 2.0, "got {km}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let d = haversine_m(p(0.0, 0.0), p(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_MEAN_RADIUS_M).abs() < 1e-3);
    }

    #[test]
    fn small_distances_stay_positive() {
        let a = p(-22.9099, -47.0626);
        let b = p(-22.9099, -47.06261);
        let d = haversine_m(a, b);
        assert!(d > 0.0 && d < 2.0);
    }
}

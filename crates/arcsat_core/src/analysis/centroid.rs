use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Category, GeoPoint, LocatedEntity};

/// Mean position of one category's members.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CentroidResult {
    pub category: Category,
    pub center: GeoPoint,
    pub member_count: usize,
}

#[derive(Default)]
struct Accumulator {
    lat: f64,
    lng: f64,
    n: usize,
}

/// One centroid per non-empty category.
///
/// Latitude and longitude are averaged independently. That is a planar
/// approximation, not a spherical centroid, and it is what the map layer
/// has always displayed.
pub fn compute_centroids(points: &[LocatedEntity]) -> BTreeMap<Category, CentroidResult> {
    let mut sums: BTreeMap<Category, Accumulator> = BTreeMap::new();
    for entity in points {
        let acc = sums.entry(entity.category).or_default();
        acc.lat += entity.location.latitude();
        acc.lng += entity.location.longitude();
        acc.n += 1;
    }

    let mut out = BTreeMap::new();
    for (category, acc) in sums {
        let n = acc.n as f64;
        // the mean of in-range values stays in range
        let Ok(center) = GeoPoint::new(acc.lat / n, acc.lng / n) else {
            log::warn!("centroid: skipped category={category} n={}", acc.n);
            continue;
        };
        log::debug!("centroid: category={category} n={} center={center}", acc.n);
        out.insert(
            category,
            CentroidResult {
                category,
                center,
                member_count: acc.n,
            },
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::compute_centroids;
    use crate::{Category, GeoPoint, LocatedEntity};

    fn entity(id: &str, category: Category, lat: f64, lng: f64) -> LocatedEntity {
        LocatedEntity::new(
            id,
            id,
            category,
            GeoPoint::new(lat, lng).expect("valid point"),
        )
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(compute_centroids(&[]).is_empty());
    }

    #[test]
    fn two_categories_average_independently() {
        let points = vec![
            entity("s1", Category::Supplier, 0.0, 0.0),
            entity("s2", Category::Supplier, 2.0, 0.0),
            entity("b1", Category::Buyer, 0.0, 2.0),
        ];

        let centroids = compute_centroids(&points);
        assert_eq!(centroids.len(), 2);

        let suppliers = centroids[&Category::Supplier];
        assert!((suppliers.center.latitude() - 1.0).abs() < 1e-12);
        assert!(suppliers.center.longitude().abs() < 1e-12);
        assert_eq!(suppliers.member_count, 2);

        let buyers = centroids[&Category::Buyer];
        assert!(buyers.center.latitude().abs() < 1e-12);
        assert!((buyers.center.longitude() - 2.0).abs() < 1e-12);
        assert_eq!(buyers.member_count, 1);

        assert!(!centroids.contains_key(&Category::Client));
    }

    #[test]
    fn centers_equal_arithmetic_means_regardless_of_order() {
        let points = vec![
            entity("a", Category::Client, -22.9099, -47.0626),
            entity("b", Category::Supplier, -23.9618, -46.3322),
            entity("c", Category::Client, -21.1699, -47.8099),
            entity("d", Category::Client, -19.7479, -47.9381),
        ];
        let mut reversed = points.clone();
        reversed.reverse();

        let forward = compute_centroids(&points);
        let backward = compute_centroids(&reversed);

        let clients = forward[&Category::Client];
        let mean_lat = (-22.9099 + -21.1699 + -19.7479) / 3.0;
        let mean_lng = (-47.0626 + -47.8099 + -47.9381) / 3.0;
        assert!((clients.center.latitude() - mean_lat).abs() < 1e-9);
        assert!((clients.center.longitude() - mean_lng).abs() < 1e-9);
        assert_eq!(clients.member_count, 3);

        let other = backward[&Category::Client];
        assert!((clients.center.latitude() - other.center.latitude()).abs() < 1e-9);
        assert!((clients.center.longitude() - other.center.longitude()).abs() < 1e-9);
    }

    #[test]
    fn input_is_left_untouched() {
        let points = vec![entity("a", Category::Buyer, 10.0, 20.0)];
        let before = points.clone();
        let _ = compute_centroids(&points);
        assert_eq!(points, before);
    }
}

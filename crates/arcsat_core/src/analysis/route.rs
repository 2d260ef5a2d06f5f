use arcsat_derive::New;
use serde::Serialize;

use crate::{DistanceMetric, Error, GeoPoint, Haversine, LocatedEntity, Result};

const MIN_ROUTE_POINTS: usize = 2;
const METERS_PER_KM: f64 = 1_000.0;

/// Open visiting sequence produced by [`optimize_route`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteResult {
    /// Permutation of the input, starting at the input's first element.
    pub ordered_entities: Vec<LocatedEntity>,
    pub total_distance_km: f64,
    /// `leg_distances_m[i]` is the distance from stop `i` to stop `i + 1`.
    pub leg_distances_m: Vec<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, New)]
pub struct RouteMetrics {
    pub legs: usize,
    pub total_m: f64,
    pub longest_m: f64,
    pub average_m: f64,
}

impl RouteResult {
    pub fn len(&self) -> usize {
        self.ordered_entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_entities.is_empty()
    }

    /// Polyline of the route in visiting order.
    pub fn path(&self) -> Vec<GeoPoint> {
        self.ordered_entities.iter().map(|e| e.location).collect()
    }

    pub fn metrics(&self) -> RouteMetrics {
        let legs = self.leg_distances_m.len();
        if legs == 0 {
            log::info!("metrics: n={} nothing to report", self.len());
            return RouteMetrics::default();
        }

        let total: f64 = self.leg_distances_m.iter().sum();
        let longest = self.leg_distances_m.iter().copied().fold(0.0_f64, f64::max);
        let average = total / legs as f64;

        log::info!(
            "metrics: n={} legs={legs} total_m={total:.0} longest_m={longest:.0} avg_m={average:.0}",
            self.len()
        );

        RouteMetrics::new(legs, total, longest, average)
    }
}

/// Greedy nearest-neighbor tour over `points` using haversine distance.
///
/// See [`optimize_route_with`].
pub fn optimize_route(points: &[LocatedEntity]) -> Result<RouteResult> {
    optimize_route_with(points, &Haversine)
}

/// Greedy nearest-neighbor tour.
///
/// The tour starts at `points[0]` and repeatedly moves to the closest
/// unvisited point; on equal distances the point that comes first in `points`
/// wins. The tour is open (no return leg). This is a construction heuristic
/// with no improvement pass, so the result is not an optimal TSP tour.
/// Runs in O(n²) distance evaluations.
pub fn optimize_route_with<M: DistanceMetric + ?Sized>(
    points: &[LocatedEntity],
    metric: &M,
) -> Result<RouteResult> {
    let n = points.len();
    if n < MIN_ROUTE_POINTS {
        return Err(Error::InsufficientPoints { found: n });
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut legs = Vec::with_capacity(n - 1);

    let mut current = 0;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let from = points[current].location;
        let mut best: Option<(usize, f64)> = None;

        for (idx, candidate) in points.iter().enumerate() {
            if visited[idx] {
                continue;
            }
            let d = metric.distance(from, candidate.location);
            // strict `<` keeps the earliest candidate on ties; a NaN from a
            // custom metric only survives until a real distance shows up
            let better = match best {
                None => true,
                Some((_, best_d)) => d < best_d || (best_d.is_nan() && !d.is_nan()),
            };
            if better {
                best = Some((idx, d));
            }
        }

        // at least one point is unvisited while order.len() < n
        let Some((next, d)) = best else {
            break;
        };
        visited[next] = true;
        order.push(next);
        legs.push(d);
        current = next;
    }

    let total_m: f64 = legs.iter().sum();
    log::debug!(
        "route: n={n} legs={} total_km={:.2}",
        legs.len(),
        total_m / METERS_PER_KM
    );

    Ok(RouteResult {
        ordered_entities: order.into_iter().map(|idx| points[idx].clone()).collect(),
        total_distance_km: total_m / METERS_PER_KM,
        leg_distances_m: legs,
    })
}

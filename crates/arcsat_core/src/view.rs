use std::{collections::BTreeMap, fmt};

use crate::{
    Category, CentroidResult, Error, GeoPoint, LocatedEntity, MapRenderer, Result, RouteResult,
    compute_centroids, optimize_route,
};

/// Category filter applied to the map.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Filter {
    #[default]
    All,
    Only(Category),
}

impl Filter {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Category::parse(raw)
            .map(Self::Only)
            .map_err(|_| {
                Error::invalid_input(format!(
                    "Invalid value for --filter: {raw} (expected all|{})",
                    Category::NAMES.join("|")
                ))
            })
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Map-side state: the loaded entities, the active filter, and the overlays
/// computed from the visible subset.
///
/// The analyzers never see this type. They get a snapshot from [`MapView::visible`].
#[derive(Debug, Default)]
pub struct MapView {
    entities: Vec<LocatedEntity>,
    filter: Filter,
    heatmap: bool,
    centroids: BTreeMap<Category, CentroidResult>,
    route: Option<RouteResult>,
}

impl MapView {
    pub fn new(entities: Vec<LocatedEntity>) -> Self {
        Self {
            entities,
            ..Self::default()
        }
    }

    pub fn add(&mut self, entity: LocatedEntity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Changes the category filter. Switching filters hides the heatmap.
    pub fn set_filter(&mut self, filter: Filter) {
        log::debug!("view: filter {} -> {filter}", self.filter);
        self.filter = filter;
        self.heatmap = false;
    }

    /// Snapshot of the entities passing the current filter, in load order.
    pub fn visible(&self) -> Vec<LocatedEntity> {
        self.visible_iter().cloned().collect()
    }

    fn visible_iter(&self) -> impl Iterator<Item = &LocatedEntity> {
        self.entities
            .iter()
            .filter(|e| self.filter.matches(e.category))
    }

    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for entity in self.visible_iter() {
            *counts.entry(entity.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn heatmap_enabled(&self) -> bool {
        self.heatmap
    }

    /// Flips the heatmap layer; markers are hidden while it is shown.
    pub fn toggle_heatmap(&mut self) -> bool {
        self.heatmap = !self.heatmap;
        self.heatmap
    }

    pub fn heatmap_points(&self) -> Vec<GeoPoint> {
        self.visible_iter().map(|e| e.location).collect()
    }

    /// Replaces the centroid overlay with supplier and buyer centroids of the
    /// visible set. Generic clients get no centroid marker.
    pub fn calculate_centroids(&mut self) -> &BTreeMap<Category, CentroidResult> {
        let snapshot: Vec<LocatedEntity> = self
            .visible_iter()
            .filter(|e| matches!(e.category, Category::Supplier | Category::Buyer))
            .cloned()
            .collect();
        self.centroids = compute_centroids(&snapshot);

        let count = |c: Category| self.centroids.get(&c).map_or(0, |r| r.member_count);
        log::info!(
            "view: centroids calculated suppliers={} buyers={}",
            count(Category::Supplier),
            count(Category::Buyer)
        );
        &self.centroids
    }

    /// Routes through the visible set. A failed attempt leaves the previous
    /// route overlay untouched.
    pub fn optimize_route(&mut self) -> Result<&RouteResult> {
        let route = optimize_route(&self.visible())?;
        log::info!(
            "view: route optimized points={} distance_km={:.2}",
            route.len(),
            route.total_distance_km
        );
        Ok(self.route.insert(route))
    }

    pub fn centroids(&self) -> &BTreeMap<Category, CentroidResult> {
        &self.centroids
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn clear_overlays(&mut self) {
        self.centroids.clear();
        self.route = None;
    }

    /// Draws the current state: markers or heatmap, then centroids, then the route.
    pub fn render<R: MapRenderer + ?Sized>(&self, renderer: &mut R) {
        if self.heatmap {
            renderer.draw_heatmap(&self.heatmap_points());
        } else {
            for entity in self.visible_iter() {
                renderer.draw_marker(entity);
            }
        }
        for centroid in self.centroids.values() {
            renderer.draw_centroid(centroid);
        }
        if let Some(route) = &self.route {
            renderer.draw_route(route);
        }
    }
}

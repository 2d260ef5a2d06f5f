use std::{fs::File, io::BufWriter, path::Path};

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value, feature::Id};
use serde_json::json;

use crate::{CentroidResult, GeoPoint, LocatedEntity, Result, RouteResult};

const ROUTE_COLOR: &str = "#2d5016";

/// Drawing surface fed by [`crate::MapView::render`].
pub trait MapRenderer {
    fn draw_marker(&mut self, entity: &LocatedEntity);
    fn draw_heatmap(&mut self, points: &[GeoPoint]);
    fn draw_centroid(&mut self, centroid: &CentroidResult);
    fn draw_route(&mut self, route: &RouteResult);
}

/// Collects the map state as a GeoJSON FeatureCollection.
#[derive(Debug, Default)]
pub struct GeoJsonRenderer {
    features: Vec<Feature>,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn into_collection(self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members: None,
        }
    }

    pub fn write_to(self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        let count = self.len();
        serde_json::to_writer_pretty(writer, &self.into_collection())?;
        log::info!("render: wrote features={count} to {}", path.display());
        Ok(())
    }

    fn push(&mut self, id: Option<String>, value: Value, properties: JsonObject) {
        self.features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: id.map(Id::String),
            properties: Some(properties),
            foreign_members: None,
        });
    }
}

fn properties(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

impl MapRenderer for GeoJsonRenderer {
    fn draw_marker(&mut self, entity: &LocatedEntity) {
        let mut props = properties(json!({
            "kind": "marker",
            "name": entity.display_name,
            "category": entity.category.as_str(),
            "color": entity.category.color(),
        }));
        for (key, value) in &entity.attributes {
            props.insert(key.clone(), json!(value));
        }
        self.push(
            Some(entity.id.clone()),
            Value::Point(entity.location.lng_lat()),
            props,
        );
    }

    fn draw_heatmap(&mut self, points: &[GeoPoint]) {
        if points.is_empty() {
            return;
        }
        self.push(
            None,
            Value::MultiPoint(points.iter().map(GeoPoint::lng_lat).collect()),
            properties(json!({ "kind": "heatmap", "points": points.len() })),
        );
    }

    fn draw_centroid(&mut self, centroid: &CentroidResult) {
        self.push(
            Some(format!("centroid-{}", centroid.category)),
            Value::Point(centroid.center.lng_lat()),
            properties(json!({
                "kind": "centroid",
                "label": format!("{} centroid", centroid.category.label()),
                "category": centroid.category.as_str(),
                "member_count": centroid.member_count,
                "color": centroid.category.color(),
            })),
        );
    }

    fn draw_route(&mut self, route: &RouteResult) {
        self.push(
            Some("route".to_string()),
            Value::LineString(route.path().iter().map(GeoPoint::lng_lat).collect()),
            properties(json!({
                "kind": "route",
                "points": route.len(),
                "distance_km": route.total_distance_km,
                "color": ROUTE_COLOR,
            })),
        );
    }
}

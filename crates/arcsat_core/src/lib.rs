//! Geospatial analytics for business locations: haversine distances,
//! per-category centroids and greedy nearest-neighbor routes over a filtered map view.

mod analysis;
pub mod cities;
mod classify;
mod entity;
mod error;
mod geo;
mod geocode;
mod io;
pub mod logging;
mod mock;
mod render;
mod view;

pub use io::{export, options};

pub use analysis::centroid::{CentroidResult, compute_centroids};
pub use analysis::route::{RouteMetrics, RouteResult, optimize_route, optimize_route_with};
pub use classify::{Classifier, KeywordClassifier};
pub use entity::{Category, LocatedEntity};
pub use error::{Error, Result};
pub use geo::distance::{DistanceMetric, EARTH_MEAN_RADIUS_M, Haversine, haversine_m};
pub use geo::point::GeoPoint;
pub use geocode::{CityTableGeocoder, GeocodeQueue, GeocodeReport, Geocoder};
pub use io::options::{Analysis, AppOptions, LogFormat, LogLevel};
pub use io::records::{
    Address, AddressParts, BusinessRecord, PendingLocation, RelationshipLink, load_links,
    load_records, pending_locations,
};
pub use mock::MockGenerator;
pub use render::{GeoJsonRenderer, MapRenderer};
pub use view::{Filter, MapView};

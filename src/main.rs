use std::{sync::Arc, time::Instant};

use log::{info, warn};

use arcsat_core::{
    AppOptions, BusinessRecord, CityTableGeocoder, Error, GeoJsonRenderer, GeocodeQueue, Geocoder,
    KeywordClassifier, MapView, MockGenerator, Result, export, load_links, load_records, logging,
    pending_locations,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = AppOptions::from_args()?;
    logging::init_logger(&options)?;

    info!("options: {options}");

    let records = load_or_mock(&options);
    if let Some(path) = options.links.as_deref() {
        match load_links(path) {
            Ok(links) => info!("links: n={} path={}", links.len(), path.display()),
            Err(err) => warn!("links: skipped err={err}"),
        }
    }

    let pending = pending_locations(records);
    let geocoder: Arc<dyn Geocoder> = Arc::new(CityTableGeocoder);
    let queue = GeocodeQueue::new(options.geocode_delay(), options.geocode_timeout());
    let (located, _) = queue.resolve_all(&geocoder, pending);

    let classifier = KeywordClassifier::default();
    let entities = located
        .into_iter()
        .map(|(pending, location)| pending.record.into_entity(pending.id, location, &classifier))
        .collect();

    let mut view = MapView::new(entities);
    view.set_filter(options.filter);
    if options.heatmap {
        view.toggle_heatmap();
    }
    for (category, count) in view.count_by_category() {
        info!("view: category={category} n={count}");
    }

    if options.analysis.centroids() {
        for centroid in view.calculate_centroids().values() {
            info!(
                "centroid: category={} center={} n={}",
                centroid.category, centroid.center, centroid.member_count
            );
        }
    }

    if options.analysis.route() {
        match view.optimize_route() {
            Ok(route) => {
                info!(
                    "route: stops={} total_km={:.2}",
                    route.len(),
                    route.total_distance_km
                );
                route.metrics();
            }
            Err(err @ Error::InsufficientPoints { .. }) => warn!("route: skipped err={err}"),
            Err(err) => return Err(err),
        }
    }

    if let Some(path) = options.geojson.as_deref() {
        let mut renderer = GeoJsonRenderer::new();
        view.render(&mut renderer);
        info!("geojson: features={} path={}", renderer.len(), path.display());
        renderer.write_to(path)?;
    }

    if let Some(path) = options.csv.as_deref() {
        let rows = export::write_csv_file(export::entity_rows(&view.visible()), path)?;
        info!("csv: rows={rows} path={}", path.display());
    }

    if let Some(path) = options.route_csv.as_deref() {
        match view.route() {
            Some(route) => {
                let rows = export::write_csv_file(export::route_rows(route), path)?;
                info!("route csv: rows={rows} path={}", path.display());
            }
            None => warn!("route csv: no route computed, skipping {}", path.display()),
        }
    }

    info!(
        "output: n={} time={:.2}s",
        view.visible().len(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}

fn load_or_mock(options: &AppOptions) -> Vec<BusinessRecord> {
    if let Some(path) = options.clients.as_deref() {
        match load_records(path) {
            Ok(records) => {
                info!("clients: n={} path={}", records.len(), path.display());
                return records;
            }
            Err(err) => warn!("clients: falling back to mock data err={err}"),
        }
    }

    let records = MockGenerator::new(options.seed).generate(options.mock_count);
    info!("clients: mock n={} seed={}", records.len(), options.seed);
    records
}

use std::{
    sync::{Arc, Mutex, PoisonError, mpsc},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crate::{GeoPoint, PendingLocation, Result, cities};

const DEFAULT_DELAY: Duration = Duration::from_millis(100);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_REGION_SUFFIX: &str = ", Brazil";

/// Resolves a postal address to coordinates.
///
/// `Ok(None)` means the provider had no match. Errors are reserved for
/// provider failures; the queue treats both the same way.
pub trait Geocoder: Send + Sync {
    fn lookup(&self, address: &str) -> Result<Option<GeoPoint>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeocodeReport {
    pub attempted: usize,
    pub resolved: usize,
    pub timed_out: usize,
}

/// Sequential, rate-limited geocoding.
///
/// One request is in flight at a time, with `delay` between requests. A lookup
/// that errors, finds nothing, or runs past `timeout` yields `None` and the
/// batch moves on. A timed-out lookup still holds its slot: the next request
/// is not sent until it has returned.
#[derive(Debug)]
pub struct GeocodeQueue {
    delay: Duration,
    timeout: Duration,
    region_suffix: String,
    stalled: Mutex<Option<JoinHandle<()>>>,
}

impl Default for GeocodeQueue {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            timeout: DEFAULT_TIMEOUT,
            region_suffix: DEFAULT_REGION_SUFFIX.to_string(),
            stalled: Mutex::new(None),
        }
    }
}

enum Outcome {
    Found(GeoPoint),
    Missing,
    TimedOut,
}

impl GeocodeQueue {
    pub fn new(delay: Duration, timeout: Duration) -> Self {
        Self {
            delay,
            timeout,
            ..Self::default()
        }
    }

    pub fn with_region_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.region_suffix = suffix.into();
        self
    }

    pub fn query_for(&self, address: &str) -> String {
        format!("{address}{}", self.region_suffix)
    }

    /// Looks up a single address, never failing.
    pub fn resolve_one(&self, geocoder: &Arc<dyn Geocoder>, address: &str) -> Option<GeoPoint> {
        match self.lookup_with_timeout(geocoder, address) {
            Outcome::Found(point) => Some(point),
            Outcome::Missing | Outcome::TimedOut => None,
        }
    }

    /// Resolves every pending location in order.
    ///
    /// Records that already carry a position are passed through without a
    /// request. Unresolved records are dropped from the output.
    pub fn resolve_all(
        &self,
        geocoder: &Arc<dyn Geocoder>,
        pending: Vec<PendingLocation>,
    ) -> (Vec<(PendingLocation, GeoPoint)>, GeocodeReport) {
        let total = pending.len();
        let now = Instant::now();
        let mut report = GeocodeReport::default();
        let mut resolved = Vec::with_capacity(total);
        let mut first_request = true;

        for item in pending {
            if let Some(position) = item.record.position {
                resolved.push((item, position));
                continue;
            }

            if !first_request && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            first_request = false;
            report.attempted += 1;

            match self.lookup_with_timeout(geocoder, &item.address) {
                Outcome::Found(point) => {
                    report.resolved += 1;
                    resolved.push((item, point));
                }
                Outcome::Missing => {}
                Outcome::TimedOut => report.timed_out += 1,
            }
        }

        log::info!(
            "geocode: geocoded {} of {} locations (requests={} timed_out={} time={:.2}s)",
            resolved.len(),
            total,
            report.attempted,
            report.timed_out,
            now.elapsed().as_secs_f32()
        );

        (resolved, report)
    }

    /// Blocks until a lookup that outlived its timeout has returned.
    fn wait_for_stalled(&self) {
        let stalled = self
            .stalled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = stalled else {
            return;
        };
        log::debug!("geocode: waiting for stalled lookup before next request");
        if handle.join().is_err() {
            log::warn!("geocode: stalled lookup thread panicked");
        }
    }

    fn lookup_with_timeout(&self, geocoder: &Arc<dyn Geocoder>, address: &str) -> Outcome {
        self.wait_for_stalled();

        let query = self.query_for(address);
        let (tx, rx) = mpsc::channel();
        let worker = Arc::clone(geocoder);
        let worker_query = query.clone();

        let spawned = thread::Builder::new()
            .name("geocode".into())
            .spawn(move || {
                // receiver may be gone after a timeout
                let _ = tx.send(worker.lookup(&worker_query));
            });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("geocode: failed to spawn lookup thread query={query:?} err={err}");
                return Outcome::Missing;
            }
        };

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(Some(point))) => {
                log::debug!("geocode: query={query:?} point={point}");
                Outcome::Found(point)
            }
            Ok(Ok(None)) => {
                log::warn!("geocode: no result query={query:?}");
                Outcome::Missing
            }
            Ok(Err(err)) => {
                log::warn!("geocode: lookup failed query={query:?} err={err}");
                Outcome::Missing
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                log::warn!(
                    "geocode: timed out query={query:?} timeout_ms={}",
                    self.timeout.as_millis()
                );
                *self.stalled.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                Outcome::TimedOut
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                log::warn!("geocode: lookup thread panicked query={query:?}");
                Outcome::Missing
            }
        }
    }
}

/// Offline geocoder backed by the built-in city table.
///
/// Matches the last `City, UF` pair in the address, or failing that any
/// component equal to a known city name.
#[derive(Clone, Copy, Debug, Default)]
pub struct CityTableGeocoder;

impl Geocoder for CityTableGeocoder {
    fn lookup(&self, address: &str) -> Result<Option<GeoPoint>> {
        let parts: Vec<&str> = address
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .filter(|p| !p.eq_ignore_ascii_case("brazil") && !p.eq_ignore_ascii_case("brasil"))
            .collect();

        let qualified = parts
            .windows(2)
            .rev()
            .find_map(|pair| match pair {
                [name, uf] if uf.len() == 2 => cities::find(name, Some(*uf)),
                _ => None,
            });
        let city = qualified.or_else(|| parts.iter().rev().find_map(|p| cities::find(p, None)));

        city.map(|c| GeoPoint::new(c.lat, c.lng)).transpose()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// A validated WGS84 position in degrees.
///
/// Construction rejects non-finite or out-of-range values, so every `GeoPoint`
/// in circulation is safe to feed to the distance metric.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng", into = "RawLatLng")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

/// Wire shape used by records and mock data: `{ "lat": .., "lng": .. }`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if is_valid(latitude, longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// GeoJSON position order.
    pub fn lng_lat(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

fn is_valid(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-NINETY..=NINETY).contains(&latitude)
        && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&longitude)
}

impl TryFrom<RawLatLng> for GeoPoint {
    type Error = Error;

    fn try_from(raw: RawLatLng) -> Result<Self> {
        Self::new(raw.lat, raw.lng)
    }
}

impl From<GeoPoint> for RawLatLng {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.latitude,
            lng: point.longitude,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(
            f,
            "{},{}",
            b1.format(self.latitude),
            b2.format(self.longitude)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;
    use crate::Error;

    #[test]
    fn bounds_are_inclusive() {
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn out_of_range_and_non_finite_values_are_rejected() {
        for (lat, lng) in [
            (91.0, 0.0),
            (0.0, 181.0),
            (f64::NAN, 0.0),
            (0.0, f64::INFINITY),
        ] {
            let err = GeoPoint::new(lat, lng).expect_err("coordinate should be rejected");
            assert!(matches!(err, Error::InvalidCoordinate { .. }));
        }
    }

    #[test]
    fn display_formats_as_lat_lng() {
        let point = GeoPoint::new(1.5, -2.25).expect("valid point");
        assert_eq!(point.to_string(), "1.5,-2.25");
    }

    #[test]
    fn deserialize_validates_range() {
        let ok: GeoPoint =
            serde_json::from_str(r#"{"lat": -22.9099, "lng": -47.0626}"#).expect("valid json");
        assert_eq!(ok.latitude(), -22.9099);
        assert_eq!(ok.lng_lat(), vec![-47.0626, -22.9099]);

        let err = serde_json::from_str::<GeoPoint>(r#"{"lat": 120.0, "lng": 0.0}"#);
        assert!(err.is_err());
    }
}

//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A WGS-84 position, serialized as `[lon, lat]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LonLat(pub f64, pub f64);

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self(lon, lat)
    }

    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }
}

/// Parcel boundary as a polygon ring of `[lon, lat]` vertices.
///
/// The ring may be open or closed (first vertex repeated at the end);
/// both forms describe the same polygon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ParcelGeometry {
    pub vertices: Vec<LonLat>,
}

impl ParcelGeometry {
    pub fn new(vertices: Vec<LonLat>) -> Self {
        Self { vertices }
    }

    /// Vertices without the closing duplicate of a closed ring
    pub fn distinct_vertices(&self) -> &[LonLat] {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) if self.vertices.len() > 1 && first == last => {
                &self.vertices[..self.vertices.len() - 1]
            }
            _ => &self.vertices,
        }
    }

    /// Arithmetic mean of the distinct vertices, used for logging and map centering
    pub fn centroid(&self) -> Option<LonLat> {
        let vertices = self.distinct_vertices();
        if vertices.is_empty() {
            return None;
        }
        let n = vertices.len() as f64;
        let (lon, lat) = vertices
            .iter()
            .fold((0.0, 0.0), |(lon, lat), v| (lon + v.lon(), lat + v.lat()));
        Some(LonLat::new(lon / n, lat / n))
    }
}

/// Half-open date range `[start, end)` for provider queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Round half away from zero to `places` decimals.
///
/// Scales by `10^places` before rounding, so a value whose binary form sits
/// just below a decimal tie (e.g. 1.0005 at 3 places) can round either way.
/// This is not banker's rounding.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

//! Validation utilities for the GreenSignal parcel monitor
//!
//! Structural checks applied at the boundary before any series is assembled
//! or analysed.

use crate::models::{Sample, Series};
use crate::types::ParcelGeometry;

/// Minimum number of distinct vertices for a parcel polygon
pub const MIN_POLYGON_VERTICES: usize = 3;

// ============================================================================
// Geometry Validations
// ============================================================================

/// Validate a parcel boundary: at least three distinct vertices, all finite
/// and within WGS-84 bounds
pub fn validate_geometry(geometry: &ParcelGeometry) -> Result<(), &'static str> {
    let vertices = geometry.distinct_vertices();
    if vertices.len() < MIN_POLYGON_VERTICES {
        return Err("Parcel geometry must have at least 3 vertices");
    }
    for vertex in vertices {
        if !vertex.lon().is_finite() || !vertex.lat().is_finite() {
            return Err("Parcel geometry contains non-numeric coordinates");
        }
        if !(-180.0..=180.0).contains(&vertex.lon()) {
            return Err("Longitude must be between -180 and 180");
        }
        if !(-90.0..=90.0).contains(&vertex.lat()) {
            return Err("Latitude must be between -90 and 90");
        }
    }
    Ok(())
}

// ============================================================================
// Window Validations
// ============================================================================

/// Validate a lookback window in days and narrow it to `u32`
pub fn validate_lookback_days(days: i64, max_days: u32) -> Result<u32, &'static str> {
    if days <= 0 {
        return Err("Lookback window must be a positive number of days");
    }
    if days > i64::from(max_days) {
        return Err("Lookback window exceeds the configured maximum");
    }
    Ok(days as u32)
}

// ============================================================================
// Indicator Validations
// ============================================================================

/// Validate NDVI is finite and within [-1, 1]
pub fn validate_vegetation_index(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err("Vegetation index must be between -1 and 1");
    }
    Ok(())
}

/// Validate moisture index is finite and within [0, 1]
pub fn validate_moisture_index(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err("Moisture index must be between 0 and 1");
    }
    Ok(())
}

/// Validate both indicators of a sample
pub fn validate_sample(sample: &Sample) -> Result<(), &'static str> {
    if let Some(v) = sample.vegetation_index {
        validate_vegetation_index(v)?;
    }
    if let Some(m) = sample.moisture_index {
        validate_moisture_index(m)?;
    }
    Ok(())
}

/// Validate every sample of a caller-supplied series
pub fn validate_series(series: &Series) -> Result<(), &'static str> {
    series.history().iter().try_for_each(validate_sample)
}

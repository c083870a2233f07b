//! Conversions from reduced sensor values to indicator scales

/// Backscatter level treated as completely dry soil
pub const BACKSCATTER_DRY_DB: f64 = -20.0;

/// Backscatter level treated as saturated soil
pub const BACKSCATTER_WET_DB: f64 = 0.0;

/// Rescale VV backscatter (dB) linearly onto a [0, 1] moisture index,
/// clamped at both ends
pub fn moisture_from_backscatter(vv_db: f64) -> f64 {
    let span = BACKSCATTER_WET_DB - BACKSCATTER_DRY_DB;
    ((vv_db - BACKSCATTER_DRY_DB) / span).clamp(0.0, 1.0)
}

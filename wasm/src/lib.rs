//! WebAssembly module for the GreenSignal parcel monitor
//!
//! Provides client-side computation for:
//! - Risk assessment of an already-fetched series
//! - Rule classification of a single reading
//! - Radar backscatter to moisture conversion
//! - Offline geometry validation

use shared::{
    classify_risk, moisture_from_backscatter, validate_geometry, validate_series, DecisionEngine,
    FieldConditions, ParcelGeometry, Series,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Assess a series given as JSON and return the assessment as JSON
#[wasm_bindgen]
pub fn analyze_series(series_json: &str) -> Result<String, JsValue> {
    analyze_json(series_json).map_err(|message| {
        web_sys::console::error_1(&JsValue::from_str(&message));
        JsValue::from(js_sys::Error::new(&message))
    })
}

/// Risk level for a single complete reading
#[wasm_bindgen]
pub fn classify_conditions(vegetation: f64, moisture: f64, vegetation_trend: f64) -> String {
    let outcome = classify_risk(&FieldConditions {
        vegetation,
        moisture,
        vegetation_trend,
    });
    outcome.risk_level.to_string()
}

/// Convert Sentinel-1 VV backscatter (dB) to a moisture index
#[wasm_bindgen]
pub fn backscatter_to_moisture(vv_db: f64) -> f64 {
    moisture_from_backscatter(vv_db)
}

/// Check a drawn parcel before submitting it
#[wasm_bindgen]
pub fn is_valid_geometry(geometry_json: &str) -> bool {
    serde_json::from_str::<ParcelGeometry>(geometry_json)
        .map(|g| validate_geometry(&g).is_ok())
        .unwrap_or(false)
}

fn analyze_json(series_json: &str) -> Result<String, String> {
    let series: Series =
        serde_json::from_str(series_json).map_err(|e| format!("Invalid series JSON: {}", e))?;
    validate_series(&series)?;

    let assessment = DecisionEngine::new().analyze(&series);
    serde_json::to_string(&assessment).map_err(|e| e.to_string())
}

//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub imagery: String,
    pub yield_model: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let imagery = if state.parcels.assembler().has_provider() {
        "configured"
    } else {
        "simulated"
    };

    let yield_model = if state.parcels.engine().has_yield_model() {
        "loaded"
    } else {
        "disabled"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        imagery: imagery.to_string(),
        yield_model: yield_model.to_string(),
    })
}

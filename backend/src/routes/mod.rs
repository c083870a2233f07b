//! Route definitions for the GreenSignal parcel monitor

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/parcels", parcel_routes())
        .route("/assessments", post(handlers::assess_series))
}

/// Parcel monitoring routes
fn parcel_routes() -> Router<AppState> {
    Router::new()
        .route("/time-series", post(handlers::get_time_series))
        .route("/stats", post(handlers::get_field_stats))
        .route("/analysis", post(handlers::analyze_parcel))
        .route("/demo", get(handlers::list_demo_parcels))
        .route("/demo/:parcel_id/analysis", get(handlers::analyze_demo_parcel))
}

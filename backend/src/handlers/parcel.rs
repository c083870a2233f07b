//! HTTP handlers for parcel monitoring endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{demo_parcels, Assessment, Parcel, ParcelGeometry, Series};

use crate::error::{AppError, AppResult};
use crate::services::parcel::{DemoParcelAnalysis, FieldStats, ParcelAnalysis};
use crate::AppState;

/// Request body for series and analysis endpoints
#[derive(Debug, Deserialize)]
pub struct ParcelRequest {
    pub geometry: ParcelGeometry,
    pub days_back: Option<i64>,
}

/// Request body for the stats endpoint
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    pub geometry: ParcelGeometry,
}

/// Query parameters for demo parcel analysis
#[derive(Debug, Deserialize)]
pub struct LookbackQuery {
    pub days_back: Option<i64>,
}

/// Get the vegetation/moisture series for a parcel
pub async fn get_time_series(
    State(state): State<AppState>,
    Json(input): Json<ParcelRequest>,
) -> AppResult<Json<Series>> {
    let series = state
        .parcels
        .time_series(&input.geometry, input.days_back)
        .await?;
    Ok(Json(series))
}

/// Get current field statistics for a parcel
pub async fn get_field_stats(
    State(state): State<AppState>,
    Json(input): Json<StatsRequest>,
) -> AppResult<Json<FieldStats>> {
    let stats = state.parcels.field_stats(&input.geometry).await?;
    Ok(Json(stats))
}

/// Assemble and assess a parcel in one call
pub async fn analyze_parcel(
    State(state): State<AppState>,
    Json(input): Json<ParcelRequest>,
) -> AppResult<Json<ParcelAnalysis>> {
    let analysis = state
        .parcels
        .analyze_parcel(&input.geometry, input.days_back)
        .await?;
    Ok(Json(analysis))
}

/// Assess a caller-supplied series
pub async fn assess_series(
    State(state): State<AppState>,
    payload: Result<Json<Series>, JsonRejection>,
) -> AppResult<Json<Assessment>> {
    let Json(series) = payload.map_err(series_rejection)?;
    let assessment = state.parcels.assess_series(&series)?;
    Ok(Json(assessment))
}

/// List the built-in demo parcels
pub async fn list_demo_parcels() -> Json<Vec<Parcel>> {
    Json(demo_parcels())
}

/// Analyse one of the built-in demo parcels
pub async fn analyze_demo_parcel(
    State(state): State<AppState>,
    Path(parcel_id): Path<String>,
    Query(query): Query<LookbackQuery>,
) -> AppResult<Json<DemoParcelAnalysis>> {
    let analysis = state
        .parcels
        .analyze_demo_parcel(&parcel_id, query.days_back)
        .await?;
    Ok(Json(analysis))
}

/// Series that fail to deserialize (empty, blank or unordered history) are
/// reported like any other invalid history
fn series_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::validation("history", e.body_text()),
        other => AppError::validation("body", other.body_text()),
    }
}

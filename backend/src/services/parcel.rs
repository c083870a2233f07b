//! Parcel monitoring service combining series assembly and risk assessment

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    find_demo_parcel, round_to, validate_series, Assessment, DecisionEngine, Parcel,
    ParcelGeometry, Series, SourceState,
};

use crate::error::{AppError, AppResult};
use crate::services::series::SeriesAssembler;

/// Parcel service for time series, statistics and assessments
#[derive(Clone)]
pub struct ParcelService {
    assembler: Arc<SeriesAssembler>,
    engine: DecisionEngine,
}

/// Snapshot statistics for a parcel over the stats window
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldStats {
    pub vegetation_index: Option<f64>,
    pub moisture_index: Option<f64>,
    pub vegetation_trend: f64,
    pub data_points: usize,
    pub source: SourceState,
}

/// Series together with its assessment
#[derive(Debug, Clone, Serialize)]
pub struct ParcelAnalysis {
    pub series: Series,
    pub assessment: Assessment,
}

/// Analysis of a built-in demo parcel
#[derive(Debug, Clone, Serialize)]
pub struct DemoParcelAnalysis {
    pub parcel: Parcel,
    #[serde(flatten)]
    pub analysis: ParcelAnalysis,
}

impl ParcelService {
    /// Create a new ParcelService instance
    pub fn new(assembler: SeriesAssembler, engine: DecisionEngine) -> Self {
        Self {
            assembler: Arc::new(assembler),
            engine,
        }
    }

    pub fn assembler(&self) -> &SeriesAssembler {
        &self.assembler
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Resolve an optional lookback against the configured default
    pub fn lookback_or_default(&self, days_back: Option<i64>) -> i64 {
        days_back.unwrap_or_else(|| i64::from(self.assembler.policy().default_lookback_days))
    }

    /// Assemble the series for a parcel
    pub async fn time_series(
        &self,
        geometry: &ParcelGeometry,
        days_back: Option<i64>,
    ) -> AppResult<Series> {
        self.assembler
            .assemble(geometry, self.lookback_or_default(days_back))
            .await
    }

    /// Current values and vegetation trend over the stats window
    pub async fn field_stats(&self, geometry: &ParcelGeometry) -> AppResult<FieldStats> {
        let days = i64::from(self.assembler.policy().stats_lookback_days);
        let series = self.assembler.assemble(geometry, days).await?;
        Ok(Self::stats_for(&series))
    }

    /// Same as [`field_stats`](Self::field_stats) with an explicit end date
    pub async fn field_stats_until(
        &self,
        geometry: &ParcelGeometry,
        today: NaiveDate,
    ) -> AppResult<FieldStats> {
        let days = i64::from(self.assembler.policy().stats_lookback_days);
        let series = self.assembler.assemble_until(geometry, days, today).await?;
        Ok(Self::stats_for(&series))
    }

    fn stats_for(series: &Series) -> FieldStats {
        let current = series.current();
        FieldStats {
            vegetation_index: current.vegetation_index,
            moisture_index: current.moisture_index,
            vegetation_trend: round_to(series.vegetation_trend(), 3),
            data_points: series.len(),
            source: series.source(),
        }
    }

    /// Assemble and assess a parcel
    pub async fn analyze_parcel(
        &self,
        geometry: &ParcelGeometry,
        days_back: Option<i64>,
    ) -> AppResult<ParcelAnalysis> {
        let series = self.time_series(geometry, days_back).await?;
        let assessment = self.engine.analyze(&series);

        tracing::info!(
            risk_level = %assessment.risk_level,
            source = %series.source(),
            "Parcel analysed"
        );

        Ok(ParcelAnalysis { series, assessment })
    }

    /// Assess a caller-supplied series
    pub fn assess_series(&self, series: &Series) -> AppResult<Assessment> {
        validate_series(series).map_err(|m| AppError::validation("history", m))?;
        Ok(self.engine.analyze(series))
    }

    /// Assemble and assess one of the built-in demo parcels
    pub async fn analyze_demo_parcel(
        &self,
        parcel_id: &str,
        days_back: Option<i64>,
    ) -> AppResult<DemoParcelAnalysis> {
        let parcel = find_demo_parcel(parcel_id)
            .ok_or_else(|| AppError::NotFound("Parcel".to_string()))?;
        let analysis = self.analyze_parcel(&parcel.geometry, days_back).await?;
        Ok(DemoParcelAnalysis { parcel, analysis })
    }
}

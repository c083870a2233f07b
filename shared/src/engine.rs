//! Decision engine turning a vegetation/moisture series into an assessment

use std::sync::Arc;

use thiserror::Error;

use crate::models::risk::{
    classify_risk, describe_conditions, FieldConditions, AWAITING_DATA, AWAITING_DATA_DESCRIPTION,
};
use crate::models::{
    Assessment, Insight, Metrics, Series, YieldPrediction, YieldStatus,
};
use crate::types::round_to;

/// Length of the yield model feature vector
pub const YIELD_FEATURE_COUNT: usize = 7;

/// Minimum non-null vegetation values needed to build yield features
pub const MIN_YIELD_HISTORY: usize = 3;

/// Yield expressed relative to this baseline
pub const YIELD_BASELINE_PERCENT: f64 = 100.0;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    FeatureShape { expected: usize, actual: usize },

    #[error("model produced a non-finite prediction")]
    NonFinite,

    #[error("prediction failed: {0}")]
    Prediction(String),
}

/// Regression model estimating relative yield (1.0 = baseline).
///
/// Features, in order: current NDVI, current moisture, then mean, population
/// standard deviation, min, max and count of historical NDVI.
pub trait YieldModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;
}

/// Expert system scoring parcels from their assembled series
#[derive(Clone, Default)]
pub struct DecisionEngine {
    yield_model: Option<Arc<dyn YieldModel>>,
}

impl DecisionEngine {
    /// Create an engine without yield augmentation
    pub fn new() -> Self {
        Self { yield_model: None }
    }

    /// Create an engine that augments assessments with a yield estimate
    pub fn with_yield_model(model: Arc<dyn YieldModel>) -> Self {
        Self {
            yield_model: Some(model),
        }
    }

    pub fn has_yield_model(&self) -> bool {
        self.yield_model.is_some()
    }

    /// Assess the current state of a parcel from its series
    pub fn analyze(&self, series: &Series) -> Assessment {
        let current = series.current();
        let vegetation = current.vegetation_index;
        let moisture = current.moisture_index;

        let vegetation_trend = series.vegetation_trend();
        let moisture_trend = series.moisture_trend();

        let (outcome, description) = match (vegetation, moisture) {
            (Some(v), Some(m)) => {
                let conditions = FieldConditions {
                    vegetation: v,
                    moisture: m,
                    vegetation_trend,
                };
                (
                    classify_risk(&conditions),
                    describe_conditions(v, m, vegetation_trend),
                )
            }
            _ => (AWAITING_DATA, AWAITING_DATA_DESCRIPTION.to_string()),
        };

        let yield_prediction = match (&self.yield_model, vegetation) {
            (Some(model), Some(_)) => predict_yield(model.as_ref(), series),
            _ => None,
        };

        tracing::debug!(
            risk_level = %outcome.risk_level,
            source = %series.source(),
            samples = series.len(),
            "Assessment computed"
        );

        Assessment {
            risk_level: outcome.risk_level,
            confidence: outcome.confidence,
            insight: Insight {
                title: outcome.title.to_string(),
                description,
                action: outcome.action.to_string(),
            },
            metrics: Metrics {
                vegetation_index: vegetation.map(|v| round_to(v, 3)),
                moisture_index: moisture.map(|m| round_to(m, 3)),
                vegetation_trend: round_to(vegetation_trend, 3),
                moisture_trend: round_to(moisture_trend, 3),
            },
            yield_prediction,
        }
    }
}

/// Build the yield feature vector, or `None` when the series is too sparse
pub fn yield_features(series: &Series) -> Option<[f64; YIELD_FEATURE_COUNT]> {
    let current = series.current();
    let vegetation = current.vegetation_index?;
    let moisture = current.moisture_index?;

    let history = series.vegetation_values();
    if history.len() < MIN_YIELD_HISTORY {
        return None;
    }

    let count = history.len() as f64;
    let mean = history.iter().sum::<f64>() / count;
    let variance = history.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let min = history.iter().copied().fold(f64::INFINITY, f64::min);
    let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some([
        vegetation,
        moisture,
        mean,
        variance.sqrt(),
        min,
        max,
        count,
    ])
}

fn predict_yield(model: &dyn YieldModel, series: &Series) -> Option<YieldPrediction> {
    let features = yield_features(series)?;

    let relative = match model.predict(&features) {
        Ok(y) if y.is_finite() => y,
        Ok(_) => {
            tracing::warn!("Yield prediction skipped: {}", ModelError::NonFinite);
            return None;
        }
        Err(e) => {
            tracing::warn!("Yield prediction failed: {}", e);
            return None;
        }
    };

    Some(YieldPrediction {
        expected_yield_percent: round_to(relative * 100.0, 1),
        baseline: YIELD_BASELINE_PERCENT,
        status: if relative > 1.0 {
            YieldStatus::Above
        } else {
            YieldStatus::Below
        },
    })
}

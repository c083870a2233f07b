//! Linear yield regression model loaded from disk

use std::path::Path;

use serde::Deserialize;
use shared::{ModelError, YieldModel, YIELD_FEATURE_COUNT};

use crate::error::{AppError, AppResult};

/// `y = intercept + Σ coefficient_i * feature_i`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LinearYieldModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearYieldModel {
    /// Parse a model from its JSON representation
    pub fn from_json(json: &str) -> AppResult<Self> {
        let model: LinearYieldModel = serde_json::from_str(json)
            .map_err(|e| AppError::Configuration(format!("Invalid yield model: {}", e)))?;

        if model.coefficients.len() != YIELD_FEATURE_COUNT {
            return Err(AppError::Configuration(format!(
                "Yield model must have {} coefficients, found {}",
                YIELD_FEATURE_COUNT,
                model.coefficients.len()
            )));
        }

        Ok(model)
    }

    /// Load a model file
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Cannot read yield model {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

impl YieldModel for LinearYieldModel {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::FeatureShape {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let y = self.intercept
            + features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>();

        if y.is_finite() {
            Ok(y)
        } else {
            Err(ModelError::NonFinite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL_JSON: &str = r#"{
        "intercept": 0.2,
        "coefficients": [1.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.01]
    }"#;

    #[test]
    fn parses_and_predicts() {
        let model = LinearYieldModel::from_json(MODEL_JSON).unwrap();
        let y = model
            .predict(&[0.6, 0.4, 0.5, 0.1, 0.3, 0.7, 10.0])
            .unwrap();
        assert!((y - 1.1).abs() < 1e-9);
    }

    #[test]
    fn rejects_wrong_coefficient_count() {
        let json = r#"{"intercept": 0.0, "coefficients": [1.0, 2.0]}"#;
        assert!(LinearYieldModel::from_json(json).is_err());
    }

    #[test]
    fn rejects_wrong_feature_count() {
        let model = LinearYieldModel::from_json(MODEL_JSON).unwrap();
        assert!(matches!(
            model.predict(&[0.5; 3]),
            Err(ModelError::FeatureShape { expected: 7, actual: 3 })
        ));
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = LinearYieldModel::load("/nonexistent/yield_model.json").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}

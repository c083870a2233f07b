//! Decision engine tests
//!
//! Verifies the risk rule cascade, the awaiting-data path, metric reporting
//! and optional yield prediction against assembled series.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use greensignal_backend::external::LinearYieldModel;
use proptest::prelude::*;
use shared::{
    DecisionEngine, ModelError, RiskLevel, Sample, Series, SourceState, YieldModel, YieldStatus,
};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Duration::days(offset * 7)
}

/// Series whose vegetation moves from `first_v` to `v` and ends at moisture `m`
fn series(first_v: f64, v: f64, m: f64) -> Series {
    Series::new(
        vec![
            Sample::new(day(0), Some(first_v), Some(m)).unwrap(),
            Sample::new(day(1), Some((first_v + v) / 2.0), Some(m)).unwrap(),
            Sample::new(day(2), Some(v), Some(m)).unwrap(),
        ],
        SourceState::Real,
    )
    .unwrap()
}

struct FixedModel(f64);

impl YieldModel for FixedModel {
    fn predict(&self, _features: &[f64]) -> Result<f64, ModelError> {
        Ok(self.0)
    }
}

// =============================================================================
// Risk cascade
// =============================================================================

mod risk_cascade {
    use super::*;

    fn assess(first_v: f64, v: f64, m: f64) -> (RiskLevel, f64, String) {
        let a = DecisionEngine::new().analyze(&series(first_v, v, m));
        (a.risk_level, a.confidence, a.insight.title)
    }

    #[test]
    fn severe_water_stress() {
        let (level, confidence, title) = assess(0.45, 0.35, 0.25);
        assert_eq!(level, RiskLevel::Critical);
        assert_eq!(confidence, 0.92);
        assert_eq!(title, "Severe Water Stress Detected");
    }

    #[test]
    fn root_disease() {
        let (level, confidence, _) = assess(0.35, 0.35, 0.7);
        assert_eq!(level, RiskLevel::High);
        assert_eq!(confidence, 0.85);
    }

    #[test]
    fn water_stress_developing() {
        let (level, confidence, _) = assess(0.7, 0.65, 0.35);
        assert_eq!(level, RiskLevel::Medium);
        assert_eq!(confidence, 0.78);
    }

    #[test]
    fn heat_stress() {
        let (level, confidence, _) = assess(0.48, 0.45, 0.55);
        assert_eq!(level, RiskLevel::Medium);
        assert_eq!(confidence, 0.72);
    }

    #[test]
    fn healthy_growth() {
        let (level, confidence, title) = assess(0.65, 0.7, 0.5);
        assert_eq!(level, RiskLevel::Low);
        assert_eq!(confidence, 0.88);
        assert_eq!(title, "Healthy Growth");
    }

    #[test]
    fn recovery() {
        let (level, confidence, _) = assess(0.2, 0.35, 0.25);
        assert_eq!(level, RiskLevel::Low);
        assert_eq!(confidence, 0.80);
    }

    #[test]
    fn moderate_health() {
        let (level, confidence, _) = assess(0.5, 0.5, 0.35);
        assert_eq!(level, RiskLevel::Medium);
        assert_eq!(confidence, 0.70);
    }

    #[test]
    fn monitoring_catch_all() {
        let (level, confidence, title) = assess(0.3, 0.3, 0.35);
        assert_eq!(level, RiskLevel::Medium);
        assert_eq!(confidence, 0.65);
        assert_eq!(title, "Monitoring Required");
    }

    #[test]
    fn description_follows_value_bands_not_rules() {
        let a = DecisionEngine::new().analyze(&series(0.8, 0.7, 0.3));
        assert_eq!(a.risk_level, RiskLevel::Medium);
        assert_eq!(
            a.insight.description,
            "Vegetation is dense and healthy (NDVI: 0.70). Soil moisture is low (30%). \
             Vegetation health is declining."
        );
    }
}

// =============================================================================
// Awaiting data and metrics
// =============================================================================

mod awaiting_data {
    use super::*;

    #[test]
    fn missing_current_moisture_is_unknown() {
        let s = Series::new(
            vec![
                Sample::new(day(0), Some(0.5), Some(0.4)).unwrap(),
                Sample::new(day(1), Some(0.6), None).unwrap(),
            ],
            SourceState::Real,
        )
        .unwrap();

        let a = DecisionEngine::with_yield_model(Arc::new(FixedModel(1.2))).analyze(&s);
        assert_eq!(a.risk_level, RiskLevel::Unknown);
        assert_eq!(a.confidence, 0.0);
        assert_eq!(a.insight.title, "Awaiting Data");
        assert_eq!(a.insight.action, "Insufficient data");
        assert_eq!(a.metrics.vegetation_index, Some(0.6));
        assert_eq!(a.metrics.moisture_index, None);
        assert_eq!(a.metrics.vegetation_trend, 0.1);
    }

    #[test]
    fn trends_skip_gaps() {
        let s = Series::new(
            vec![
                Sample::new(day(0), None, Some(0.2)).unwrap(),
                Sample::new(day(1), Some(0.4), Some(0.3)).unwrap(),
                Sample::new(day(2), Some(0.55), None).unwrap(),
                Sample::new(day(3), Some(0.5), Some(0.5)).unwrap(),
            ],
            SourceState::Real,
        )
        .unwrap();

        let metrics = DecisionEngine::new().analyze(&s).metrics;
        assert_eq!(metrics.vegetation_trend, 0.1);
        assert_eq!(metrics.moisture_trend, 0.3);
    }

    #[test]
    fn single_sample_has_flat_trend() {
        let s = Series::new(
            vec![Sample::new(day(0), Some(0.7), Some(0.5)).unwrap()],
            SourceState::Simulated,
        )
        .unwrap();

        let a = DecisionEngine::new().analyze(&s);
        assert_eq!(a.metrics.vegetation_trend, 0.0);
        assert_eq!(a.risk_level, RiskLevel::Low);
    }
}

// =============================================================================
// Yield prediction
// =============================================================================

mod yield_prediction {
    use super::*;

    #[test]
    fn absent_without_model() {
        let a = DecisionEngine::new().analyze(&series(0.6, 0.65, 0.5));
        assert!(a.yield_prediction.is_none());
    }

    #[test]
    fn above_and_below_baseline() {
        let above = DecisionEngine::with_yield_model(Arc::new(FixedModel(1.0537)))
            .analyze(&series(0.6, 0.65, 0.5))
            .yield_prediction
            .unwrap();
        assert_eq!(above.expected_yield_percent, 105.4);
        assert_eq!(above.baseline, 100.0);
        assert_eq!(above.status, YieldStatus::Above);

        let at_baseline = DecisionEngine::with_yield_model(Arc::new(FixedModel(1.0)))
            .analyze(&series(0.6, 0.65, 0.5))
            .yield_prediction
            .unwrap();
        assert_eq!(at_baseline.status, YieldStatus::Below);
    }

    #[test]
    fn linear_model_uses_history_features() {
        // Only the mean historical NDVI and sample count contribute
        let model = LinearYieldModel::from_json(
            r#"{"intercept": 0.5, "coefficients": [0, 0, 1.0, 0, 0, 0, 0.01]}"#,
        )
        .unwrap();
        let engine = DecisionEngine::with_yield_model(Arc::new(model));

        let prediction = engine
            .analyze(&series(0.4, 0.6, 0.5))
            .yield_prediction
            .unwrap();
        assert_eq!(prediction.expected_yield_percent, 103.0);
        assert_eq!(prediction.status, YieldStatus::Above);
    }

    #[test]
    fn short_history_skips_prediction() {
        let s = Series::new(
            vec![
                Sample::new(day(0), Some(0.6), Some(0.5)).unwrap(),
                Sample::new(day(1), Some(0.62), Some(0.5)).unwrap(),
            ],
            SourceState::Real,
        )
        .unwrap();

        let a = DecisionEngine::with_yield_model(Arc::new(FixedModel(1.1))).analyze(&s);
        assert!(a.yield_prediction.is_none());
        assert_eq!(a.risk_level, RiskLevel::Low);
    }
}

// =============================================================================
// Property Tests
// =============================================================================

fn index_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        4 => (-1.0f64..=1.0).prop_map(Some),
    ]
}

fn moisture_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        4 => (0.0f64..=1.0).prop_map(Some),
    ]
}

fn series_strategy() -> impl Strategy<Value = Series> {
    prop::collection::vec((index_strategy(), moisture_strategy()), 1..20).prop_map(|values| {
        let samples = values
            .into_iter()
            .enumerate()
            .map(|(i, (v, m))| {
                Sample::new(day(i as i64), v, m)
                    .unwrap_or_else(|| Sample::new(day(i as i64), Some(0.5), None).unwrap())
            })
            .collect();
        Series::new(samples, SourceState::Real).unwrap()
    })
}

proptest! {
    /// Complete readings always land on a rule with positive confidence
    #[test]
    fn cascade_is_total(
        v in -1.0f64..=1.0,
        m in 0.0f64..=1.0,
        first_v in -1.0f64..=1.0,
    ) {
        let a = DecisionEngine::new().analyze(&series(first_v, v, m));
        prop_assert_ne!(a.risk_level, RiskLevel::Unknown);
        prop_assert!(a.confidence > 0.0 && a.confidence <= 1.0);
        prop_assert!(!a.insight.title.is_empty());
        prop_assert!(!a.insight.action.is_empty());
    }

    /// Unknown exactly when the current reading is incomplete
    #[test]
    fn unknown_iff_current_incomplete(s in series_strategy()) {
        let a = DecisionEngine::new().analyze(&s);
        let current = s.current();
        let complete = current.vegetation_index.is_some() && current.moisture_index.is_some();
        prop_assert_eq!(a.risk_level == RiskLevel::Unknown, !complete);
    }

    /// Same series, same engine, byte-identical output
    #[test]
    fn analysis_is_deterministic(s in series_strategy()) {
        let engine = DecisionEngine::with_yield_model(Arc::new(FixedModel(0.93)));
        let first = serde_json::to_string(&engine.analyze(&s)).unwrap();
        let second = serde_json::to_string(&engine.analyze(&s)).unwrap();
        prop_assert_eq!(first, second);
    }
}

//! Vegetation/moisture time series assembly
//!
//! Real imagery is reduced in fixed-width buckets across the lookback
//! window. When the provider is unavailable or has nothing usable for the
//! whole window, a smooth synthetic series is generated instead.

use std::f64::consts::TAU;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use futures::FutureExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{
    moisture_from_backscatter, round_to, validate_geometry, validate_lookback_days,
    validate_vegetation_index, DateRange, ParcelGeometry, Sample, Series,
    SourceState,
};

use crate::config::SeriesConfig;
use crate::error::{AppError, AppResult};
use crate::external::imagery::{
    ImageryError, ImageryProvider, IndexKind, ReducedScalarQuery, Reducer,
};

/// Samples per full oscillation of the synthetic signal
const SIMULATED_PERIOD_SAMPLES: f64 = 9.0;

/// Half-width of the uniform noise added to synthetic values
const SIMULATED_NOISE: f64 = 0.03;

const SIMULATED_VEGETATION_MEAN: f64 = 0.55;
const SIMULATED_VEGETATION_AMPLITUDE: f64 = 0.15;
const SIMULATED_MOISTURE_MEAN: f64 = 0.45;
const SIMULATED_MOISTURE_AMPLITUDE: f64 = 0.12;

/// Builds the indicator series for a parcel
#[derive(Clone)]
pub struct SeriesAssembler {
    provider: Option<Arc<dyn ImageryProvider>>,
    policy: SeriesConfig,
    scale_m: u32,
}

impl SeriesAssembler {
    /// Create an assembler; `provider` is `None` when imagery is not configured
    pub fn new(
        provider: Option<Arc<dyn ImageryProvider>>,
        policy: SeriesConfig,
        scale_m: u32,
    ) -> Self {
        Self {
            provider,
            policy,
            scale_m,
        }
    }

    /// Create an assembler that always simulates
    pub fn simulated(policy: SeriesConfig) -> Self {
        Self::new(None, policy, 10)
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn policy(&self) -> &SeriesConfig {
        &self.policy
    }

    /// Assemble the series ending today
    pub async fn assemble(&self, geometry: &ParcelGeometry, lookback_days: i64) -> AppResult<Series> {
        self.assemble_until(geometry, lookback_days, Utc::now().date_naive())
            .await
    }

    /// Assemble the series for `[today - lookback_days, today]`
    pub async fn assemble_until(
        &self,
        geometry: &ParcelGeometry,
        lookback_days: i64,
        today: NaiveDate,
    ) -> AppResult<Series> {
        validate_geometry(geometry).map_err(|m| AppError::validation("geometry", m))?;
        let lookback = validate_lookback_days(lookback_days, self.policy.max_lookback_days)
            .map_err(|m| AppError::validation("days_back", m))?;

        let start = today - Duration::days(i64::from(lookback));

        if let Some(center) = geometry.centroid() {
            tracing::debug!(
                lon = center.lon(),
                lat = center.lat(),
                lookback,
                "Assembling series"
            );
        }

        match &self.provider {
            Some(provider) => {
                match self
                    .fetch_observed(provider.as_ref(), geometry, start, today)
                    .await
                {
                    Ok(samples) if samples.is_empty() => {
                        tracing::warn!(
                            "No usable imagery between {} and {}, simulating series",
                            start,
                            today
                        );
                    }
                    Ok(samples) => match Series::new(samples, SourceState::Real) {
                        Ok(series) => {
                            tracing::debug!(
                                samples = series.len(),
                                "Assembled observed series from {} to {}",
                                start,
                                today
                            );
                            return Ok(series);
                        }
                        Err(e) => tracing::warn!("Discarding observed series: {}", e),
                    },
                    Err(e) => {
                        tracing::warn!("Imagery provider failed, simulating series: {}", e);
                    }
                }
            }
            None => tracing::debug!("Imagery provider not configured, simulating series"),
        }

        self.simulate(start, today)
    }

    /// Query every bucket of the window; one provider error aborts the lot
    async fn fetch_observed(
        &self,
        provider: &dyn ImageryProvider,
        geometry: &ParcelGeometry,
        start: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<Sample>, ImageryError> {
        let bucket = Duration::days(i64::from(self.policy.bucket_days.max(1)));
        let mut samples = Vec::new();
        let mut bucket_start = start;

        while bucket_start <= today {
            let range = DateRange::new(bucket_start, bucket_start + bucket);

            let vegetation = guarded_query(provider, &self.query(geometry, range, IndexKind::Ndvi))
                .await?
                .filter(|v| validate_vegetation_index(*v).is_ok())
                .map(|v| round_to(v, 3));

            let moisture =
                guarded_query(provider, &self.query(geometry, range, IndexKind::VvBackscatter))
                    .await?
                    .filter(|vv| vv.is_finite())
                    .map(|vv| round_to(moisture_from_backscatter(vv), 3));

            // Buckets without any usable pixels are dropped
            if let Some(sample) = Sample::new(bucket_start, vegetation, moisture) {
                samples.push(sample);
            }

            bucket_start = bucket_start + bucket;
        }

        Ok(samples)
    }

    fn query(&self, geometry: &ParcelGeometry, range: DateRange, index: IndexKind) -> ReducedScalarQuery {
        ReducedScalarQuery {
            geometry: geometry.clone(),
            range,
            index,
            reducer: Reducer::Mean,
            scale_m: self.scale_m,
        }
    }

    /// Synthetic series: one sample per spacing step from `start` to `today`
    fn simulate(&self, start: NaiveDate, today: NaiveDate) -> AppResult<Series> {
        let spacing = i64::from(self.policy.simulated_spacing_days.max(1));
        let steps = (today - start).num_days() / spacing;

        let mut rng = match self.policy.simulation_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let samples = (0..=steps)
            .map(|i| {
                let phase = TAU * i as f64 / SIMULATED_PERIOD_SAMPLES;

                let vegetation = SIMULATED_VEGETATION_MEAN
                    + SIMULATED_VEGETATION_AMPLITUDE * phase.sin()
                    + rng.random_range(-SIMULATED_NOISE..=SIMULATED_NOISE);
                let moisture = SIMULATED_MOISTURE_MEAN
                    + SIMULATED_MOISTURE_AMPLITUDE * phase.cos()
                    + rng.random_range(-SIMULATED_NOISE..=SIMULATED_NOISE);

                Sample {
                    date: start + Duration::days(i * spacing),
                    vegetation_index: Some(round_to(vegetation.clamp(-1.0, 1.0), 3)),
                    moisture_index: Some(round_to(moisture.clamp(0.0, 1.0), 3)),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(samples = samples.len(), "Simulated series from {} to {}", start, today);

        Series::new(samples, SourceState::Simulated).map_err(|e| AppError::Internal(e.to_string()))
    }
}

/// A panicking provider is reported as a failed query
async fn guarded_query(
    provider: &dyn ImageryProvider,
    query: &ReducedScalarQuery,
) -> Result<Option<f64>, ImageryError> {
    AssertUnwindSafe(provider.query_reduced_scalar(query))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            Err(ImageryError::BadResponse(
                "provider panicked during reduction".to_string(),
            ))
        })
}

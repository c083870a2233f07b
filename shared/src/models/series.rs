//! Vegetation/moisture time series models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One time step of reduced indicator values
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub date: NaiveDate,
    /// NDVI, roughly in [-1, 1]
    pub vegetation_index: Option<f64>,
    /// Radar-derived moisture index in [0, 1]
    pub moisture_index: Option<f64>,
}

impl Sample {
    /// Build a sample, returning `None` when neither indicator is present
    pub fn new(
        date: NaiveDate,
        vegetation_index: Option<f64>,
        moisture_index: Option<f64>,
    ) -> Option<Self> {
        if vegetation_index.is_none() && moisture_index.is_none() {
            return None;
        }
        Some(Self {
            date,
            vegetation_index,
            moisture_index,
        })
    }
}

/// Where the samples of a series came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceState {
    Real,
    Simulated,
}

impl std::fmt::Display for SourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceState::Real => write!(f, "real"),
            SourceState::Simulated => write!(f, "simulated"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("series must contain at least one sample")]
    Empty,

    #[error("sample on {0} carries neither a vegetation nor a moisture value")]
    BlankSample(NaiveDate),

    #[error("sample dates must be strictly ascending ({previous} then {next})")]
    NotAscending { previous: NaiveDate, next: NaiveDate },
}

/// Ordered, non-empty series of samples with a single provenance.
///
/// Serialized as `{ "current", "history", "source" }`; `current` is always
/// the last element of `history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesWire", into = "SeriesWire")]
pub struct Series {
    samples: Vec<Sample>,
    source: SourceState,
}

impl Series {
    /// Build a series, checking ordering, uniqueness and non-emptiness
    pub fn new(samples: Vec<Sample>, source: SourceState) -> Result<Self, SeriesError> {
        if samples.is_empty() {
            return Err(SeriesError::Empty);
        }
        for sample in &samples {
            if sample.vegetation_index.is_none() && sample.moisture_index.is_none() {
                return Err(SeriesError::BlankSample(sample.date));
            }
        }
        for pair in samples.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NotAscending {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { samples, source })
    }

    pub fn history(&self) -> &[Sample] {
        &self.samples
    }

    pub fn source(&self) -> SourceState {
        self.source
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample
    pub fn current(&self) -> &Sample {
        // Non-empty by construction
        &self.samples[self.samples.len() - 1]
    }

    /// Non-null vegetation values in date order
    pub fn vegetation_values(&self) -> Vec<f64> {
        self.samples.iter().filter_map(|s| s.vegetation_index).collect()
    }

    pub fn vegetation_trend(&self) -> f64 {
        trend_estimate(self.samples.iter().map(|s| s.vegetation_index))
    }

    pub fn moisture_trend(&self) -> f64 {
        trend_estimate(self.samples.iter().map(|s| s.moisture_index))
    }
}

/// Last non-null value minus first non-null value; 0.0 with fewer than two.
///
/// Deliberately not a least-squares slope.
pub fn trend_estimate<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut present = values.into_iter().flatten();
    let Some(first) = present.next() else {
        return 0.0;
    };
    match present.last() {
        Some(last) => last - first,
        None => 0.0,
    }
}

#[derive(Serialize, Deserialize)]
struct SeriesWire {
    #[serde(default, skip_deserializing)]
    current: Option<Sample>,
    history: Vec<Sample>,
    source: SourceState,
}

impl TryFrom<SeriesWire> for Series {
    type Error = SeriesError;

    fn try_from(wire: SeriesWire) -> Result<Self, Self::Error> {
        Series::new(wire.history, wire.source)
    }
}

impl From<Series> for SeriesWire {
    fn from(series: Series) -> Self {
        SeriesWire {
            current: Some(*series.current()),
            history: series.samples,
            source: series.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample(d: u32, v: Option<f64>, m: Option<f64>) -> Sample {
        Sample {
            date: day(d),
            vegetation_index: v,
            moisture_index: m,
        }
    }

    #[test]
    fn trend_is_last_minus_first() {
        let trend = trend_estimate([Some(0.3), Some(0.5), Some(0.7)]);
        assert!((trend - 0.4).abs() < 1e-9);
    }

    #[test]
    fn trend_ignores_nulls() {
        let trend = trend_estimate([None, Some(0.6), None, Some(0.5), None]);
        assert!((trend + 0.1).abs() < 1e-9);
    }

    #[test]
    fn trend_needs_two_values() {
        assert_eq!(trend_estimate([Some(0.7)]), 0.0);
        assert_eq!(trend_estimate([None, None]), 0.0);
        assert_eq!(trend_estimate(Vec::<Option<f64>>::new()), 0.0);
    }

    #[test]
    fn blank_sample_is_not_constructed() {
        assert!(Sample::new(day(1), None, None).is_none());
        assert!(Sample::new(day(1), Some(0.4), None).is_some());
    }

    #[test]
    fn series_rejects_empty_and_unordered() {
        assert_eq!(
            Series::new(vec![], SourceState::Real).unwrap_err(),
            SeriesError::Empty
        );

        let unordered = vec![sample(8, Some(0.5), None), sample(1, Some(0.4), None)];
        assert!(matches!(
            Series::new(unordered, SourceState::Real),
            Err(SeriesError::NotAscending { .. })
        ));

        let duplicate = vec![sample(1, Some(0.5), None), sample(1, Some(0.4), None)];
        assert!(Series::new(duplicate, SourceState::Real).is_err());
    }

    #[test]
    fn series_rejects_blank_samples() {
        let samples = vec![sample(1, Some(0.5), None), sample(8, None, None)];
        assert_eq!(
            Series::new(samples, SourceState::Real).unwrap_err(),
            SeriesError::BlankSample(day(8))
        );
    }

    #[test]
    fn current_is_last_sample() {
        let series = Series::new(
            vec![sample(1, Some(0.3), Some(0.2)), sample(8, Some(0.5), None)],
            SourceState::Simulated,
        )
        .unwrap();
        assert_eq!(series.current().date, day(8));
        assert_eq!(series.current().moisture_index, None);
    }

    #[test]
    fn json_shape_includes_current() {
        let series = Series::new(
            vec![sample(1, Some(0.3), Some(0.2)), sample(8, Some(0.5), Some(0.4))],
            SourceState::Real,
        )
        .unwrap();

        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["source"], "real");
        assert_eq!(value["current"]["date"], "2024-03-08");
        assert_eq!(value["history"].as_array().unwrap().len(), 2);

        let back: Series = serde_json::from_value(value).unwrap();
        assert_eq!(back, series);
    }

    #[test]
    fn json_with_unordered_history_is_rejected() {
        let json = r#"{
            "history": [
                {"date": "2024-03-08", "vegetation_index": 0.5, "moisture_index": null},
                {"date": "2024-03-01", "vegetation_index": 0.4, "moisture_index": null}
            ],
            "source": "real"
        }"#;
        assert!(serde_json::from_str::<Series>(json).is_err());
    }
}

//! Risk assessment models

use serde::{Deserialize, Serialize};

/// Operational risk level for a parcel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Unknown => write!(f, "Unknown"),
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

/// Human-readable explanation attached to an assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub action: String,
}

/// Rounded indicator values reported with an assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    pub vegetation_index: Option<f64>,
    pub moisture_index: Option<f64>,
    pub vegetation_trend: f64,
    pub moisture_trend: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum YieldStatus {
    Above,
    Below,
}

/// Yield estimate relative to a 100% baseline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldPrediction {
    pub expected_yield_percent: f64,
    pub baseline: f64,
    pub status: YieldStatus,
}

/// Output of the decision engine for one series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub insight: Insight,
    pub metrics: Metrics,
    pub yield_prediction: Option<YieldPrediction>,
}

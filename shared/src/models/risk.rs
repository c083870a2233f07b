//! Expert rules mapping current indicator values and trend to a risk level

use serde::Serialize;

use super::assessment::RiskLevel;

/// Inputs the risk rules are evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConditions {
    pub vegetation: f64,
    pub moisture: f64,
    pub vegetation_trend: f64,
}

/// Fixed outcome of one rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskOutcome {
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub title: &'static str,
    pub action: &'static str,
}

/// A guard paired with the outcome it produces
pub struct RiskRule {
    pub name: &'static str,
    pub guard: fn(&FieldConditions) -> bool,
    pub outcome: RiskOutcome,
}

/// Outcome used when the current reading is incomplete
pub const AWAITING_DATA: RiskOutcome = RiskOutcome {
    risk_level: RiskLevel::Unknown,
    confidence: 0.0,
    title: "Awaiting Data",
    action: "Insufficient data",
};

/// Description used when the current reading is incomplete
pub const AWAITING_DATA_DESCRIPTION: &str = "Awaiting satellite data for analysis.";

/// Rules in priority order; the first matching guard wins and the last
/// guard matches everything.
pub static RISK_RULES: [RiskRule; 8] = [
    RiskRule {
        name: "severe_water_stress",
        guard: |c| c.moisture < 0.3 && c.vegetation < 0.4 && c.vegetation_trend < -0.05,
        outcome: RiskOutcome {
            risk_level: RiskLevel::Critical,
            confidence: 0.92,
            title: "Severe Water Stress Detected",
            action: "Immediate irrigation required. Apply 50-60mm water within 24 hours to prevent permanent damage.",
        },
    },
    RiskRule {
        name: "root_disease",
        guard: |c| c.moisture > 0.6 && c.vegetation < 0.4,
        outcome: RiskOutcome {
            risk_level: RiskLevel::High,
            confidence: 0.85,
            title: "Potential Root Disease",
            action: "Soil is saturated but vegetation is stressed. STOP irrigation. Inspect for root rot or fungal infection.",
        },
    },
    RiskRule {
        name: "water_stress_developing",
        guard: |c| c.moisture < 0.4 && c.vegetation_trend < -0.02,
        outcome: RiskOutcome {
            risk_level: RiskLevel::Medium,
            confidence: 0.78,
            title: "Water Stress Developing",
            action: "Schedule irrigation within 48-72 hours. Monitor closely for further decline.",
        },
    },
    RiskRule {
        name: "heat_stress",
        guard: |c| c.moisture > 0.5 && c.vegetation < 0.5 && c.vegetation_trend < 0.0,
        outcome: RiskOutcome {
            risk_level: RiskLevel::Medium,
            confidence: 0.72,
            title: "Heat Stress Suspected",
            action: "Adequate soil moisture but vegetation declining. Check for heat damage or pest activity.",
        },
    },
    RiskRule {
        name: "healthy_growth",
        guard: |c| c.vegetation > 0.6 && c.moisture > 0.4 && c.vegetation_trend >= 0.0,
        outcome: RiskOutcome {
            risk_level: RiskLevel::Low,
            confidence: 0.88,
            title: "Healthy Growth",
            action: "Vegetation is thriving. Continue current irrigation schedule. No action needed.",
        },
    },
    RiskRule {
        name: "recovery",
        guard: |c| c.vegetation_trend > 0.05,
        outcome: RiskOutcome {
            risk_level: RiskLevel::Low,
            confidence: 0.80,
            title: "Recovery in Progress",
            action: "Vegetation health improving. Maintain current management practices.",
        },
    },
    RiskRule {
        name: "moderate_health",
        guard: |c| c.vegetation > 0.4 && c.moisture > 0.3,
        outcome: RiskOutcome {
            risk_level: RiskLevel::Medium,
            confidence: 0.70,
            title: "Moderate Health",
            action: "Vegetation is stable but not optimal. Consider light irrigation if no rain expected.",
        },
    },
    RiskRule {
        name: "monitoring",
        guard: |_| true,
        outcome: RiskOutcome {
            risk_level: RiskLevel::Medium,
            confidence: 0.65,
            title: "Monitoring Required",
            action: "Conditions are borderline. Continue monitoring for trend changes.",
        },
    },
];

/// Return the first rule whose guard matches
pub fn matching_rule(conditions: &FieldConditions) -> &'static RiskRule {
    RISK_RULES
        .iter()
        .find(|rule| (rule.guard)(conditions))
        // The catch-all guard always matches
        .unwrap_or(&RISK_RULES[RISK_RULES.len() - 1])
}

/// Classify field conditions into a risk outcome
pub fn classify_risk(conditions: &FieldConditions) -> RiskOutcome {
    matching_rule(conditions).outcome
}

/// Free-text summary of the current reading.
///
/// Built from value bands only, so it can read "dense and healthy" while the
/// rules report elevated risk.
pub fn describe_conditions(vegetation: f64, moisture: f64, vegetation_trend: f64) -> String {
    let vegetation_status = if vegetation > 0.6 {
        "dense and healthy"
    } else if vegetation > 0.4 {
        "moderate"
    } else {
        "stressed"
    };

    let moisture_status = if moisture > 0.6 {
        "high"
    } else if moisture > 0.4 {
        "adequate"
    } else {
        "low"
    };

    let trend_clause = if vegetation_trend.abs() > 0.05 {
        let direction = if vegetation_trend > 0.0 {
            "improving"
        } else {
            "declining"
        };
        format!(" Vegetation health is {}.", direction)
    } else {
        String::new()
    };

    format!(
        "Vegetation is {} (NDVI: {:.2}). Soil moisture is {} ({}%).{}",
        vegetation_status,
        vegetation,
        moisture_status,
        (moisture * 100.0).trunc() as i64,
        trend_clause
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn first_matching_rule_decides(
            vegetation in -1.0f64..=1.0,
            moisture in 0.0f64..=1.0,
            vegetation_trend in -2.0f64..=2.0,
        ) {
            let c = FieldConditions { vegetation, moisture, vegetation_trend };
            let first = RISK_RULES.iter().position(|r| (r.guard)(&c));
            prop_assert!(first.is_some());
            prop_assert_eq!(classify_risk(&c), RISK_RULES[first.unwrap_or(0)].outcome);
            prop_assert_ne!(classify_risk(&c).risk_level, RiskLevel::Unknown);
        }

        #[test]
        fn description_reports_truncated_percent(
            vegetation in -1.0f64..=1.0,
            moisture in 0.0f64..=1.0,
        ) {
            let text = describe_conditions(vegetation, moisture, 0.0);
            let percent = format!("({}%)", (moisture * 100.0).trunc() as i64);
            prop_assert!(text.contains(&percent));
            prop_assert!(!text.contains("Vegetation health is"));
        }
    }
}

//! Domain models for the GreenSignal parcel monitor

mod assessment;
mod parcel;
pub mod risk;
mod series;

pub use assessment::*;
pub use parcel::*;
pub use risk::{classify_risk, describe_conditions, FieldConditions, RiskOutcome};
pub use series::*;

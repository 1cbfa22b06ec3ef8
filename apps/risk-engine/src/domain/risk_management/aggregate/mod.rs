//! Risk Management Aggregates

mod risk_policy;

pub use risk_policy::{DEFAULT_CLOCK_ALIGNMENT, PolicySpec, RiskPolicy};

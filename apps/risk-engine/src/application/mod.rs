//! Application Layer
//!
//! Orchestrates the risk-management domain services into evaluation cycles.

mod risk_engine;

pub use risk_engine::{EvaluationCycle, RiskEngine};

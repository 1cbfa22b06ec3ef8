//! Risk Management Value Objects

mod budget;
mod correlation;
mod evaluation;
mod exposure;
mod portfolio_state;
mod risk_limits;
mod signal;
mod sizing_decision;
mod sizing_model;

pub use budget::{Budget, DEFAULT_BUDGET_WEIGHT, total_weight};
pub use correlation::CorrelationMatrix;
pub use evaluation::{EvaluationMode, PolicyScope};
pub use exposure::{Exposure, ExposureBook, ExposurePercent};
pub use portfolio_state::{PortfolioState, PositionSnapshot, StrategyPositions};
pub use risk_limits::{DrawdownAction, RiskLimits};
pub use signal::{Signal, SignalIntention};
pub use sizing_decision::{LimitKind, RejectionReason, SizingDecision};
pub use sizing_model::{SizingConfig, SizingModel};

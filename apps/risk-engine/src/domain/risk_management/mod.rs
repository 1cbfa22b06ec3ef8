//! Risk Management Bounded Context
//!
//! Turns strategy signals into sized, limit-checked target positions.
//!
//! # Key Concepts
//!
//! - **Risk Policy**: Validated budgets, sizing algorithm and limits
//! - **Two-layer allocation**: Equity is split into strategy budgets, then a
//!   fraction of the budget is deployed per signal
//! - **Limits**: Position, leverage, sector and correlation caps applied in a
//!   fixed order
//! - **Drawdown control**: Trading is restricted while equity sits too far
//!   below its peak

pub mod aggregate;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use aggregate::{PolicySpec, RiskPolicy};
pub use errors::{FieldIssue, IssueKind, ValidationError};
pub use services::{
    BudgetAllocator, DrawdownGate, DrawdownMode, DrawdownMonitor, DrawdownStatus, LimitEnforcer,
    PositionSizer,
};
pub use value_objects::{
    Budget, CorrelationMatrix, DrawdownAction, EvaluationMode, Exposure, ExposureBook, LimitKind,
    PolicyScope, PortfolioState, PositionSnapshot, RejectionReason, RiskLimits, Signal,
    SignalIntention, SizingConfig, SizingDecision, SizingModel,
};

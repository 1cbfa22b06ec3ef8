// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::unreadable_literal
    )
)]

//! Risk Engine - Portfolio Risk & Position Sizing
//!
//! Deterministic risk layer between a backtest's strategy signals and its
//! order execution. Given a signal, the current portfolio snapshot and a
//! validated policy, it returns a sized target or a rejection with a reason.
//!
//! # Architecture (Clean Architecture + DDD)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `shared`: `Money`, `Symbol`, `StrategyId`, `Sector`
//!   - `risk_management`: `RiskPolicy` aggregate, budgets, sizing, limits,
//!     drawdown monitor, exposure book
//!
//! - **Application**: `RiskEngine` and `EvaluationCycle` orchestration
//!
//! - **Config**: Policy document loading/validation, logging config
//!
//! - **Observability**: Log subscriber setup
//!
//! # Example
//!
//! ```ignore
//! use risk_engine::{RiskEngine, load_policy_from_yaml};
//!
//! let policy = load_policy_from_yaml(&policy_text)?;
//! let mut engine = RiskEngine::new(policy);
//!
//! // once per bar
//! let decisions = engine.begin_cycle(&portfolio_state).evaluate_all(&signals);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Evaluation cycle orchestration.
pub mod application;

/// Configuration - Policy documents and logging settings.
pub mod config;

/// Observability - Log subscriber initialization.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::{EvaluationCycle, RiskEngine};
pub use config::{PolicyError, load_policy_from_json, load_policy_from_yaml, validate};
pub use domain::risk_management::{
    Budget, CorrelationMatrix, DrawdownAction, DrawdownMode, DrawdownStatus, EvaluationMode,
    FieldIssue, IssueKind, LimitKind, PolicySpec, PortfolioState, PositionSnapshot,
    RejectionReason, RiskLimits, RiskPolicy, Signal, SignalIntention, SizingConfig,
    SizingDecision, SizingModel, ValidationError,
};
pub use domain::shared::{Money, Sector, StrategyId, Symbol};

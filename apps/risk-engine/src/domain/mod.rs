//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business logic (plus the drawdown monitor,
//!   the only service carrying state across cycles)
//!
//! # Bounded Contexts
//!
//! - [`risk_management`]: Policy, budgets, sizing, limits and drawdown control

pub mod risk_management;
pub mod shared;

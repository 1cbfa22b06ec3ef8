//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod money;
mod symbol;

pub use identifiers::{Sector, StrategyId};
pub use money::Money;
pub use symbol::Symbol;

//! Risk Management Domain Services
//!
//! The allocator, sizer and enforcer are stateless and borrow the policy.
//! The drawdown monitor is the only component carrying state across cycles.

mod budget_allocator;
mod drawdown_monitor;
mod limit_enforcer;
mod position_sizer;

pub use budget_allocator::BudgetAllocator;
pub use drawdown_monitor::{DrawdownGate, DrawdownMode, DrawdownMonitor, DrawdownStatus};
pub use limit_enforcer::LimitEnforcer;
pub use position_sizer::PositionSizer;

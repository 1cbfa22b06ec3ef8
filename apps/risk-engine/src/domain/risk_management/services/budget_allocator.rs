//! Budget Allocator
//!
//! First layer of the two-layer allocation: splits equity into per-strategy
//! capital. Recomputed from live equity on every call, so allocations track
//! gains and drawdowns without caching.

use crate::domain::risk_management::aggregate::RiskPolicy;
use crate::domain::shared::{Money, StrategyId};

/// Budget Allocator - maps a strategy to its share of equity.
#[derive(Debug, Clone, Copy)]
pub struct BudgetAllocator<'a> {
    policy: &'a RiskPolicy,
}

impl<'a> BudgetAllocator<'a> {
    /// Create an allocator over a policy.
    #[must_use]
    pub const fn new(policy: &'a RiskPolicy) -> Self {
        Self { policy }
    }

    /// Capital allocated to `strategy_id` at `equity`.
    ///
    /// Strategies without their own budget use the `"default"` entry. With
    /// neither, or with non-positive equity, the allocation is zero.
    #[must_use]
    pub fn allocate(&self, strategy_id: &StrategyId, equity: Money) -> Money {
        if !equity.is_positive() {
            return Money::ZERO;
        }
        self.policy
            .budget_for(strategy_id)
            .map_or(Money::ZERO, |budget| equity * budget.capital_weight)
    }
}

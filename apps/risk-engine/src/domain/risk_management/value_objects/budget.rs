//! Strategy capital budgets.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::shared::StrategyId;

/// Capital weight substituted when a policy declares no budgets.
pub const DEFAULT_BUDGET_WEIGHT: Decimal = dec!(0.95);

/// A strategy's share of total equity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Strategy funded by this budget (`"default"` funds unlisted strategies).
    pub strategy_id: StrategyId,
    /// Fraction of equity in `[0, 1]`.
    pub capital_weight: Decimal,
}

impl Budget {
    /// Create a budget entry.
    #[must_use]
    pub fn new(strategy_id: impl Into<StrategyId>, capital_weight: Decimal) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            capital_weight,
        }
    }

    /// The synthetic `{default: 0.95}` budget.
    #[must_use]
    pub fn synthetic_default() -> Self {
        Self::new(StrategyId::default_budget(), DEFAULT_BUDGET_WEIGHT)
    }

    /// Returns true if this is the fallback budget.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.strategy_id.is_default()
    }
}

/// Sum of capital weights across a budget list, or `None` on overflow.
#[must_use]
pub fn total_weight(budgets: &[Budget]) -> Option<Decimal> {
    budgets
        .iter()
        .try_fold(Decimal::ZERO, |total, b| total.checked_add(b.capital_weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_default_is_95_pct() {
        let budget = Budget::synthetic_default();
        assert!(budget.is_default());
        assert_eq!(budget.capital_weight, dec!(0.95));
    }

    #[test]
    fn total_weight_is_exact() {
        let budgets = vec![
            Budget::new("a", dec!(0.1)),
            Budget::new("b", dec!(0.2)),
            Budget::new("c", dec!(0.7)),
        ];
        assert_eq!(total_weight(&budgets), Some(Decimal::ONE));
    }

    #[test]
    fn total_weight_of_nothing_is_zero() {
        assert_eq!(total_weight(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn total_weight_overflow_is_none() {
        let budgets = vec![
            Budget::new("a", Decimal::MAX),
            Budget::new("b", Decimal::MAX),
        ];
        assert_eq!(total_weight(&budgets), None);
    }
}

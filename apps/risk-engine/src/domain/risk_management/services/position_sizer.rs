//! Position Sizer
//!
//! Second layer of the two-layer allocation: deploys a fraction of the
//! strategy's allocated capital per signal. The fraction applies to allocated
//! capital, never to total equity.

use rust_decimal::Decimal;

use crate::domain::risk_management::aggregate::RiskPolicy;
use crate::domain::risk_management::value_objects::{Signal, SizingModel};
use crate::domain::shared::Money;

/// Position Sizer - turns allocated capital and a signal into a signed
/// candidate target notional.
#[derive(Debug, Clone, Copy)]
pub struct PositionSizer<'a> {
    policy: &'a RiskPolicy,
}

impl<'a> PositionSizer<'a> {
    /// Create a sizer over a policy.
    #[must_use]
    pub const fn new(policy: &'a RiskPolicy) -> Self {
        Self { policy }
    }

    /// Candidate target notional for `signal`.
    ///
    /// Opens are sized by the policy algorithm and signed by direction.
    /// Closes carry no candidate; their target follows from the current
    /// holding once limits are enforced.
    #[must_use]
    pub fn size(&self, allocated: Money, signal: &Signal) -> Money {
        if signal.intention.is_close() {
            return Money::ZERO;
        }

        let sizing = self.policy.sizing();
        let base = match sizing.model {
            SizingModel::FixedEquityPct { fixed_equity_pct } => allocated * fixed_equity_pct,
        };
        let confidence = if sizing.adjust_for_confidence {
            signal.confidence
        } else {
            Decimal::ONE
        };

        base * confidence * signal.intention.order_sign()
    }
}

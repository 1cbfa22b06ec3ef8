//! Limit Enforcer
//!
//! Clamps a candidate target against the policy caps, in a fixed order so
//! the blamed limit is deterministic when several bind at once:
//!
//! 1. Position limit (`max_position_pct` of allocated capital)
//! 2. Gross leverage
//! 3. Net leverage
//! 4. Sector exposure
//! 5. Correlated exposure
//!
//! Exposure is computed on a hypothetical book in which the strategy's
//! current holding in the symbol is replaced by the candidate. A step that
//! reduces the size to zero rejects; otherwise the clamped size is accepted.
//! The enforcer never increases the candidate's magnitude. Cap arithmetic
//! saturates, so a cap too large to represent never binds.

use rust_decimal::Decimal;

use crate::domain::risk_management::aggregate::RiskPolicy;
use crate::domain::risk_management::value_objects::{
    ExposureBook, LimitKind, PortfolioState, RejectionReason, Signal, SignalIntention,
    SizingDecision,
};
use crate::domain::shared::Money;

/// Limit Enforcer - applies the portfolio caps to one candidate.
#[derive(Debug, Clone, Copy)]
pub struct LimitEnforcer<'a> {
    policy: &'a RiskPolicy,
}

impl<'a> LimitEnforcer<'a> {
    /// Create an enforcer over a policy.
    #[must_use]
    pub const fn new(policy: &'a RiskPolicy) -> Self {
        Self { policy }
    }

    /// Enforce limits against a caller's snapshot with no in-cycle overlay.
    #[must_use]
    pub fn enforce_against_state(
        &self,
        state: &PortfolioState,
        signal: &Signal,
        allocated: Money,
        candidate: Money,
    ) -> SizingDecision {
        let book = ExposureBook::from_state(state);
        self.enforce(state, &book, signal, allocated, candidate)
    }

    /// Clamp `candidate` for `signal`.
    ///
    /// `state` supplies equity and reference data (sectors, correlations);
    /// `book` supplies holdings, including targets already accepted this
    /// cycle.
    #[must_use]
    pub fn enforce(
        &self,
        state: &PortfolioState,
        book: &ExposureBook,
        signal: &Signal,
        allocated: Money,
        candidate: Money,
    ) -> SizingDecision {
        let current = book.market_value(&signal.strategy_id, &signal.symbol);

        if signal.intention.is_close() {
            let target = close_target(signal.intention, current);
            return SizingDecision::accepted(signal, target, current, Vec::new());
        }
        if candidate.is_zero() {
            return SizingDecision::rejected(signal, RejectionReason::ZeroSize, Vec::new());
        }

        let mut clamp = Clamp::new(candidate);
        match self.apply_limits(&mut clamp, state, book, signal, allocated) {
            Ok(()) => SizingDecision::accepted(signal, clamp.target, current, clamp.applied),
            Err(limit) => {
                tracing::debug!(
                    strategy_id = %signal.strategy_id,
                    symbol = %signal.symbol,
                    limit = %limit,
                    candidate = %candidate,
                    "Candidate clamped to zero"
                );
                SizingDecision::rejected(signal, limit.rejection_reason(), clamp.applied)
            }
        }
    }

    fn apply_limits(
        &self,
        clamp: &mut Clamp,
        state: &PortfolioState,
        book: &ExposureBook,
        signal: &Signal,
        allocated: Money,
    ) -> Result<(), LimitKind> {
        let limits = self.policy.limits();
        let equity = state.equity.amount();
        let (strategy_id, symbol) = (&signal.strategy_id, &signal.symbol);

        clamp.apply(
            LimitKind::PositionLimit,
            allocated.amount().saturating_mul(limits.max_position_pct),
        )?;

        let others = book.exposure_excluding(strategy_id, symbol);
        clamp.apply(
            LimitKind::GrossLeverage,
            headroom(limits.max_gross_leverage, equity, others.gross),
        )?;

        if let Some(headroom) = net_headroom(
            clamp.target,
            others.net.amount(),
            limits.max_net_leverage.saturating_mul(equity),
        ) {
            clamp.apply(LimitKind::NetLeverage, headroom)?;
        }

        if let Some(sector) = state.sector_of(symbol) {
            let sector_gross = book.gross_excluding(strategy_id, symbol, |held| {
                state.sector_of(held) == Some(sector)
            });
            clamp.apply(
                LimitKind::SectorExposure,
                headroom(limits.max_sector_exposure, equity, sector_gross),
            )?;
        }

        let threshold = limits.correlation_threshold;
        let group_gross = book.gross_excluding(strategy_id, symbol, |held| {
            state.correlations.is_correlated(symbol, held, threshold)
        });
        clamp.apply(
            LimitKind::CorrelatedExposure,
            headroom(limits.max_correlated_exposure, equity, group_gross),
        )?;

        Ok(())
    }
}

/// Target after a close: flat when the holding is on the closed side,
/// otherwise unchanged.
fn close_target(intention: SignalIntention, current: Money) -> Money {
    match intention {
        SignalIntention::CloseLong if current.is_positive() => Money::ZERO,
        SignalIntention::CloseShort if current.is_negative() => Money::ZERO,
        _ => current,
    }
}

/// `ratio x equity` minus what is already used.
fn headroom(ratio: Decimal, equity: Decimal, used: Money) -> Decimal {
    ratio.saturating_mul(equity).saturating_sub(used.amount())
}

/// Largest magnitude the target may keep without pushing net exposure past
/// `cap` in its own direction, or `None` if the cap does not bind.
fn net_headroom(target: Money, other_net: Decimal, cap: Decimal) -> Option<Decimal> {
    let target = target.amount();
    let net = other_net.saturating_add(target);
    if target > Decimal::ZERO && net > cap {
        Some(cap.saturating_sub(other_net))
    } else if target < Decimal::ZERO && net < -cap {
        Some(cap.saturating_add(other_net))
    } else {
        None
    }
}

/// Running candidate plus the limits that altered it.
struct Clamp {
    target: Money,
    applied: Vec<LimitKind>,
}

impl Clamp {
    const fn new(target: Money) -> Self {
        Self {
            target,
            applied: Vec::new(),
        }
    }

    /// Cap the target's magnitude at `max_magnitude`. Errors with `limit`
    /// when nothing is left.
    fn apply(&mut self, limit: LimitKind, max_magnitude: Decimal) -> Result<(), LimitKind> {
        let capped = self.target.cap_magnitude(max_magnitude);
        if capped.abs() < self.target.abs() {
            tracing::debug!(
                limit = %limit,
                from = %self.target,
                to = %capped,
                "Candidate clamped"
            );
            self.applied.push(limit);
            self.target = capped;
        }
        if self.target.is_zero() {
            Err(limit)
        } else {
            Ok(())
        }
    }
}

//! Risk Engine
//!
//! Orchestrates one evaluation cycle:
//!
//! ```text
//! begin_cycle(state) ── DrawdownMonitor::observe (once per cycle)
//!        │
//!        ▼
//! evaluate(signal) ── drawdown gate ── BudgetAllocator ── PositionSizer
//!                         │                                   │
//!                   reject (breach)              scale (reduce_positions)
//!                                                             │
//!                                                      LimitEnforcer ── SizingDecision
//! ```
//!
//! Drawdown gating happens before any capital is computed, so a frozen book
//! never sizes and never leaks size through a clamp path.

use std::sync::Arc;

use crate::domain::risk_management::aggregate::RiskPolicy;
use crate::domain::risk_management::services::{
    BudgetAllocator, DrawdownGate, DrawdownMonitor, DrawdownStatus, LimitEnforcer, PositionSizer,
};
use crate::domain::risk_management::value_objects::{
    ExposureBook, LimitKind, PortfolioState, RejectionReason, Signal, SizingDecision,
};

/// Risk Engine - owns the policy and the drawdown monitor for one run.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    policy: Arc<RiskPolicy>,
    monitor: DrawdownMonitor,
}

impl RiskEngine {
    /// Create an engine for a validated policy.
    #[must_use]
    pub fn new(policy: RiskPolicy) -> Self {
        Self::with_shared_policy(Arc::new(policy))
    }

    /// Create an engine sharing a policy with other engines.
    #[must_use]
    pub fn with_shared_policy(policy: Arc<RiskPolicy>) -> Self {
        let monitor = DrawdownMonitor::new(policy.limits());
        Self { policy, monitor }
    }

    /// Get the policy.
    #[must_use]
    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Drawdown state as of the last cycle.
    #[must_use]
    pub const fn drawdown_status(&self) -> DrawdownStatus {
        self.monitor.status()
    }

    /// Start a cycle against the caller's portfolio snapshot.
    ///
    /// Updates the drawdown monitor once. The state stays borrowed until the
    /// cycle ends, so it cannot change mid-cycle.
    pub fn begin_cycle<'s>(&mut self, state: &'s PortfolioState) -> EvaluationCycle<'_, 's> {
        let status = self.monitor.observe(state.equity, state.peak_equity);
        let book = ExposureBook::from_state(state);
        let leverage = book.exposure().as_pct_of_equity(state.equity);
        tracing::info!(
            policy = %self.policy.name(),
            equity = %state.equity,
            peak_equity = %state.peak_equity,
            drawdown = %status.drawdown,
            mode = %status.mode,
            gross_leverage = %leverage.gross_pct,
            net_leverage = %leverage.net_pct,
            "Evaluation cycle started"
        );

        EvaluationCycle {
            policy: &self.policy,
            monitor: &self.monitor,
            status,
            state,
            book,
        }
    }

    /// Run a whole cycle: observe drawdown, then evaluate `signals` in order.
    pub fn evaluate_cycle(
        &mut self,
        state: &PortfolioState,
        signals: &[Signal],
    ) -> Vec<SizingDecision> {
        self.begin_cycle(state).evaluate_all(signals)
    }
}

/// One evaluation cycle.
///
/// Accepted targets are overlaid on a private exposure book, so later signals
/// in the same cycle see exposure already committed. The caller's state is
/// never written.
#[derive(Debug)]
pub struct EvaluationCycle<'e, 's> {
    policy: &'e RiskPolicy,
    monitor: &'e DrawdownMonitor,
    status: DrawdownStatus,
    state: &'s PortfolioState,
    book: ExposureBook,
}

impl EvaluationCycle<'_, '_> {
    /// Drawdown state for this cycle.
    #[must_use]
    pub const fn drawdown_status(&self) -> DrawdownStatus {
        self.status
    }

    /// Holdings including targets accepted so far this cycle.
    #[must_use]
    pub const fn book(&self) -> &ExposureBook {
        &self.book
    }

    /// Size one signal.
    pub fn evaluate(&mut self, signal: &Signal) -> SizingDecision {
        let decision = self
            .decide(signal)
            .with_unwind_requested(self.status.unwind_requested());

        if decision.accepted {
            self.book
                .set_target(&decision.strategy_id, &decision.symbol, decision.target_notional);
            tracing::debug!(
                strategy_id = %decision.strategy_id,
                symbol = %decision.symbol,
                intention = %decision.intention,
                target = %decision.target_notional,
                order = %decision.order_notional,
                clamped = decision.was_clamped(),
                "Signal sized"
            );
        } else {
            tracing::warn!(
                strategy_id = %decision.strategy_id,
                symbol = %decision.symbol,
                intention = %decision.intention,
                reason = ?decision.rejection_reason,
                timestamp = ?signal.timestamp,
                "Signal rejected"
            );
        }

        decision
    }

    /// Size signals in arrival order.
    pub fn evaluate_all(&mut self, signals: &[Signal]) -> Vec<SizingDecision> {
        signals.iter().map(|signal| self.evaluate(signal)).collect()
    }

    fn decide(&self, signal: &Signal) -> SizingDecision {
        if !signal.has_valid_confidence() {
            return SizingDecision::rejected(signal, RejectionReason::InvalidSignal, Vec::new());
        }

        let scale = match self.monitor.gate(signal.intention) {
            DrawdownGate::Block => {
                return SizingDecision::rejected(
                    signal,
                    RejectionReason::DrawdownBreach,
                    vec![LimitKind::Drawdown],
                );
            }
            DrawdownGate::Scale { factor } => Some(factor),
            DrawdownGate::Allow => None,
        };

        let allocated =
            BudgetAllocator::new(self.policy).allocate(&signal.strategy_id, self.state.equity);
        if signal.intention.is_open() && allocated.is_zero() {
            return SizingDecision::rejected(signal, RejectionReason::Unfunded, Vec::new());
        }

        let mut candidate = PositionSizer::new(self.policy).size(allocated, signal);
        let mut scaled = false;
        if let Some(factor) = scale {
            let reduced = candidate * factor;
            scaled = reduced.abs() < candidate.abs();
            candidate = reduced;
        }

        if signal.intention.is_open() && candidate.is_zero() {
            return if scaled {
                SizingDecision::rejected(
                    signal,
                    RejectionReason::DrawdownBreach,
                    vec![LimitKind::Drawdown],
                )
            } else {
                SizingDecision::rejected(signal, RejectionReason::ZeroSize, Vec::new())
            };
        }

        let mut decision = LimitEnforcer::new(self.policy).enforce(
            self.state,
            &self.book,
            signal,
            allocated,
            candidate,
        );
        if scaled {
            decision.applied_limits.insert(0, LimitKind::Drawdown);
        }
        decision
    }
}

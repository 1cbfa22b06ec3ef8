//! Per-signal sizing outcome handed to the execution layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Signal, SignalIntention};
use crate::domain::shared::{Money, StrategyId, Symbol};

/// A check that altered or blocked a size, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    /// Drawdown gate (block or reduction).
    Drawdown,
    /// `max_position_pct` of allocated capital.
    PositionLimit,
    /// `max_gross_leverage`.
    GrossLeverage,
    /// `max_net_leverage`.
    NetLeverage,
    /// `max_sector_exposure`.
    SectorExposure,
    /// `max_correlated_exposure`.
    CorrelatedExposure,
}

impl LimitKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Drawdown => "drawdown",
            Self::PositionLimit => "position_limit",
            Self::GrossLeverage => "gross_leverage",
            Self::NetLeverage => "net_leverage",
            Self::SectorExposure => "sector_exposure",
            Self::CorrelatedExposure => "correlated_exposure",
        }
    }

    /// Reason reported when this check reduces a size to zero.
    #[must_use]
    pub const fn rejection_reason(&self) -> RejectionReason {
        match self {
            Self::Drawdown => RejectionReason::DrawdownBreach,
            Self::PositionLimit => RejectionReason::PositionLimitExceeded,
            Self::GrossLeverage => RejectionReason::GrossLeverageExceeded,
            Self::NetLeverage => RejectionReason::NetLeverageExceeded,
            Self::SectorExposure => RejectionReason::SectorExposureExceeded,
            Self::CorrelatedExposure => RejectionReason::CorrelatedExposureExceeded,
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a signal produced no trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Confidence outside `[0, 1]`.
    InvalidSignal,
    /// The strategy has no budget and no default budget exists.
    Unfunded,
    /// The sizer produced a zero candidate for an open.
    ZeroSize,
    /// Blocked by the drawdown monitor.
    DrawdownBreach,
    /// Clamped to zero by the position limit.
    PositionLimitExceeded,
    /// Clamped to zero by gross leverage.
    GrossLeverageExceeded,
    /// Clamped to zero by net leverage.
    NetLeverageExceeded,
    /// Clamped to zero by sector exposure.
    SectorExposureExceeded,
    /// Clamped to zero by correlated exposure.
    CorrelatedExposureExceeded,
}

impl RejectionReason {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSignal => "invalid_signal",
            Self::Unfunded => "unfunded",
            Self::ZeroSize => "zero_size",
            Self::DrawdownBreach => "drawdown_breach",
            Self::PositionLimitExceeded => "position_limit_exceeded",
            Self::GrossLeverageExceeded => "gross_leverage_exceeded",
            Self::NetLeverageExceeded => "net_leverage_exceeded",
            Self::SectorExposureExceeded => "sector_exposure_exceeded",
            Self::CorrelatedExposureExceeded => "correlated_exposure_exceeded",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's answer to one signal.
///
/// `target_notional` is the desired signed notional of the strategy's
/// position after the trade; `order_notional` is the signed amount to trade
/// to get there. Rejections carry zero for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingDecision {
    /// Strategy that emitted the signal.
    pub strategy_id: StrategyId,
    /// Instrument.
    pub symbol: Symbol,
    /// Intention of the originating signal.
    pub intention: SignalIntention,
    /// Desired post-trade signed notional.
    pub target_notional: Money,
    /// Signed notional to trade (`target - current`).
    pub order_notional: Money,
    /// False when no trade should be placed.
    pub accepted: bool,
    /// Set when `accepted` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
    /// Checks that altered or blocked the size, in order.
    #[serde(default)]
    pub applied_limits: Vec<LimitKind>,
    /// Existing positions should be unwound by the caller.
    #[serde(default)]
    pub unwind_requested: bool,
}

impl SizingDecision {
    /// An accepted decision moving the position from `current` to `target`.
    #[must_use]
    pub fn accepted(
        signal: &Signal,
        target: Money,
        current: Money,
        applied_limits: Vec<LimitKind>,
    ) -> Self {
        Self {
            strategy_id: signal.strategy_id.clone(),
            symbol: signal.symbol.clone(),
            intention: signal.intention,
            target_notional: target,
            order_notional: target.saturating_sub(current),
            accepted: true,
            rejection_reason: None,
            applied_limits,
            unwind_requested: false,
        }
    }

    /// A rejected decision.
    #[must_use]
    pub fn rejected(
        signal: &Signal,
        reason: RejectionReason,
        applied_limits: Vec<LimitKind>,
    ) -> Self {
        Self {
            strategy_id: signal.strategy_id.clone(),
            symbol: signal.symbol.clone(),
            intention: signal.intention,
            target_notional: Money::ZERO,
            order_notional: Money::ZERO,
            accepted: false,
            rejection_reason: Some(reason),
            applied_limits,
            unwind_requested: false,
        }
    }

    /// Set the unwind flag.
    #[must_use]
    pub const fn with_unwind_requested(mut self, unwind: bool) -> Self {
        self.unwind_requested = unwind;
        self
    }

    /// Returns true if any check altered the size.
    #[must_use]
    pub fn was_clamped(&self) -> bool {
        !self.applied_limits.is_empty()
    }

    /// Returns true if `limit` altered or blocked the size.
    #[must_use]
    pub fn applied(&self, limit: LimitKind) -> bool {
        self.applied_limits.contains(&limit)
    }
}

impl fmt::Display for SizingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rejection_reason {
            Some(reason) if !self.accepted => write!(
                f,
                "{} {} {}: rejected ({reason})",
                self.strategy_id, self.intention, self.symbol
            ),
            _ => write!(
                f,
                "{} {} {}: target {} order {}",
                self.strategy_id,
                self.intention,
                self.symbol,
                self.target_notional,
                self.order_notional
            ),
        }
    }
}

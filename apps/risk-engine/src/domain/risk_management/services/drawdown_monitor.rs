//! Drawdown Monitor
//!
//! Two-state machine evaluated once per cycle before any sizing:
//!
//! ```text
//!             equity <= peak x (1 - max_drawdown_pct)
//!   NORMAL  ------------------------------------->  RESTRICTED
//!           <-------------------------------------
//!             equity >  peak x (1 - max_drawdown_pct)
//! ```
//!
//! The mode is decided against that floor, which is exact in decimal
//! arithmetic; the drawdown ratio is only reported. The caller advances
//! `peak_equity`; the monitor only reads it.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::risk_management::value_objects::{DrawdownAction, RiskLimits, SignalIntention};
use crate::domain::shared::Money;

/// Drawdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrawdownMode {
    /// Drawdown below the threshold.
    #[default]
    Normal,
    /// Drawdown at or beyond the threshold; the policy action is in force.
    Restricted,
}

impl fmt::Display for DrawdownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Restricted => write!(f, "RESTRICTED"),
        }
    }
}

/// Snapshot of the monitor after its last observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownStatus {
    /// Current state.
    pub mode: DrawdownMode,
    /// Action the policy applies while restricted.
    pub action: DrawdownAction,
    /// Peak equity used for the last computation.
    pub peak_equity: Money,
    /// Equity used for the last computation.
    pub equity: Money,
    /// `(peak - equity) / peak`, floored at zero.
    pub drawdown: Decimal,
}

impl DrawdownStatus {
    /// Returns true in the restricted state.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.mode == DrawdownMode::Restricted
    }

    /// Returns true if the caller should unwind existing positions.
    #[must_use]
    pub fn unwind_requested(&self) -> bool {
        self.is_restricted() && self.action == DrawdownAction::ReducePositions
    }
}

/// What the drawdown state allows for one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawdownGate {
    /// Size normally.
    Allow,
    /// Reject with `drawdown_breach` before any sizing.
    Block,
    /// Size, then scale the candidate by `factor`.
    Scale {
        /// Reduction applied to the candidate.
        factor: Decimal,
    },
}

/// Drawdown Monitor - the engine's only cross-cycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawdownMonitor {
    max_drawdown_pct: Decimal,
    action: DrawdownAction,
    reduction_factor: Decimal,
    current_peak: Money,
    current_equity: Money,
    current_mode: DrawdownMode,
    last_drawdown: Decimal,
}

impl DrawdownMonitor {
    /// Create a monitor in the normal state.
    #[must_use]
    pub fn new(limits: &RiskLimits) -> Self {
        Self {
            max_drawdown_pct: limits.max_drawdown_pct,
            action: limits.drawdown_action,
            reduction_factor: limits.drawdown_reduction_factor,
            current_peak: Money::ZERO,
            current_equity: Money::ZERO,
            current_mode: DrawdownMode::Normal,
            last_drawdown: Decimal::ZERO,
        }
    }

    /// Drawdown of `equity` from `peak`. Zero when the peak is not positive
    /// or equity sits above it.
    #[must_use]
    pub fn drawdown(peak: Money, equity: Money) -> Decimal {
        let fall = peak.amount().saturating_sub(equity.amount());
        if !peak.is_positive() || fall <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        fall.checked_div(peak.amount()).unwrap_or(Decimal::MAX)
    }

    /// Returns true if `equity` sits at or below the drawdown floor
    /// `peak x (1 - max_drawdown_pct)`. Never true for a non-positive peak.
    #[must_use]
    pub fn is_breached(&self, peak: Money, equity: Money) -> bool {
        peak.is_positive()
            && equity.amount() <= peak.amount() * (Decimal::ONE - self.max_drawdown_pct)
    }

    /// Update the state from this cycle's equity and peak.
    pub fn observe(&mut self, equity: Money, peak_equity: Money) -> DrawdownStatus {
        let drawdown = Self::drawdown(peak_equity, equity);
        let next = if self.is_breached(peak_equity, equity) {
            DrawdownMode::Restricted
        } else {
            DrawdownMode::Normal
        };

        match (self.current_mode, next) {
            (DrawdownMode::Normal, DrawdownMode::Restricted) => tracing::warn!(
                peak = %peak_equity,
                equity = %equity,
                drawdown = %drawdown,
                max_drawdown_pct = %self.max_drawdown_pct,
                action = %self.action,
                "Drawdown limit breached, trading restricted"
            ),
            (DrawdownMode::Restricted, DrawdownMode::Normal) => tracing::info!(
                peak = %peak_equity,
                equity = %equity,
                drawdown = %drawdown,
                "Equity recovered, drawdown restriction lifted"
            ),
            _ => {}
        }

        self.current_peak = peak_equity;
        self.current_equity = equity;
        self.current_mode = next;
        self.last_drawdown = drawdown;
        self.status()
    }

    /// The state after the last observation.
    #[must_use]
    pub const fn status(&self) -> DrawdownStatus {
        DrawdownStatus {
            mode: self.current_mode,
            action: self.action,
            peak_equity: self.current_peak,
            equity: self.current_equity,
            drawdown: self.last_drawdown,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn mode(&self) -> DrawdownMode {
        self.current_mode
    }

    /// What the current state allows for a signal with `intention`.
    #[must_use]
    pub fn gate(&self, intention: SignalIntention) -> DrawdownGate {
        if self.current_mode == DrawdownMode::Normal {
            return DrawdownGate::Allow;
        }
        match self.action {
            DrawdownAction::StopAll => DrawdownGate::Block,
            DrawdownAction::StopNewPositions if intention.is_open() => DrawdownGate::Block,
            DrawdownAction::ReducePositions if intention.is_open() => DrawdownGate::Scale {
                factor: self.reduction_factor,
            },
            DrawdownAction::StopNewPositions | DrawdownAction::ReducePositions => {
                DrawdownGate::Allow
            }
        }
    }
}

//! Portfolio limit configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the engine does while equity sits below the drawdown threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawdownAction {
    /// Reject `OPEN_*` signals; closes pass through.
    #[default]
    StopNewPositions,
    /// Scale open sizes down and flag existing positions for unwind.
    ReducePositions,
    /// Reject every signal, closes included.
    StopAll,
}

impl DrawdownAction {
    /// Every recognized document value.
    pub const ALL: [&'static str; 3] = ["stop_new_positions", "reduce_positions", "stop_all"];

    /// Parse a document value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stop_new_positions" => Some(Self::StopNewPositions),
            "reduce_positions" => Some(Self::ReducePositions),
            "stop_all" => Some(Self::StopAll),
            _ => None,
        }
    }

    /// Document spelling of this action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StopNewPositions => "stop_new_positions",
            Self::ReducePositions => "reduce_positions",
            Self::StopAll => "stop_all",
        }
    }
}

impl fmt::Display for DrawdownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `limits` block of a risk policy.
///
/// All fractions are of equity except `max_position_pct`, which is a fraction
/// of the strategy's allocated capital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Largest single target as a fraction of allocated capital.
    pub max_position_pct: Decimal,
    /// Cap on `(long + |short|) / equity`.
    pub max_gross_leverage: Decimal,
    /// Cap on `|long - |short|| / equity`.
    pub max_net_leverage: Decimal,
    /// Cap on the gross market value of one sector over equity.
    pub max_sector_exposure: Decimal,
    /// Cap on the gross market value of a correlated group over equity.
    pub max_correlated_exposure: Decimal,
    /// Pairwise correlation at or above which symbols are grouped.
    pub correlation_threshold: Decimal,
    /// Drawdown from peak that restricts trading.
    pub max_drawdown_pct: Decimal,
    /// Response to a drawdown breach.
    pub drawdown_action: DrawdownAction,
    /// Scale applied to open sizes under [`DrawdownAction::ReducePositions`].
    pub drawdown_reduction_factor: Decimal,
}

impl RiskLimits {
    /// Default `max_position_pct`.
    pub const DEFAULT_MAX_POSITION_PCT: Decimal = Decimal::ONE;
    /// Default `max_gross_leverage`.
    pub const DEFAULT_MAX_GROSS_LEVERAGE: Decimal = Decimal::ONE;
    /// Default `max_net_leverage`.
    pub const DEFAULT_MAX_NET_LEVERAGE: Decimal = Decimal::ONE;
    /// Default `max_sector_exposure`.
    pub const DEFAULT_MAX_SECTOR_EXPOSURE: Decimal = Decimal::ONE;
    /// Default `max_correlated_exposure`.
    pub const DEFAULT_MAX_CORRELATED_EXPOSURE: Decimal = Decimal::ONE;
    /// Default `correlation_threshold`.
    pub const DEFAULT_CORRELATION_THRESHOLD: Decimal = dec!(0.7);
    /// Default `max_drawdown_pct`.
    pub const DEFAULT_MAX_DRAWDOWN_PCT: Decimal = dec!(0.20);
    /// Default `drawdown_reduction_factor` (halve open sizes).
    pub const DEFAULT_DRAWDOWN_REDUCTION_FACTOR: Decimal = dec!(0.5);
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position_pct: Self::DEFAULT_MAX_POSITION_PCT,
            max_gross_leverage: Self::DEFAULT_MAX_GROSS_LEVERAGE,
            max_net_leverage: Self::DEFAULT_MAX_NET_LEVERAGE,
            max_sector_exposure: Self::DEFAULT_MAX_SECTOR_EXPOSURE,
            max_correlated_exposure: Self::DEFAULT_MAX_CORRELATED_EXPOSURE,
            correlation_threshold: Self::DEFAULT_CORRELATION_THRESHOLD,
            max_drawdown_pct: Self::DEFAULT_MAX_DRAWDOWN_PCT,
            drawdown_action: DrawdownAction::default(),
            drawdown_reduction_factor: Self::DEFAULT_DRAWDOWN_REDUCTION_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_explicit() {
        let limits = RiskLimits::default();
        assert_eq!(limits.max_position_pct, Decimal::ONE);
        assert_eq!(limits.max_gross_leverage, Decimal::ONE);
        assert_eq!(limits.correlation_threshold, dec!(0.7));
        assert_eq!(limits.max_drawdown_pct, dec!(0.2));
        assert_eq!(limits.drawdown_action, DrawdownAction::StopNewPositions);
        assert_eq!(limits.drawdown_reduction_factor, dec!(0.5));
    }

    #[test]
    fn drawdown_action_parse_roundtrip() {
        for value in DrawdownAction::ALL {
            assert_eq!(DrawdownAction::parse(value).unwrap().as_str(), value);
        }
        assert!(DrawdownAction::parse("liquidate").is_none());
    }

    #[test]
    fn drawdown_action_serde_snake_case() {
        let json = serde_json::to_string(&DrawdownAction::ReducePositions).unwrap();
        assert_eq!(json, "\"reduce_positions\"");
    }
}

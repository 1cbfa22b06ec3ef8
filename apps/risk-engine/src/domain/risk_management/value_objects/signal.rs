//! Trading signals emitted by the strategy layer.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{StrategyId, Symbol};

/// What the strategy wants to do with a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalIntention {
    /// Open (or re-target) a long position.
    OpenLong,
    /// Flatten a long holding. No-op if the holding is not long.
    CloseLong,
    /// Open (or re-target) a short position.
    OpenShort,
    /// Flatten a short holding. No-op if the holding is not short.
    CloseShort,
}

impl SignalIntention {
    /// Returns true for `OPEN_LONG` and `OPEN_SHORT`.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::OpenLong | Self::OpenShort)
    }

    /// Returns true for `CLOSE_LONG` and `CLOSE_SHORT`.
    #[must_use]
    pub const fn is_close(&self) -> bool {
        !self.is_open()
    }

    /// Sign of the resulting order: buys (`OPEN_LONG`, `CLOSE_SHORT`) are
    /// positive, sells (`OPEN_SHORT`, `CLOSE_LONG`) negative.
    #[must_use]
    pub const fn order_sign(&self) -> Decimal {
        match self {
            Self::OpenLong | Self::CloseShort => Decimal::ONE,
            Self::OpenShort | Self::CloseLong => Decimal::NEGATIVE_ONE,
        }
    }
}

impl fmt::Display for SignalIntention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenLong => write!(f, "OPEN_LONG"),
            Self::CloseLong => write!(f, "CLOSE_LONG"),
            Self::OpenShort => write!(f, "OPEN_SHORT"),
            Self::CloseShort => write!(f, "CLOSE_SHORT"),
        }
    }
}

/// A strategy's request to trade, sized by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Emitting strategy.
    pub strategy_id: StrategyId,
    /// Instrument to trade.
    pub symbol: Symbol,
    /// Open or close, long or short.
    pub intention: SignalIntention,
    /// Conviction in `[0, 1]`.
    pub confidence: Decimal,
    /// Bar time the signal was generated for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Free-form strategy annotations; passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Signal {
    /// Create a signal without timestamp or metadata.
    #[must_use]
    pub fn new(
        strategy_id: impl Into<StrategyId>,
        symbol: impl Into<Symbol>,
        intention: SignalIntention,
        confidence: Decimal,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            symbol: symbol.into(),
            intention,
            confidence,
            timestamp: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach the bar time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns true if confidence lies in `[0, 1]`.
    #[must_use]
    pub fn has_valid_confidence(&self) -> bool {
        (Decimal::ZERO..=Decimal::ONE).contains(&self.confidence)
    }
}

//! Caller-owned portfolio snapshot read by the engine each cycle.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CorrelationMatrix;
use crate::domain::shared::{Money, Sector, StrategyId, Symbol};

/// One strategy's holding in one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Signed quantity (negative for short).
    pub quantity: Decimal,
    /// Signed market value (negative for short).
    pub market_value: Money,
    /// Sector classification, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<Sector>,
}

impl PositionSnapshot {
    /// Create a position snapshot.
    #[must_use]
    pub const fn new(quantity: Decimal, market_value: Money) -> Self {
        Self {
            quantity,
            market_value,
            sector: None,
        }
    }

    /// Attach the sector.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<Sector>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Check if this is a long position.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.market_value.is_positive()
    }

    /// Check if this is a short position.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.market_value.is_negative()
    }
}

/// Positions of one strategy, keyed by symbol.
pub type StrategyPositions = BTreeMap<Symbol, PositionSnapshot>;

/// Everything the engine reads about the portfolio for one cycle.
///
/// The engine never writes to this; the caller marks positions to market,
/// advances `peak_equity` and applies fills between cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioState {
    /// Current account equity.
    pub equity: Money,
    /// Historical equity maximum (non-decreasing, maintained by the caller).
    pub peak_equity: Money,
    /// Positions by strategy, then symbol.
    #[serde(default)]
    pub positions: BTreeMap<StrategyId, StrategyPositions>,
    /// Sector reference data for symbols that may not be held yet.
    #[serde(default)]
    pub sectors: BTreeMap<Symbol, Sector>,
    /// Pairwise symbol correlations.
    #[serde(default)]
    pub correlations: CorrelationMatrix,
}

impl PortfolioState {
    /// Create a flat portfolio.
    #[must_use]
    pub fn new(equity: Money, peak_equity: Money) -> Self {
        Self {
            equity,
            peak_equity,
            ..Self::default()
        }
    }

    /// Add or replace a position.
    pub fn set_position(
        &mut self,
        strategy_id: impl Into<StrategyId>,
        symbol: impl Into<Symbol>,
        position: PositionSnapshot,
    ) {
        self.positions
            .entry(strategy_id.into())
            .or_default()
            .insert(symbol.into(), position);
    }

    /// Builder form of [`PortfolioState::set_position`].
    #[must_use]
    pub fn with_position(
        mut self,
        strategy_id: impl Into<StrategyId>,
        symbol: impl Into<Symbol>,
        position: PositionSnapshot,
    ) -> Self {
        self.set_position(strategy_id, symbol, position);
        self
    }

    /// Builder form for sector reference data.
    #[must_use]
    pub fn with_sector(mut self, symbol: impl Into<Symbol>, sector: impl Into<Sector>) -> Self {
        self.sectors.insert(symbol.into(), sector.into());
        self
    }

    /// Replace the correlation table.
    #[must_use]
    pub fn with_correlations(mut self, correlations: CorrelationMatrix) -> Self {
        self.correlations = correlations;
        self
    }

    /// A strategy's position in a symbol.
    #[must_use]
    pub fn position(&self, strategy_id: &StrategyId, symbol: &Symbol) -> Option<&PositionSnapshot> {
        self.positions.get(strategy_id)?.get(symbol)
    }

    /// Iterate every position as `(strategy, symbol, snapshot)` in key order.
    pub fn iter_positions(&self) -> impl Iterator<Item = (&StrategyId, &Symbol, &PositionSnapshot)> {
        self.positions.iter().flat_map(|(strategy_id, held)| {
            held.iter()
                .map(move |(symbol, position)| (strategy_id, symbol, position))
        })
    }

    /// Sector of a symbol: a held position's own sector wins over the
    /// reference table.
    #[must_use]
    pub fn sector_of(&self, symbol: &Symbol) -> Option<&Sector> {
        self.iter_positions()
            .filter(|(_, held, _)| *held == symbol)
            .find_map(|(_, _, position)| position.sector.as_ref())
            .or_else(|| self.sectors.get(symbol))
    }
}

//! Exposure calculations.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PortfolioState;
use crate::domain::shared::{Money, StrategyId, Symbol};

/// Portfolio exposure metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Exposure {
    /// Gross exposure (long + |short|).
    pub gross: Money,
    /// Net exposure (long - |short|).
    pub net: Money,
    /// Long exposure.
    pub long: Money,
    /// Short exposure, as a positive amount.
    pub short: Money,
}

impl Exposure {
    /// Create from long and short values.
    ///
    /// Sums saturate at the `Decimal` range.
    #[must_use]
    pub fn from_long_short(long: Money, short: Money) -> Self {
        let short = short.abs();
        Self {
            gross: long.saturating_add(short),
            net: long.saturating_sub(short),
            long,
            short,
        }
    }

    /// Aggregate signed market values.
    pub fn from_market_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Money>,
    {
        let (long, short) = values
            .into_iter()
            .fold((Money::ZERO, Money::ZERO), |(long, short), value| {
                if value.is_negative() {
                    (long, short.saturating_add(value.abs()))
                } else {
                    (long.saturating_add(value), short)
                }
            });
        Self::from_long_short(long, short)
    }

    /// Calculate exposure as a fraction of equity.
    ///
    /// Non-positive equity yields zero ratios.
    #[must_use]
    pub fn as_pct_of_equity(&self, equity: Money) -> ExposurePercent {
        let ratio = |value: Money| value.ratio_to(equity).unwrap_or(Decimal::ZERO);
        ExposurePercent {
            gross_pct: ratio(self.gross),
            net_pct: ratio(self.net),
            long_pct: ratio(self.long),
            short_pct: ratio(self.short),
        }
    }
}

/// Exposure as a fraction of equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExposurePercent {
    /// Gross leverage.
    pub gross_pct: Decimal,
    /// Net leverage (signed).
    pub net_pct: Decimal,
    /// Long exposure over equity.
    pub long_pct: Decimal,
    /// Short exposure over equity.
    pub short_pct: Decimal,
}

/// Signed market value per `(strategy, symbol)` for one evaluation cycle.
///
/// Seeded from the caller's [`PortfolioState`] and overlaid with each
/// accepted target so later signals in the cycle see committed exposure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposureBook {
    entries: BTreeMap<(StrategyId, Symbol), Money>,
}

impl ExposureBook {
    /// Seed the book from a portfolio snapshot.
    #[must_use]
    pub fn from_state(state: &PortfolioState) -> Self {
        let entries = state
            .iter_positions()
            .filter(|(_, _, position)| !position.market_value.is_zero())
            .map(|(strategy_id, symbol, position)| {
                ((strategy_id.clone(), symbol.clone()), position.market_value)
            })
            .collect();
        Self { entries }
    }

    /// Current signed market value of a strategy's holding.
    #[must_use]
    pub fn market_value(&self, strategy_id: &StrategyId, symbol: &Symbol) -> Money {
        self.entries
            .get(&(strategy_id.clone(), symbol.clone()))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    /// Exposure of the whole book.
    #[must_use]
    pub fn exposure(&self) -> Exposure {
        Exposure::from_market_values(self.entries.values().copied())
    }

    /// Exposure of every holding except `(strategy_id, symbol)`.
    #[must_use]
    pub fn exposure_excluding(&self, strategy_id: &StrategyId, symbol: &Symbol) -> Exposure {
        Exposure::from_market_values(
            self.others(strategy_id, symbol)
                .map(|(_, value)| value),
        )
    }

    /// Gross market value of holdings whose symbol matches `include`,
    /// excluding `(strategy_id, symbol)` itself.
    #[must_use]
    pub fn gross_excluding<F>(&self, strategy_id: &StrategyId, symbol: &Symbol, include: F) -> Money
    where
        F: Fn(&Symbol) -> bool,
    {
        self.others(strategy_id, symbol)
            .filter(|(held, _)| include(held))
            .fold(Money::ZERO, |total, (_, value)| total.saturating_add(value.abs()))
    }

    /// Replace a holding with a new target. A zero target removes it.
    pub fn set_target(&mut self, strategy_id: &StrategyId, symbol: &Symbol, target: Money) {
        let key = (strategy_id.clone(), symbol.clone());
        if target.is_zero() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, target);
        }
    }

    /// Number of non-flat holdings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the book holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn others<'a>(
        &'a self,
        strategy_id: &'a StrategyId,
        symbol: &'a Symbol,
    ) -> impl Iterator<Item = (&'a Symbol, Money)> + 'a {
        self.entries
            .iter()
            .filter(move |((held_by, held), _)| !(held_by == strategy_id && held == symbol))
            .map(|((_, held), value)| (held, *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk_management::value_objects::PositionSnapshot;
    use rust_decimal_macros::dec;

    fn money(value: Decimal) -> Money {
        Money::new(value)
    }

    fn book() -> ExposureBook {
        let state = PortfolioState::new(money(dec!(100000)), money(dec!(100000)))
            .with_position("a", "AAPL", PositionSnapshot::new(dec!(1), money(dec!(30000))))
            .with_position("a", "MSFT", PositionSnapshot::new(dec!(-1), money(dec!(-10000))))
            .with_position("b", "AAPL", PositionSnapshot::new(dec!(1), money(dec!(5000))))
            .with_position("b", "FLAT", PositionSnapshot::new(dec!(0), Money::ZERO));
        ExposureBook::from_state(&state)
    }

    #[test]
    fn exposure_from_long_short() {
        let exp = Exposure::from_long_short(money(dec!(10000)), money(dec!(3000)));

        assert_eq!(exp.long, money(dec!(10000)));
        assert_eq!(exp.short, money(dec!(3000)));
        assert_eq!(exp.gross, money(dec!(13000)));
        assert_eq!(exp.net, money(dec!(7000)));
    }

    #[test]
    fn exposure_from_signed_values() {
        let exp = Exposure::from_market_values([
            money(dec!(10000)),
            money(dec!(-3000)),
            money(dec!(2000)),
        ]);
        assert_eq!(exp.gross, money(dec!(15000)));
        assert_eq!(exp.net, money(dec!(9000)));
    }

    #[test]
    fn huge_values_saturate() {
        let exp = Exposure::from_market_values([
            money(Decimal::MAX),
            money(Decimal::MAX),
            money(dec!(-1)),
        ]);
        assert_eq!(exp.long, money(Decimal::MAX));
        assert_eq!(exp.gross, money(Decimal::MAX));
    }

    #[test]
    fn exposure_as_pct_of_equity() {
        let exp = Exposure::from_long_short(money(dec!(10000)), Money::ZERO);
        let pct = exp.as_pct_of_equity(money(dec!(50000)));

        assert_eq!(pct.gross_pct, dec!(0.2));
        assert_eq!(pct.long_pct, dec!(0.2));
    }

    #[test]
    fn exposure_as_pct_zero_equity() {
        let exp = Exposure::from_long_short(money(dec!(10000)), Money::ZERO);
        let pct = exp.as_pct_of_equity(Money::ZERO);

        assert_eq!(pct.gross_pct, Decimal::ZERO);
    }

    #[test]
    fn book_skips_flat_positions() {
        let book = book();
        assert_eq!(book.len(), 3);
        assert_eq!(book.exposure().gross, money(dec!(45000)));
        assert_eq!(book.exposure().net, money(dec!(25000)));
    }

    #[test]
    fn exposure_excluding_drops_only_that_holding() {
        let book = book();
        let others = book.exposure_excluding(&StrategyId::new("a"), &Symbol::new("AAPL"));
        assert_eq!(others.long, money(dec!(5000)));
        assert_eq!(others.short, money(dec!(10000)));
    }

    #[test]
    fn gross_excluding_filters_symbols() {
        let book = book();
        let aapl = Symbol::new("AAPL");
        let gross = book.gross_excluding(&StrategyId::new("b"), &aapl, |s| s == &aapl);
        assert_eq!(gross, money(dec!(30000)));
    }

    #[test]
    fn set_target_overlays_and_removes() {
        let mut book = book();
        let (a, msft) = (StrategyId::new("a"), Symbol::new("MSFT"));
        book.set_target(&a, &msft, money(dec!(2000)));
        assert_eq!(book.market_value(&a, &msft), money(dec!(2000)));
        book.set_target(&a, &msft, Money::ZERO);
        assert_eq!(book.market_value(&a, &msft), Money::ZERO);
        assert_eq!(book.len(), 2);
    }
}

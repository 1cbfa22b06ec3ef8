//! Pairwise symbol correlations supplied by the caller.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;

/// Symmetric correlation table keyed by unordered symbol pair.
///
/// Each pair is stored once under its lexicographically smaller symbol.
/// Unknown pairs read as uncorrelated; a symbol always correlates 1 with
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PairTable", into = "PairTable")]
pub struct CorrelationMatrix {
    pairs: PairTable,
}

type PairTable = BTreeMap<Symbol, BTreeMap<Symbol, Decimal>>;

impl From<PairTable> for CorrelationMatrix {
    fn from(table: PairTable) -> Self {
        let mut matrix = Self::new();
        for (a, row) in table {
            for (b, correlation) in row {
                matrix.insert(a.clone(), b, correlation);
            }
        }
        matrix
    }
}

impl From<CorrelationMatrix> for PairTable {
    fn from(matrix: CorrelationMatrix) -> Self {
        matrix.pairs
    }
}

impl CorrelationMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the correlation between `a` and `b`. Self-pairs are ignored.
    pub fn insert(&mut self, a: impl Into<Symbol>, b: impl Into<Symbol>, correlation: Decimal) {
        let (a, b) = (a.into(), b.into());
        if a == b {
            return;
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        self.pairs.entry(low).or_default().insert(high, correlation);
    }

    /// Builder form of [`CorrelationMatrix::insert`].
    #[must_use]
    pub fn with(mut self, a: impl Into<Symbol>, b: impl Into<Symbol>, correlation: Decimal) -> Self {
        self.insert(a, b, correlation);
        self
    }

    /// Correlation between two symbols.
    #[must_use]
    pub fn get(&self, a: &Symbol, b: &Symbol) -> Decimal {
        if a == b {
            return Decimal::ONE;
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        self.pairs
            .get(low)
            .and_then(|row| row.get(high))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns true if `a` and `b` belong to the same correlated group at
    /// `threshold`.
    #[must_use]
    pub fn is_correlated(&self, a: &Symbol, b: &Symbol, threshold: Decimal) -> bool {
        self.get(a, b) >= threshold
    }

    /// Number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.values().map(BTreeMap::len).sum()
    }

    /// Returns true if no pairs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn lookup_is_symmetric() {
        let matrix = CorrelationMatrix::new().with("MSFT", "AAPL", dec!(0.82));
        let (aapl, msft) = (Symbol::new("AAPL"), Symbol::new("MSFT"));
        assert_eq!(matrix.get(&aapl, &msft), dec!(0.82));
        assert_eq!(matrix.get(&msft, &aapl), dec!(0.82));
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn self_correlation_is_one() {
        let matrix = CorrelationMatrix::new();
        let spy = Symbol::new("SPY");
        assert_eq!(matrix.get(&spy, &spy), Decimal::ONE);
        assert!(matrix.is_empty());
    }

    #[test]
    fn unknown_pair_is_uncorrelated() {
        let matrix = CorrelationMatrix::new().with("AAPL", "MSFT", dec!(0.9));
        assert_eq!(
            matrix.get(&Symbol::new("AAPL"), &Symbol::new("XOM")),
            Decimal::ZERO
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let matrix = CorrelationMatrix::new().with("AAPL", "MSFT", dec!(0.7));
        let (aapl, msft) = (Symbol::new("AAPL"), Symbol::new("MSFT"));
        assert!(matrix.is_correlated(&aapl, &msft, dec!(0.7)));
        assert!(!matrix.is_correlated(&aapl, &msft, dec!(0.71)));
    }

    #[test]
    fn insert_overwrites_either_order() {
        let mut matrix = CorrelationMatrix::new();
        matrix.insert("AAPL", "MSFT", dec!(0.5));
        matrix.insert("MSFT", "AAPL", dec!(0.9));
        assert_eq!(
            matrix.get(&Symbol::new("AAPL"), &Symbol::new("MSFT")),
            dec!(0.9)
        );
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn deserialized_pairs_are_normalized() {
        let matrix: CorrelationMatrix =
            serde_json::from_str(r#"{ "msft": { "aapl": "0.8", "msft": "1" } }"#).unwrap();
        assert_eq!(matrix.len(), 1);
        assert_eq!(
            matrix.get(&Symbol::new("AAPL"), &Symbol::new("MSFT")),
            dec!(0.8)
        );
    }
}

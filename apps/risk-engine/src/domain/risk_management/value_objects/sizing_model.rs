//! Sizing algorithm configuration.
//!
//! Algorithms form a closed set. Adding one means adding a [`SizingModel`]
//! variant, its document name in [`SizingModel::ALGORITHMS`], and a branch in
//! the position sizer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sizing algorithm together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum SizingModel {
    /// Deploy a fixed fraction of the strategy's allocated capital.
    FixedEquityPct {
        /// Fraction of allocated capital in `[0, 1]`.
        fixed_equity_pct: Decimal,
    },
}

impl SizingModel {
    /// Document names of every recognized algorithm.
    pub const ALGORITHMS: [&'static str; 1] = ["fixed_equity_pct"];

    /// Shorthand for [`SizingModel::FixedEquityPct`].
    #[must_use]
    pub const fn fixed_equity_pct(fixed_equity_pct: Decimal) -> Self {
        Self::FixedEquityPct { fixed_equity_pct }
    }

    /// Document name of the algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> &'static str {
        match self {
            Self::FixedEquityPct { .. } => "fixed_equity_pct",
        }
    }
}

impl fmt::Display for SizingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedEquityPct { fixed_equity_pct } => {
                write!(f, "fixed_equity_pct({fixed_equity_pct})")
            }
        }
    }
}

/// The `sizing` block of a risk policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Algorithm and its parameters.
    #[serde(flatten)]
    pub model: SizingModel,
    /// Scale open sizes by signal confidence.
    pub adjust_for_confidence: bool,
}

impl SizingConfig {
    /// Default for `adjust_for_confidence` when the document omits it.
    pub const DEFAULT_ADJUST_FOR_CONFIDENCE: bool = true;

    /// Create a sizing block with the default confidence adjustment.
    #[must_use]
    pub const fn new(model: SizingModel) -> Self {
        Self {
            model,
            adjust_for_confidence: Self::DEFAULT_ADJUST_FOR_CONFIDENCE,
        }
    }

    /// Override the confidence adjustment.
    #[must_use]
    pub const fn with_confidence_adjustment(mut self, adjust: bool) -> Self {
        self.adjust_for_confidence = adjust;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn algorithm_names_match_variants() {
        let model = SizingModel::fixed_equity_pct(dec!(0.2));
        assert!(SizingModel::ALGORITHMS.contains(&model.algorithm()));
    }

    #[test]
    fn sizing_config_serializes_flat() {
        let config = SizingConfig::new(SizingModel::fixed_equity_pct(dec!(0.2)));
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["algorithm"], "fixed_equity_pct");
        assert_eq!(json["adjust_for_confidence"], true);
        assert!(json.get("fixed_equity_pct").is_some());
    }

    #[test]
    fn confidence_adjustment_override() {
        let config = SizingConfig::new(SizingModel::fixed_equity_pct(dec!(0.1)))
            .with_confidence_adjustment(false);
        assert!(!config.adjust_for_confidence);
    }
}

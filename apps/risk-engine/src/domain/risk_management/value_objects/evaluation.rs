//! Policy scope and evaluation cadence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a risk policy governs. Only whole-portfolio policies exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyScope {
    /// The policy applies to the whole portfolio.
    #[default]
    Portfolio,
}

impl PolicyScope {
    /// Every recognized document value.
    pub const ALL: [&'static str; 1] = ["portfolio"];

    /// Parse a document value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "portfolio" => Some(Self::Portfolio),
            _ => None,
        }
    }

    /// Document spelling of this scope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Portfolio => "portfolio",
        }
    }
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cadence at which the caller opens evaluation cycles.
///
/// The engine does not schedule anything itself; the mode is carried so the
/// replay loop and reports agree on when decisions were recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Once per trading day, after the close.
    EndOfDay,
    /// On every bar close.
    #[default]
    BarClose,
    /// Continuously within a bar.
    Intraday,
}

impl EvaluationMode {
    /// Every recognized document value.
    pub const ALL: [&'static str; 3] = ["end_of_day", "bar_close", "intraday"];

    /// Parse a document value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "end_of_day" => Some(Self::EndOfDay),
            "bar_close" => Some(Self::BarClose),
            "intraday" => Some(Self::Intraday),
            _ => None,
        }
    }

    /// Document spelling of this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfDay => "end_of_day",
            Self::BarClose => "bar_close",
            Self::Intraday => "intraday",
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up strategy ids, symbols and sectors in the
//! position and budget maps.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(StrategyId, "Identifier of the strategy that emitted a signal.");
define_id!(Sector, "Sector classification used for concentration limits.");

impl StrategyId {
    /// Budget key that funds strategies without an explicit budget entry.
    pub const DEFAULT: &'static str = "default";

    /// The fallback `"default"` strategy id.
    #[must_use]
    pub fn default_budget() -> Self {
        Self::new(Self::DEFAULT)
    }

    /// Returns true if this is the fallback `"default"` budget key.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_id_display_and_as_str() {
        let id = StrategyId::new("sma_crossover");
        assert_eq!(id.as_str(), "sma_crossover");
        assert_eq!(format!("{id}"), "sma_crossover");
    }

    #[test]
    fn strategy_id_default_budget() {
        assert!(StrategyId::default_budget().is_default());
        assert!(!StrategyId::new("buy_and_hold").is_default());
    }

    #[test]
    fn sector_from_str() {
        let sector: Sector = "technology".into();
        assert_eq!(sector.into_inner(), "technology");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = StrategyId::new("weekly");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"weekly\"");
    }
}

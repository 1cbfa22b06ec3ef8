//! Risk policy document loading and validation.
//!
//! The engine never opens files: callers hand over document text (or an
//! already-parsed mapping) and receive a validated [`RiskPolicy`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use risk_engine::config::load_policy_from_yaml;
//!
//! let text = std::fs::read_to_string("policy.yaml")?;
//! let policy = load_policy_from_yaml(&text)?;
//! println!("policy: {}", policy.name());
//! ```

mod document;
mod observability;
mod validation;

use thiserror::Error;

use crate::domain::risk_management::aggregate::RiskPolicy;
use crate::domain::risk_management::errors::ValidationError;

pub use observability::{LogFormat, LoggingConfig};
pub use validation::{ROOT_KEY, validate};

/// Policy loading errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The YAML text could not be parsed.
    #[error("Failed to parse policy YAML: {0}")]
    Yaml(#[from] serde_yaml_bw::Error),

    /// The JSON text could not be parsed.
    #[error("Failed to parse policy JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a valid policy.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl PolicyError {
    /// The validation failure, if this is one.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Yaml(_) | Self::Json(_) => None,
        }
    }
}

/// Load a policy from YAML text.
///
/// `${VAR}` and `${VAR:-default}` references are replaced from the
/// environment before parsing.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or the policy is invalid.
pub fn load_policy_from_yaml(yaml: &str) -> Result<RiskPolicy, PolicyError> {
    let interpolated = interpolate_env_vars(yaml);
    let document: serde_json::Value = serde_yaml_bw::from_str(&interpolated)?;
    accept(&document)
}

/// Load a policy from JSON text.
///
/// Environment references are interpolated as for YAML.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the policy is invalid.
pub fn load_policy_from_json(json: &str) -> Result<RiskPolicy, PolicyError> {
    let interpolated = interpolate_env_vars(json);
    let document: serde_json::Value = serde_json::from_str(&interpolated)?;
    accept(&document)
}

fn accept(document: &serde_json::Value) -> Result<RiskPolicy, PolicyError> {
    match validate(document) {
        Ok(policy) => {
            tracing::info!(
                policy = %policy.name(),
                evaluation_mode = %policy.evaluation_mode(),
                budgets = policy.budgets().len(),
                algorithm = policy.sizing().model.algorithm(),
                "Risk policy loaded"
            );
            Ok(policy)
        }
        Err(err) => {
            tracing::warn!(issues = err.issues.len(), error = %err, "Risk policy rejected");
            Err(err.into())
        }
    }
}

/// Replace `${VAR}` and `${VAR:-default}` with environment values.
///
/// Unset or empty variables become the default, or the empty string.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |caps: &regex::Captures<'_>| {
        let default = caps.get(2).map_or("", |m| m.as_str());
        match std::env::var(&caps[1]) {
            Ok(value) if !value.is_empty() => value,
            _ => default.to_string(),
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk_management::errors::IssueKind;
    use rust_decimal_macros::dec;

    const YAML: &str = r"
portfolio_risk_policy:
  name: balanced
  sizing:
    algorithm: fixed_equity_pct
    fixed_equity_pct: 0.2
  budgets:
    - strategy_id: default
      capital_weight: 0.9
";

    #[test]
    fn load_yaml() {
        let policy = load_policy_from_yaml(YAML).unwrap();
        assert_eq!(policy.name(), "balanced");
        assert_eq!(policy.total_capital_weight(), dec!(0.9));
    }

    #[test]
    fn load_json() {
        let json = r#"{
            "portfolio_risk_policy": {
                "name": "balanced",
                "sizing": { "algorithm": "fixed_equity_pct", "fixed_equity_pct": "0.2" }
            }
        }"#;
        let policy = load_policy_from_json(json).unwrap();
        assert_eq!(policy.budgets().len(), 1);
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = load_policy_from_yaml("portfolio_risk_policy: [unclosed").unwrap_err();
        assert!(matches!(err, PolicyError::Yaml(_)));
        assert!(err.validation().is_none());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = load_policy_from_json("{ not json").unwrap_err();
        assert!(matches!(err, PolicyError::Json(_)));
    }

    #[test]
    fn invalid_policy_is_a_validation_error() {
        let err = load_policy_from_yaml("portfolio_risk_policy:\n  name: x\n").unwrap_err();
        let validation = err.validation().unwrap();
        assert!(validation.has_kind(IssueKind::Missing));
    }

    #[test]
    fn interpolate_default_when_unset() {
        let out = interpolate_env_vars("weight: ${RISK_ENGINE_TEST_UNSET_VAR:-0.5}");
        assert_eq!(out, "weight: 0.5");
    }

    #[test]
    fn interpolate_unset_without_default_is_empty() {
        let out = interpolate_env_vars("name: '${RISK_ENGINE_TEST_UNSET_OTHER}'");
        assert_eq!(out, "name: ''");
    }

    #[test]
    fn interpolate_leaves_plain_text() {
        let out = interpolate_env_vars("name: $NOT_A_REF {braces}");
        assert_eq!(out, "name: $NOT_A_REF {braces}");
    }

    #[test]
    fn interpolate_uses_environment() {
        let path = std::env::var("PATH").unwrap();
        assert_eq!(interpolate_env_vars("${PATH}"), path);
    }
}

//! Policy document validation.
//!
//! Document shape (YAML shown; JSON is equivalent):
//!
//! ```yaml
//! portfolio_risk_policy:
//!   name: balanced
//!   scope: portfolio              # default
//!   evaluation_mode: bar_close    # end_of_day | bar_close | intraday
//!   clock_alignment: bar_close    # default
//!   sizing:
//!     algorithm: fixed_equity_pct
//!     fixed_equity_pct: 0.2
//!     adjust_for_confidence: true # default
//!   budgets:                      # default [{default, 0.95}]
//!     - strategy_id: default
//!       capital_weight: 0.9
//!   limits:                       # every key optional
//!     max_gross_leverage: 1.0
//!     max_drawdown_pct: 0.2
//!     drawdown_action: stop_new_positions
//! ```

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::document::{DocumentReader, present, unrecognized};
use crate::domain::risk_management::aggregate::{DEFAULT_CLOCK_ALIGNMENT, PolicySpec, RiskPolicy};
use crate::domain::risk_management::errors::{FieldIssue, ValidationError};
use crate::domain::risk_management::value_objects::{
    Budget, DrawdownAction, EvaluationMode, PolicyScope, RiskLimits, SizingConfig, SizingModel,
};

/// Top-level key holding the policy.
pub const ROOT_KEY: &str = "portfolio_risk_policy";

const POLICY_KEYS: &[&str] = &[
    "name",
    "scope",
    "evaluation_mode",
    "clock_alignment",
    "sizing",
    "budgets",
    "limits",
];
const SIZING_KEYS: &[&str] = &["algorithm", "fixed_equity_pct", "adjust_for_confidence"];
const BUDGET_KEYS: &[&str] = &["strategy_id", "capital_weight"];
const LIMIT_KEYS: &[&str] = &[
    "max_position_pct",
    "max_gross_leverage",
    "max_net_leverage",
    "max_sector_exposure",
    "max_correlated_exposure",
    "correlation_threshold",
    "max_drawdown_pct",
    "drawdown_action",
    "drawdown_reduction_factor",
];

/// Validate a raw policy document.
///
/// Checks required fields, types, recognized values, unknown keys, bounds
/// and budget allocation, and fills documented defaults for omitted fields.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every problem found.
pub fn validate(document: &Value) -> Result<RiskPolicy, ValidationError> {
    let mut reader = DocumentReader::new();

    let Some(root) = reader.object(document, "") else {
        return Err(ValidationError::new(reader.into_issues()));
    };
    reader.reject_unknown_keys(root, "", &[ROOT_KEY]);
    let Some(body) = present(root, ROOT_KEY) else {
        reader.push(FieldIssue::missing(ROOT_KEY));
        return Err(ValidationError::new(reader.into_issues()));
    };
    let Some(body) = reader.object(body, ROOT_KEY) else {
        return Err(ValidationError::new(reader.into_issues()));
    };

    let spec = read_policy(&mut reader, body);
    let mut issues = reader.into_issues();

    let invariant_issues: Vec<FieldIssue> = spec
        .invariant_issues()
        .into_iter()
        .filter(|issue| !issues.iter().any(|seen| covers(&seen.field, &issue.field)))
        .collect();
    issues.extend(invariant_issues);

    if issues.is_empty() {
        Ok(RiskPolicy::from_checked(spec))
    } else {
        Err(ValidationError::new(issues))
    }
}

/// Returns true if a reader issue on `reported` already accounts for `field`
/// (the same field or one nested under it).
fn covers(reported: &str, field: &str) -> bool {
    field
        .strip_prefix(reported)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Read the policy body. Fields that fail to read fall back to placeholders
/// so the remaining fields are still checked.
fn read_policy(reader: &mut DocumentReader, body: &Map<String, Value>) -> PolicySpec {
    reader.reject_unknown_keys(body, "", POLICY_KEYS);

    let name = reader.required_string(body, "", "name").unwrap_or_default();
    let sizing = read_sizing(reader, body);

    let mut spec = PolicySpec::new(name, sizing);
    spec.scope = reader.enum_or(
        body,
        "",
        "scope",
        &PolicyScope::ALL,
        PolicyScope::parse,
        PolicyScope::default(),
    );
    spec.evaluation_mode = reader.enum_or(
        body,
        "",
        "evaluation_mode",
        &EvaluationMode::ALL,
        EvaluationMode::parse,
        EvaluationMode::default(),
    );
    spec.clock_alignment = reader.string_or(body, "", "clock_alignment", DEFAULT_CLOCK_ALIGNMENT);
    spec.budgets = read_budgets(reader, body);
    spec.limits = read_limits(reader, body);
    spec
}

fn read_sizing(reader: &mut DocumentReader, body: &Map<String, Value>) -> SizingConfig {
    let placeholder = SizingConfig::new(SizingModel::fixed_equity_pct(Decimal::ZERO));
    let Some(value) = present(body, "sizing") else {
        reader.push(FieldIssue::missing("sizing.algorithm"));
        reader.push(FieldIssue::missing("sizing.fixed_equity_pct"));
        return placeholder;
    };
    let Some(sizing) = reader.object(value, "sizing") else {
        return placeholder;
    };
    reader.reject_unknown_keys(sizing, "sizing", SIZING_KEYS);

    let adjust = reader.bool_or(
        sizing,
        "sizing",
        "adjust_for_confidence",
        SizingConfig::DEFAULT_ADJUST_FOR_CONFIDENCE,
    );

    let Some(algorithm) = reader.required_string(sizing, "sizing", "algorithm") else {
        return placeholder.with_confidence_adjustment(adjust);
    };
    let model = match algorithm.as_str() {
        "fixed_equity_pct" => SizingModel::fixed_equity_pct(
            reader
                .required_decimal(sizing, "sizing", "fixed_equity_pct")
                .unwrap_or_default(),
        ),
        other => {
            reader.push(unrecognized(
                "sizing.algorithm",
                other,
                &SizingModel::ALGORITHMS,
            ));
            return placeholder.with_confidence_adjustment(adjust);
        }
    };
    SizingConfig::new(model).with_confidence_adjustment(adjust)
}

fn read_budgets(reader: &mut DocumentReader, body: &Map<String, Value>) -> Vec<Budget> {
    let Some(value) = present(body, "budgets") else {
        return Vec::new();
    };
    let Value::Array(entries) = value else {
        reader.push(FieldIssue::invalid_type("budgets", "a list"));
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let prefix = format!("budgets[{index}]");
            let Some(entry) = reader.object(entry, &prefix) else {
                return Budget::new(String::new(), Decimal::ZERO);
            };
            reader.reject_unknown_keys(entry, &prefix, BUDGET_KEYS);
            let strategy_id = reader.required_string(entry, &prefix, "strategy_id");
            let capital_weight = reader.required_decimal(entry, &prefix, "capital_weight");
            Budget::new(
                strategy_id.unwrap_or_default(),
                capital_weight.unwrap_or_default(),
            )
        })
        .collect()
}

fn read_limits(reader: &mut DocumentReader, body: &Map<String, Value>) -> RiskLimits {
    let defaults = RiskLimits::default();
    let Some(value) = present(body, "limits") else {
        return defaults;
    };
    let Some(limits) = reader.object(value, "limits") else {
        return defaults;
    };
    reader.reject_unknown_keys(limits, "limits", LIMIT_KEYS);

    let mut decimal = |key: &str, default| reader.decimal_or(limits, "limits", key, default);
    let max_position_pct = decimal("max_position_pct", defaults.max_position_pct);
    let max_gross_leverage = decimal("max_gross_leverage", defaults.max_gross_leverage);
    let max_net_leverage = decimal("max_net_leverage", defaults.max_net_leverage);
    let max_sector_exposure = decimal("max_sector_exposure", defaults.max_sector_exposure);
    let max_correlated_exposure =
        decimal("max_correlated_exposure", defaults.max_correlated_exposure);
    let correlation_threshold = decimal("correlation_threshold", defaults.correlation_threshold);
    let max_drawdown_pct = decimal("max_drawdown_pct", defaults.max_drawdown_pct);
    let drawdown_reduction_factor =
        decimal("drawdown_reduction_factor", defaults.drawdown_reduction_factor);

    let drawdown_action = reader.enum_or(
        limits,
        "limits",
        "drawdown_action",
        &DrawdownAction::ALL,
        DrawdownAction::parse,
        defaults.drawdown_action,
    );

    RiskLimits {
        max_position_pct,
        max_gross_leverage,
        max_net_leverage,
        max_sector_exposure,
        max_correlated_exposure,
        correlation_threshold,
        max_drawdown_pct,
        drawdown_action,
        drawdown_reduction_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk_management::errors::IssueKind;
    use crate::domain::shared::StrategyId;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "portfolio_risk_policy": {
                "name": "balanced",
                "sizing": { "algorithm": "fixed_equity_pct", "fixed_equity_pct": 0.2 }
            }
        })
    }

    fn fields(err: &ValidationError) -> Vec<&str> {
        err.issues.iter().map(|i| i.field.as_str()).collect()
    }

    #[test]
    fn minimal_document_fills_defaults() {
        let policy = validate(&minimal()).unwrap();
        assert_eq!(policy.name(), "balanced");
        assert_eq!(policy.scope(), PolicyScope::Portfolio);
        assert_eq!(policy.evaluation_mode(), EvaluationMode::BarClose);
        assert_eq!(policy.clock_alignment(), "bar_close");
        assert!(policy.sizing().adjust_for_confidence);
        assert_eq!(policy.budgets(), &[Budget::synthetic_default()]);
        assert_eq!(policy.limits(), &RiskLimits::default());
    }

    #[test]
    fn full_document_reads_every_field() {
        let doc = json!({
            "portfolio_risk_policy": {
                "name": "aggressive",
                "scope": "portfolio",
                "evaluation_mode": "end_of_day",
                "clock_alignment": "session_close",
                "sizing": {
                    "algorithm": "fixed_equity_pct",
                    "fixed_equity_pct": "0.15",
                    "adjust_for_confidence": false
                },
                "budgets": [
                    { "strategy_id": "trend", "capital_weight": 0.6 },
                    { "strategy_id": "default", "capital_weight": "0.4" }
                ],
                "limits": {
                    "max_position_pct": 0.5,
                    "max_gross_leverage": 2,
                    "max_net_leverage": 1.5,
                    "max_sector_exposure": 0.4,
                    "max_correlated_exposure": 0.6,
                    "correlation_threshold": 0.8,
                    "max_drawdown_pct": 0.1,
                    "drawdown_action": "reduce_positions",
                    "drawdown_reduction_factor": 0.25
                }
            }
        });

        let policy = validate(&doc).unwrap();
        assert_eq!(policy.evaluation_mode(), EvaluationMode::EndOfDay);
        assert_eq!(policy.clock_alignment(), "session_close");
        assert_eq!(
            policy.sizing().model,
            SizingModel::fixed_equity_pct(dec!(0.15))
        );
        assert!(!policy.sizing().adjust_for_confidence);
        assert_eq!(policy.total_capital_weight(), Decimal::ONE);
        assert_eq!(
            policy.budget_for(&StrategyId::new("trend")).unwrap().capital_weight,
            dec!(0.6)
        );
        let limits = policy.limits();
        assert_eq!(limits.max_gross_leverage, dec!(2));
        assert_eq!(limits.drawdown_action, DrawdownAction::ReducePositions);
        assert_eq!(limits.drawdown_reduction_factor, dec!(0.25));
    }

    #[test]
    fn missing_root_key() {
        let err = validate(&json!({ "policy": {} })).unwrap_err();
        assert_eq!(fields(&err), vec!["policy", ROOT_KEY]);
        assert!(err.has_kind(IssueKind::Missing));
    }

    #[test]
    fn root_must_be_a_mapping() {
        let err = validate(&json!([1, 2])).unwrap_err();
        assert!(err.has_kind(IssueKind::InvalidType));
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let err = validate(&json!({ "portfolio_risk_policy": {} })).unwrap_err();
        assert_eq!(
            fields(&err),
            vec!["name", "sizing.algorithm", "sizing.fixed_equity_pct"]
        );
    }

    #[test]
    fn unrecognized_algorithm_fails_closed() {
        let mut doc = minimal();
        doc[ROOT_KEY]["sizing"]["algorithm"] = json!("kelly");
        let err = validate(&doc).unwrap_err();
        let issue = err.issue_for("sizing.algorithm").unwrap();
        assert_eq!(issue.kind, IssueKind::Unrecognized);
        assert!(issue.message.contains("fixed_equity_pct"));
    }

    #[test]
    fn misspelled_keys_fail_loudly() {
        let mut doc = minimal();
        doc[ROOT_KEY]["limits"] = json!({ "max_gross_leverge": 2 });
        doc[ROOT_KEY]["budget"] = json!([]);
        let err = validate(&doc).unwrap_err();
        assert_eq!(fields(&err), vec!["budget", "limits.max_gross_leverge"]);
        assert!(err.issues.iter().all(|i| i.kind == IssueKind::UnknownField));
    }

    #[test]
    fn over_allocation_names_the_excess() {
        let mut doc = minimal();
        doc[ROOT_KEY]["budgets"] = json!([
            { "strategy_id": "a", "capital_weight": 0.7 },
            { "strategy_id": "b", "capital_weight": 0.4 }
        ]);
        let err = validate(&doc).unwrap_err();
        let issue = err.issue_for("budgets").unwrap();
        assert_eq!(issue.kind, IssueKind::OverAllocated);
        assert!(issue.message.contains("1.1"));
    }

    #[test]
    fn overflowing_weights_are_reported_not_panicked() {
        let mut doc = minimal();
        doc[ROOT_KEY]["budgets"] = json!([
            { "strategy_id": "a", "capital_weight": "5e28" },
            { "strategy_id": "b", "capital_weight": "5e28" }
        ]);
        let err = validate(&doc).unwrap_err();

        assert_eq!(
            err.issue_for("budgets").unwrap().kind,
            IssueKind::OverAllocated
        );
        assert_eq!(
            err.issue_for("budgets[0].capital_weight").unwrap().kind,
            IssueKind::OutOfRange
        );
        assert_eq!(
            err.issue_for("budgets[1].capital_weight").unwrap().kind,
            IssueKind::OutOfRange
        );
    }

    #[test]
    fn decimal_sum_is_exact() {
        let mut doc = minimal();
        doc[ROOT_KEY]["budgets"] = json!([
            { "strategy_id": "a", "capital_weight": 0.1 },
            { "strategy_id": "b", "capital_weight": 0.2 },
            { "strategy_id": "c", "capital_weight": 0.7 }
        ]);
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn type_and_range_issues_are_combined() {
        let mut doc = minimal();
        doc[ROOT_KEY]["sizing"]["fixed_equity_pct"] = json!(1.5);
        doc[ROOT_KEY]["budgets"] = json!([
            { "strategy_id": "a", "capital_weight": "lots" },
            { "strategy_id": "a", "capital_weight": 0.2 }
        ]);
        doc[ROOT_KEY]["limits"] = json!({
            "max_drawdown_pct": 0,
            "drawdown_action": "panic"
        });

        let err = validate(&doc).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![
                "budgets[0].capital_weight",
                "limits.drawdown_action",
                "sizing.fixed_equity_pct",
                "budgets[1].strategy_id",
                "limits.max_drawdown_pct",
            ]
        );
    }

    #[test]
    fn malformed_budget_entry_keeps_indices() {
        let mut doc = minimal();
        doc[ROOT_KEY]["budgets"] = json!([
            "trend",
            { "strategy_id": "a", "capital_weight": 0.2 },
            { "strategy_id": "a", "capital_weight": 0.3 }
        ]);
        let err = validate(&doc).unwrap_err();
        assert_eq!(fields(&err), vec!["budgets[0]", "budgets[2].strategy_id"]);
    }

    #[test]
    fn empty_budget_list_uses_default() {
        let mut doc = minimal();
        doc[ROOT_KEY]["budgets"] = json!([]);
        let policy = validate(&doc).unwrap();
        assert!(policy.budgets()[0].is_default());
    }
}

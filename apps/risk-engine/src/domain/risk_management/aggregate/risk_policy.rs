//! Risk Policy Aggregate

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::risk_management::errors::{FieldIssue, IssueKind, ValidationError};
use crate::domain::risk_management::value_objects::{
    Budget, EvaluationMode, PolicyScope, RiskLimits, SizingConfig, SizingModel, total_weight,
};
use crate::domain::shared::StrategyId;

/// Default `clock_alignment`.
pub const DEFAULT_CLOCK_ALIGNMENT: &str = "bar_close";

/// Unvalidated policy fields.
///
/// Build one with [`PolicySpec::new`] (every optional field at its default),
/// adjust it, then turn it into a [`RiskPolicy`] with [`RiskPolicy::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySpec {
    /// Human-readable policy name.
    pub name: String,
    /// What the policy governs.
    pub scope: PolicyScope,
    /// Cadence of evaluation cycles.
    pub evaluation_mode: EvaluationMode,
    /// Point in the bar the cycle is aligned to.
    pub clock_alignment: String,
    /// Sizing algorithm.
    pub sizing: SizingConfig,
    /// Per-strategy capital weights. Empty means the synthetic default.
    pub budgets: Vec<Budget>,
    /// Portfolio limits.
    pub limits: RiskLimits,
}

impl PolicySpec {
    /// Create a spec with every optional field at its default.
    #[must_use]
    pub fn new(name: impl Into<String>, sizing: SizingConfig) -> Self {
        Self {
            name: name.into(),
            scope: PolicyScope::default(),
            evaluation_mode: EvaluationMode::default(),
            clock_alignment: DEFAULT_CLOCK_ALIGNMENT.to_string(),
            sizing,
            budgets: Vec::new(),
            limits: RiskLimits::default(),
        }
    }

    /// Add a budget entry.
    #[must_use]
    pub fn with_budget(mut self, strategy_id: impl Into<StrategyId>, capital_weight: Decimal) -> Self {
        self.budgets.push(Budget::new(strategy_id, capital_weight));
        self
    }

    /// Replace the limits block.
    #[must_use]
    pub fn with_limits(mut self, limits: RiskLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Check value-level invariants: bounds, uniqueness and allocation.
    ///
    /// Field presence and types are the document reader's job; this only
    /// sees already-typed values.
    #[must_use]
    pub fn invariant_issues(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(FieldIssue::new("name", IssueKind::Missing, "must not be empty"));
        }
        if self.clock_alignment.trim().is_empty() {
            issues.push(FieldIssue::new(
                "clock_alignment",
                IssueKind::Missing,
                "must not be empty",
            ));
        }

        match self.sizing.model {
            SizingModel::FixedEquityPct { fixed_equity_pct } => {
                check_unit(&mut issues, "sizing.fixed_equity_pct", fixed_equity_pct);
            }
        }

        let mut seen = BTreeSet::new();
        for (index, budget) in self.budgets.iter().enumerate() {
            if budget.strategy_id.as_str().trim().is_empty() {
                issues.push(FieldIssue::new(
                    format!("budgets[{index}].strategy_id"),
                    IssueKind::Missing,
                    "must not be empty",
                ));
            } else if !seen.insert(&budget.strategy_id) {
                issues.push(FieldIssue::new(
                    format!("budgets[{index}].strategy_id"),
                    IssueKind::Duplicate,
                    format!("strategy '{}' already has a budget", budget.strategy_id),
                ));
            }
            check_unit(
                &mut issues,
                &format!("budgets[{index}].capital_weight"),
                budget.capital_weight,
            );
        }

        match total_weight(&self.budgets) {
            Some(total) if total > Decimal::ONE => issues.push(FieldIssue::new(
                "budgets",
                IssueKind::OverAllocated,
                format!(
                    "capital weights sum to {total}, over-allocated by {} above 1",
                    total - Decimal::ONE
                ),
            )),
            Some(_) => {}
            None => issues.push(FieldIssue::new(
                "budgets",
                IssueKind::OverAllocated,
                "capital weights overflow when summed, far above 1",
            )),
        }

        let limits = &self.limits;
        check_unit(&mut issues, "limits.max_position_pct", limits.max_position_pct);
        check_non_negative(&mut issues, "limits.max_gross_leverage", limits.max_gross_leverage);
        check_non_negative(&mut issues, "limits.max_net_leverage", limits.max_net_leverage);
        check_non_negative(&mut issues, "limits.max_sector_exposure", limits.max_sector_exposure);
        check_non_negative(
            &mut issues,
            "limits.max_correlated_exposure",
            limits.max_correlated_exposure,
        );
        check_unit(&mut issues, "limits.correlation_threshold", limits.correlation_threshold);
        if limits.max_drawdown_pct <= Decimal::ZERO || limits.max_drawdown_pct > Decimal::ONE {
            issues.push(FieldIssue::out_of_range(
                "limits.max_drawdown_pct",
                format!("{} must be in (0, 1]", limits.max_drawdown_pct),
            ));
        }
        check_unit(
            &mut issues,
            "limits.drawdown_reduction_factor",
            limits.drawdown_reduction_factor,
        );

        issues
    }
}

fn check_unit(issues: &mut Vec<FieldIssue>, field: &str, value: Decimal) {
    if value < Decimal::ZERO || value > Decimal::ONE {
        issues.push(FieldIssue::out_of_range(
            field,
            format!("{value} must be in [0, 1]"),
        ));
    }
}

fn check_non_negative(issues: &mut Vec<FieldIssue>, field: &str, value: Decimal) {
    if value < Decimal::ZERO {
        issues.push(FieldIssue::out_of_range(field, format!("{value} must be >= 0")));
    }
}

/// Risk Policy Aggregate - validated, immutable for the run.
///
/// Only constructible through validation, so every instance satisfies the
/// policy invariants (bounds hold, budget weights sum to at most 1, at least
/// one budget exists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskPolicy {
    name: String,
    scope: PolicyScope,
    evaluation_mode: EvaluationMode,
    clock_alignment: String,
    sizing: SizingConfig,
    budgets: Vec<Budget>,
    limits: RiskLimits,
}

impl RiskPolicy {
    /// Validate a spec into a policy.
    ///
    /// An empty budget list becomes the synthetic `{default: 0.95}`.
    ///
    /// # Errors
    ///
    /// Returns every invariant the spec violates.
    pub fn try_new(spec: PolicySpec) -> Result<Self, ValidationError> {
        let issues = spec.invariant_issues();
        if issues.is_empty() {
            Ok(Self::from_checked(spec))
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Build from a spec whose invariants were already checked.
    pub(crate) fn from_checked(spec: PolicySpec) -> Self {
        let budgets = if spec.budgets.is_empty() {
            vec![Budget::synthetic_default()]
        } else {
            spec.budgets
        };
        Self {
            name: spec.name,
            scope: spec.scope,
            evaluation_mode: spec.evaluation_mode,
            clock_alignment: spec.clock_alignment,
            sizing: spec.sizing,
            budgets,
            limits: spec.limits,
        }
    }

    /// Get the policy name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the policy scope.
    #[must_use]
    pub const fn scope(&self) -> PolicyScope {
        self.scope
    }

    /// Get the evaluation cadence.
    #[must_use]
    pub const fn evaluation_mode(&self) -> EvaluationMode {
        self.evaluation_mode
    }

    /// Get the clock alignment.
    #[must_use]
    pub fn clock_alignment(&self) -> &str {
        &self.clock_alignment
    }

    /// Get the sizing configuration.
    #[must_use]
    pub const fn sizing(&self) -> &SizingConfig {
        &self.sizing
    }

    /// Get the budgets.
    #[must_use]
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Get the limits.
    #[must_use]
    pub const fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Budget for a strategy, falling back to the `"default"` entry.
    #[must_use]
    pub fn budget_for(&self, strategy_id: &StrategyId) -> Option<&Budget> {
        self.budgets
            .iter()
            .find(|b| &b.strategy_id == strategy_id)
            .or_else(|| self.budgets.iter().find(|b| b.is_default()))
    }

    /// Sum of all capital weights.
    #[must_use]
    pub fn total_capital_weight(&self) -> Decimal {
        // Validated weights lie in [0, 1] and sum to at most 1.
        total_weight(&self.budgets).unwrap_or(Decimal::ONE)
    }
}

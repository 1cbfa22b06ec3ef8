//! Risk policy validation errors.
//!
//! Validation is the only fatal error class in the engine: it happens once,
//! at load time. Per-signal outcomes are reported as data in
//! [`SizingDecision`](super::value_objects::SizingDecision).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a policy document problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A required field is absent.
    Missing,
    /// A field has the wrong type (e.g. text where a number belongs).
    InvalidType,
    /// A numeric field is outside its allowed range.
    OutOfRange,
    /// Budget capital weights sum above 1.
    OverAllocated,
    /// An enumerated value is not one of the recognized spellings.
    Unrecognized,
    /// A key the schema does not define.
    UnknownField,
    /// A value that must be unique appears more than once.
    Duplicate,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::InvalidType => write!(f, "invalid type"),
            Self::OutOfRange => write!(f, "out of range"),
            Self::OverAllocated => write!(f, "over-allocated"),
            Self::Unrecognized => write!(f, "unrecognized value"),
            Self::UnknownField => write!(f, "unknown field"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// One problem found in a policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Dotted path to the offending field, e.g. `budgets[2].capital_weight`.
    pub field: String,
    /// Problem category.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
}

impl FieldIssue {
    /// Create an issue.
    #[must_use]
    pub fn new(field: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// A required field is absent.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, IssueKind::Missing, "required field is missing")
    }

    /// A field has the wrong type.
    #[must_use]
    pub fn invalid_type(field: impl Into<String>, expected: &str) -> Self {
        Self::new(field, IssueKind::InvalidType, format!("expected {expected}"))
    }

    /// A number is outside its range.
    #[must_use]
    pub fn out_of_range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, IssueKind::OutOfRange, message)
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.kind, self.message)
    }
}

/// A policy document failed validation.
///
/// Carries every problem found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_issues(.issues))]
pub struct ValidationError {
    /// All problems, in document order.
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Wrap a list of issues.
    #[must_use]
    pub const fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// Returns the issue reported for `field`, if any.
    #[must_use]
    pub fn issue_for(&self, field: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|issue| issue.field == field)
    }

    /// Returns true if any issue has `kind`.
    #[must_use]
    pub fn has_kind(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }
}

fn render_issues(issues: &[FieldIssue]) -> String {
    let rendered: Vec<String> = issues.iter().map(ToString::to_string).collect();
    format!(
        "invalid risk policy ({} issue{}): {}",
        issues.len(),
        if issues.len() == 1 { "" } else { "s" },
        rendered.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_issue() {
        let err = ValidationError::new(vec![
            FieldIssue::missing("name"),
            FieldIssue::out_of_range("limits.max_drawdown_pct", "must be in (0, 1]"),
        ]);
        let text = err.to_string();
        assert!(text.starts_with("invalid risk policy (2 issues)"));
        assert!(text.contains("name (missing)"));
        assert!(text.contains("limits.max_drawdown_pct (out of range): must be in (0, 1]"));
    }

    #[test]
    fn lookup_helpers() {
        let err = ValidationError::new(vec![FieldIssue::invalid_type(
            "sizing.fixed_equity_pct",
            "a number",
        )]);
        assert!(err.has_kind(IssueKind::InvalidType));
        assert!(!err.has_kind(IssueKind::Missing));
        assert_eq!(
            err.issue_for("sizing.fixed_equity_pct").map(|i| i.message.as_str()),
            Some("expected a number")
        );
    }
}

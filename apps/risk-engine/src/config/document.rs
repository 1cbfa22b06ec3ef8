//! Field-by-field reader over a raw policy document.
//!
//! Reads a `serde_json::Value` tree and records a [`FieldIssue`] for every
//! problem instead of stopping at the first, so one validation pass reports
//! the whole document.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::domain::risk_management::errors::{FieldIssue, IssueKind};

/// Collects issues while reading typed values out of a document.
#[derive(Debug, Default)]
pub(crate) struct DocumentReader {
    issues: Vec<FieldIssue>,
}

impl DocumentReader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    pub(crate) fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }

    /// Interpret `value` as a mapping.
    pub(crate) fn object<'v>(
        &mut self,
        value: &'v Value,
        field: &str,
    ) -> Option<&'v Map<String, Value>> {
        if let Value::Object(map) = value {
            Some(map)
        } else {
            self.push(FieldIssue::invalid_type(field, "a mapping"));
            None
        }
    }

    /// Flag every key of `map` not listed in `allowed`.
    pub(crate) fn reject_unknown_keys(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        allowed: &[&str],
    ) {
        for key in map.keys().filter(|key| !allowed.contains(&key.as_str())) {
            self.push(FieldIssue::new(
                join(prefix, key),
                IssueKind::UnknownField,
                format!("unknown field, expected one of: {}", allowed.join(", ")),
            ));
        }
    }

    /// A required string.
    pub(crate) fn required_string(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> Option<String> {
        let field = join(prefix, key);
        match present(map, key) {
            None => {
                self.push(FieldIssue::missing(field));
                None
            }
            Some(value) => self.string(value, &field),
        }
    }

    /// An optional string with a default.
    pub(crate) fn string_or(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        key: &str,
        default: &str,
    ) -> String {
        present(map, key)
            .and_then(|value| self.string(value, &join(prefix, key)))
            .unwrap_or_else(|| default.to_string())
    }

    /// A required decimal.
    pub(crate) fn required_decimal(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> Option<Decimal> {
        let field = join(prefix, key);
        match present(map, key) {
            None => {
                self.push(FieldIssue::missing(field));
                None
            }
            Some(value) => self.decimal(value, &field),
        }
    }

    /// An optional decimal with a default.
    pub(crate) fn decimal_or(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        key: &str,
        default: Decimal,
    ) -> Decimal {
        present(map, key)
            .and_then(|value| self.decimal(value, &join(prefix, key)))
            .unwrap_or(default)
    }

    /// An optional boolean with a default.
    pub(crate) fn bool_or(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        key: &str,
        default: bool,
    ) -> bool {
        match present(map, key) {
            None => default,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                self.push(FieldIssue::invalid_type(join(prefix, key), "a boolean"));
                default
            }
        }
    }

    /// An optional enumerated value parsed by `parse`, with a default.
    pub(crate) fn enum_or<T: Copy>(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        key: &str,
        recognized: &[&str],
        parse: impl Fn(&str) -> Option<T>,
        default: T,
    ) -> T {
        let field = join(prefix, key);
        let Some(text) = present(map, key).and_then(|value| self.string(value, &field)) else {
            return default;
        };
        parse(&text).unwrap_or_else(|| {
            self.push(unrecognized(&field, &text, recognized));
            default
        })
    }

    fn string(&mut self, value: &Value, field: &str) -> Option<String> {
        if let Value::String(text) = value {
            Some(text.clone())
        } else {
            self.push(FieldIssue::invalid_type(field, "a string"));
            None
        }
    }

    /// A number written as a JSON/YAML number or a decimal string.
    pub(crate) fn decimal(&mut self, value: &Value, field: &str) -> Option<Decimal> {
        let parsed = match value {
            Value::Number(number) => parse_decimal(&number.to_string()),
            Value::String(text) => parse_decimal(text.trim()),
            _ => None,
        };
        if parsed.is_none() {
            self.push(FieldIssue::invalid_type(field, "a decimal number"));
        }
        parsed
    }
}

/// `prefix.key`, or `key` at the document root.
pub(crate) fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// An issue for a value outside a closed set.
pub(crate) fn unrecognized(field: &str, value: &str, recognized: &[&str]) -> FieldIssue {
    FieldIssue::new(
        field,
        IssueKind::Unrecognized,
        format!("'{value}' is not one of: {}", recognized.join(", ")),
    )
}

/// Look up `key`, treating an explicit null like an absent key.
pub(crate) fn present<'v>(map: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

//! Results of processing one source row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::cell::RowInput;
use crate::ids::ValidatorRule;

/// Machine-readable code of a field-level validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    MinLength,
    MaxLength,
    EmailFormat,
    PhoneJpLen,
    EnumOneOf,
    DateParseable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Required => "required",
            ErrorCode::MinLength => "min_length",
            ErrorCode::MaxLength => "max_length",
            ErrorCode::EmailFormat => "email_format",
            ErrorCode::PhoneJpLen => "phone_jp_len",
            ErrorCode::EnumOneOf => "enum_one_of",
            ErrorCode::DateParseable => "date_parseable",
        }
    }
}

impl From<ValidatorRule> for ErrorCode {
    fn from(rule: ValidatorRule) -> Self {
        match rule {
            ValidatorRule::MinLength => ErrorCode::MinLength,
            ValidatorRule::MaxLength => ErrorCode::MaxLength,
            ValidatorRule::EmailFormat => ErrorCode::EmailFormat,
            ValidatorRule::PhoneJpLen => ErrorCode::PhoneJpLen,
            ValidatorRule::EnumOneOf => ErrorCode::EnumOneOf,
            ValidatorRule::DateParseable => ErrorCode::DateParseable,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable, row-scoped validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field_key: String,
    pub field_label: String,
    pub code: ErrorCode,
    pub message: String,
}

/// Mapped, normalized and validated view of one source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowProcessed {
    /// The source row as received.
    pub raw: RowInput,
    /// Field key -> raw string (empty when unmapped or null).
    pub mapped: BTreeMap<String, String>,
    /// Field key -> normalized string, computed fields included.
    pub normalized: BTreeMap<String, String>,
    /// Errors in field order.
    pub errors: Vec<FieldError>,
}

impl RowProcessed {
    /// A row is clean when no field reported an error.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// The normalized value for `key`, or `""` when absent.
    pub fn normalized_value(&self, key: &str) -> &str {
        self.normalized.get(key).map_or("", String::as_str)
    }

    pub fn errors_for<'a>(&'a self, field_key: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors.iter().filter(move |e| e.field_key == field_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_follow_rule_names() {
        for rule in ValidatorRule::ALL {
            assert_eq!(ErrorCode::from(rule).as_str(), rule.as_str());
        }
    }

    #[test]
    fn missing_normalized_value_is_empty() {
        let row = RowProcessed {
            raw: RowInput::new(),
            mapped: BTreeMap::new(),
            normalized: BTreeMap::from([("email".to_string(), "a@b.co".to_string())]),
            errors: Vec::new(),
        };
        assert!(row.is_clean());
        assert_eq!(row.normalized_value("email"), "a@b.co");
        assert_eq!(row.normalized_value("phone"), "");
    }
}

//! Closed identifier sets used by import definitions.
//!
//! Normalizers and validator rules are referenced by name in definition
//! documents. Parsing a name outside these sets is a configuration defect and
//! fails immediately, both when a definition is deserialized and when a name
//! is parsed with [`FromStr`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DefinitionError;

/// A named string transform applied by the normalizer pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerId {
    /// Strip leading and trailing whitespace.
    Trim,
    /// Collapse whitespace runs (including ideographic spaces) into one space, then trim.
    CollapseSpaces,
    /// Lowercase.
    Lower,
    /// Map full-width ASCII forms (U+FF01..=U+FF5E) to half-width.
    ToHalfwidth,
    /// Keep ASCII digits only.
    DigitsOnly,
    /// Map dash and hyphen look-alikes to `-`.
    NormalizeHyphens,
    /// Canonicalize through the field's alias map.
    EnumMap,
}

impl NormalizerId {
    /// Every supported normalizer, in documentation order.
    pub const ALL: [NormalizerId; 7] = [
        NormalizerId::Trim,
        NormalizerId::CollapseSpaces,
        NormalizerId::Lower,
        NormalizerId::ToHalfwidth,
        NormalizerId::DigitsOnly,
        NormalizerId::NormalizeHyphens,
        NormalizerId::EnumMap,
    ];

    /// Returns the identifier as written in definition documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizerId::Trim => "trim",
            NormalizerId::CollapseSpaces => "collapse_spaces",
            NormalizerId::Lower => "lower",
            NormalizerId::ToHalfwidth => "to_halfwidth",
            NormalizerId::DigitsOnly => "digits_only",
            NormalizerId::NormalizeHyphens => "normalize_hyphens",
            NormalizerId::EnumMap => "enum_map",
        }
    }
}

impl fmt::Display for NormalizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizerId {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NormalizerId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| DefinitionError::UnknownNormalizer(s.to_string()))
    }
}

/// A named predicate applied by the validator pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorRule {
    MinLength,
    MaxLength,
    EmailFormat,
    PhoneJpLen,
    EnumOneOf,
    DateParseable,
}

impl ValidatorRule {
    /// Every supported rule, in documentation order.
    pub const ALL: [ValidatorRule; 6] = [
        ValidatorRule::MinLength,
        ValidatorRule::MaxLength,
        ValidatorRule::EmailFormat,
        ValidatorRule::PhoneJpLen,
        ValidatorRule::EnumOneOf,
        ValidatorRule::DateParseable,
    ];

    /// Returns the identifier as written in definition documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorRule::MinLength => "min_length",
            ValidatorRule::MaxLength => "max_length",
            ValidatorRule::EmailFormat => "email_format",
            ValidatorRule::PhoneJpLen => "phone_jp_len",
            ValidatorRule::EnumOneOf => "enum_one_of",
            ValidatorRule::DateParseable => "date_parseable",
        }
    }
}

impl fmt::Display for ValidatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorRule {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatorRule::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| DefinitionError::UnknownRule(s.to_string()))
    }
}

/// Declared type of a target field.
///
/// Informational only (mapping UI hint); enforcement is done by validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    Text,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "telephone", alias = "tel")]
    Telephone,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "enum")]
    Enum,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "string",
            FieldType::Email => "email",
            FieldType::Telephone => "telephone",
            FieldType::Date => "date",
            FieldType::Enum => "enum",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Typed validator configuration.
//!
//! Definition documents write validators as `{ "rule": ..., "params": {...} }`.
//! Deserialization resolves the untyped parameter bag into a [`Validator`]
//! variant, so malformed parameters are rejected with the definition instead
//! of surfacing while rows are processed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date_format::DateFormat;
use crate::error::DefinitionError;
use crate::ids::ValidatorRule;

/// Default bounds for `phone_jp_len`.
pub const PHONE_MIN_DIGITS: usize = 9;
pub const PHONE_MAX_DIGITS: usize = 11;

/// A validator rule together with its resolved parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawValidator", into = "RawValidator")]
pub enum Validator {
    /// Error when the value has fewer than `value` characters.
    MinLength { value: usize },
    /// Error when the value has more than `value` characters (no limit when absent).
    MaxLength { value: Option<usize> },
    /// Error when the value is not shaped like `local@domain.tld`.
    EmailFormat,
    /// Error when the value length falls outside `min..=max`.
    PhoneJpLen { min: usize, max: usize },
    /// Error when the value is not one of `values`.
    EnumOneOf { values: Vec<String> },
    /// Error when no format yields a real calendar date.
    DateParseable { formats: Vec<DateFormat> },
}

impl Validator {
    pub fn rule(&self) -> ValidatorRule {
        match self {
            Validator::MinLength { .. } => ValidatorRule::MinLength,
            Validator::MaxLength { .. } => ValidatorRule::MaxLength,
            Validator::EmailFormat => ValidatorRule::EmailFormat,
            Validator::PhoneJpLen { .. } => ValidatorRule::PhoneJpLen,
            Validator::EnumOneOf { .. } => ValidatorRule::EnumOneOf,
            Validator::DateParseable { .. } => ValidatorRule::DateParseable,
        }
    }

    /// `phone_jp_len` with the default 9..=11 bounds.
    pub fn phone_jp_len() -> Self {
        Validator::PhoneJpLen {
            min: PHONE_MIN_DIGITS,
            max: PHONE_MAX_DIGITS,
        }
    }

    /// `date_parseable` with the default formats.
    pub fn date_parseable() -> Self {
        Validator::DateParseable {
            formats: DateFormat::defaults(),
        }
    }

    /// `enum_one_of` over the given values.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::EnumOneOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Wire shape of a validator entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawValidator {
    pub rule: ValidatorRule,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl TryFrom<RawValidator> for Validator {
    type Error = DefinitionError;

    fn try_from(raw: RawValidator) -> Result<Self, Self::Error> {
        let params = Params {
            rule: raw.rule,
            bag: &raw.params,
        };
        let validator = match raw.rule {
            ValidatorRule::MinLength => Validator::MinLength {
                value: params.length("value")?.unwrap_or(0),
            },
            ValidatorRule::MaxLength => Validator::MaxLength {
                value: params.length("value")?,
            },
            ValidatorRule::EmailFormat => Validator::EmailFormat,
            ValidatorRule::PhoneJpLen => {
                let min = params.length("min")?.unwrap_or(PHONE_MIN_DIGITS);
                let max = params.length("max")?.unwrap_or(PHONE_MAX_DIGITS);
                if min > max {
                    return Err(params.invalid("min", format!("{min} is greater than max {max}")));
                }
                Validator::PhoneJpLen { min, max }
            }
            ValidatorRule::EnumOneOf => Validator::EnumOneOf {
                values: params.strings("values")?.unwrap_or_default(),
            },
            ValidatorRule::DateParseable => {
                let formats = match params.strings("formats")? {
                    None => DateFormat::defaults(),
                    Some(patterns) if patterns.is_empty() => {
                        return Err(params.invalid("formats", "expected at least one format"));
                    }
                    Some(patterns) => patterns
                        .iter()
                        .map(|pattern| DateFormat::parse(pattern))
                        .collect::<Result<Vec<_>, _>>()?,
                };
                Validator::DateParseable { formats }
            }
        };
        Ok(validator)
    }
}

impl From<Validator> for RawValidator {
    fn from(validator: Validator) -> Self {
        let rule = validator.rule();
        let mut params = Map::new();
        match validator {
            Validator::MinLength { value } => {
                params.insert("value".into(), Value::from(value));
            }
            Validator::MaxLength { value } => {
                if let Some(value) = value {
                    params.insert("value".into(), Value::from(value));
                }
            }
            Validator::EmailFormat => {}
            Validator::PhoneJpLen { min, max } => {
                params.insert("min".into(), Value::from(min));
                params.insert("max".into(), Value::from(max));
            }
            Validator::EnumOneOf { values } => {
                params.insert("values".into(), Value::from(values));
            }
            Validator::DateParseable { formats } => {
                let patterns: Vec<String> = formats.into_iter().map(String::from).collect();
                params.insert("formats".into(), Value::from(patterns));
            }
        }
        RawValidator { rule, params }
    }
}

struct Params<'a> {
    rule: ValidatorRule,
    bag: &'a Map<String, Value>,
}

impl Params<'_> {
    fn invalid(&self, param: &str, reason: impl Into<String>) -> DefinitionError {
        DefinitionError::InvalidParam {
            rule: self.rule,
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    /// A non-negative integer parameter. Integral floats (`3.0`) are accepted.
    fn length(&self, name: &str) -> Result<Option<usize>, DefinitionError> {
        let Some(value) = self.bag.get(name).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let number = value
            .as_u64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u64)
            })
            .ok_or_else(|| self.invalid(name, "expected a non-negative integer"))?;
        usize::try_from(number)
            .map(Some)
            .map_err(|_| self.invalid(name, "value too large"))
    }

    fn strings(&self, name: &str) -> Result<Option<Vec<String>>, DefinitionError> {
        let Some(value) = self.bag.get(name).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.invalid(name, "expected a list of strings"))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.invalid(name, "expected a list of strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<Validator, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn params_default_when_absent() {
        assert_eq!(
            parse(json!({ "rule": "phone_jp_len" })).unwrap(),
            Validator::PhoneJpLen { min: 9, max: 11 }
        );
        assert_eq!(
            parse(json!({ "rule": "max_length", "params": {} })).unwrap(),
            Validator::MaxLength { value: None }
        );
        assert_eq!(
            parse(json!({ "rule": "date_parseable" })).unwrap(),
            Validator::date_parseable()
        );
    }

    #[test]
    fn resolves_typed_params() {
        assert_eq!(
            parse(json!({ "rule": "min_length", "params": { "value": 2.0 } })).unwrap(),
            Validator::MinLength { value: 2 }
        );
        assert_eq!(
            parse(json!({ "rule": "enum_one_of", "params": { "values": ["male", "female"] } }))
                .unwrap(),
            Validator::one_of(["male", "female"])
        );
    }

    #[test]
    fn rejects_malformed_params() {
        let err = parse(json!({ "rule": "min_length", "params": { "value": "three" } }))
            .unwrap_err();
        assert!(err.to_string().contains("invalid parameter `value` for rule `min_length`"));

        assert!(parse(json!({ "rule": "phone_jp_len", "params": { "min": 12, "max": 10 } })).is_err());
        assert!(parse(json!({ "rule": "enum_one_of", "params": { "values": [1, 2] } })).is_err());
        assert!(parse(json!({ "rule": "date_parseable", "params": { "formats": [] } })).is_err());
        assert!(parse(json!({ "rule": "date_parseable", "params": { "formats": ["YYYY"] } })).is_err());
    }

    #[test]
    fn rejects_unknown_rule() {
        let err = parse(json!({ "rule": "regex_match" })).unwrap_err();
        assert!(err.to_string().contains("unknown variant `regex_match`"));
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let value = serde_json::to_value(Validator::phone_jp_len()).unwrap();
        assert_eq!(
            value,
            json!({ "rule": "phone_jp_len", "params": { "min": 9, "max": 11 } })
        );
    }
}

//! Error types for import definitions.

use thiserror::Error;

use crate::ids::ValidatorRule;

/// Errors that make an import definition unusable.
///
/// Every variant is fatal for the session: no row may be processed against a
/// definition that failed to load.
#[derive(Debug, Error)]
pub enum DefinitionError {
    // === Schema Errors ===
    /// The JSON document does not match the definition shape.
    #[error("definition schema invalid: {0}")]
    Schema(#[from] serde_json::Error),

    /// A normalizer identifier outside the supported set.
    #[error("unknown normalizer `{0}`")]
    UnknownNormalizer(String),

    /// A validator rule identifier outside the supported set.
    #[error("unknown validator rule `{0}`")]
    UnknownRule(String),

    /// A validator parameter has the wrong type or value.
    #[error("invalid parameter `{param}` for rule `{rule}`: {reason}")]
    InvalidParam {
        rule: ValidatorRule,
        param: String,
        reason: String,
    },

    /// A date format pattern that cannot be used for parsing.
    #[error("invalid date format `{pattern}`: {reason}")]
    InvalidDateFormat { pattern: String, reason: String },

    // === Cross-Reference Errors ===
    /// A field or computed field with an empty key.
    #[error("{kind} at position {index} has a blank key")]
    BlankKey { kind: &'static str, index: usize },

    /// Two fields share the same key.
    #[error("duplicate field key `{0}`")]
    DuplicateKey(String),

    /// A computed field reuses a key that already exists.
    #[error("computed field `{0}` collides with an existing key")]
    ComputedKeyCollision(String),

    /// A reference to a key that is not defined (or not defined yet).
    #[error("{context} references unknown key `{key}`")]
    UnknownReference { context: String, key: String },

    /// Dedupe threshold outside the 0..=100 score range.
    #[error("dedupe threshold {0} is outside 0..=100")]
    ThresholdOutOfRange(u8),
}

/// Result type for definition operations.
pub type Result<T> = std::result::Result<T, DefinitionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DefinitionError::UnknownReference {
            context: "computed field `email_norm`".to_string(),
            key: "mail".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "computed field `email_norm` references unknown key `mail`"
        );
    }

    #[test]
    fn test_invalid_param_display() {
        let err = DefinitionError::InvalidParam {
            rule: ValidatorRule::MinLength,
            param: "value".to_string(),
            reason: "expected a non-negative integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid parameter `value` for rule `min_length`: expected a non-negative integer"
        );
    }
}

//! Validator pipeline.
//!
//! Runs the declared validators of a field against its normalized value and
//! reports every failure as a [`FieldError`]. Validation never stops at the
//! first failing rule, except for the `required` check.

pub mod date;
pub mod rules;

use std::collections::BTreeMap;

use idef_model::{ErrorCode, FieldDefinition, FieldError, ImportDefinition};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn field_error(field: &FieldDefinition, code: ErrorCode, message: String) -> FieldError {
    FieldError {
        field_key: field.key.clone(),
        field_label: field.label.clone(),
        code,
        message,
    }
}

/// Validate one normalized value against a field definition.
///
/// A blank required value yields a single `required` error; a blank optional
/// value yields none. Otherwise every validator runs in declaration order.
pub fn validate_value(field: &FieldDefinition, value: &str) -> Vec<FieldError> {
    if is_blank(value) {
        if field.required {
            let message = format!("{} is required", field.label);
            return vec![field_error(field, ErrorCode::Required, message)];
        }
        return Vec::new();
    }

    field
        .validators
        .iter()
        .filter_map(|validator| {
            rules::check(validator, &field.label, value)
                .map(|message| field_error(field, validator.rule().into(), message))
        })
        .collect()
}

/// Validate every declared field of a normalized row, in field order.
///
/// Computed fields are not validated.
pub fn validate_row(
    definition: &ImportDefinition,
    normalized: &BTreeMap<String, String>,
) -> Vec<FieldError> {
    let errors: Vec<FieldError> = definition
        .fields
        .iter()
        .flat_map(|field| {
            let value = normalized.get(&field.key).map_or("", String::as_str);
            validate_value(field, value)
        })
        .collect();

    if !errors.is_empty() {
        tracing::trace!(errors = errors.len(), "row failed validation");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use idef_model::{FieldType, Validator};

    fn phone_field() -> FieldDefinition {
        FieldDefinition::new("phone", "Phone", FieldType::Telephone)
            .with_validator(Validator::phone_jp_len())
            .with_validator(Validator::MinLength { value: 10 })
    }

    #[test]
    fn required_blank_short_circuits() {
        let field = phone_field().required();
        let errors = validate_value(&field, "   ");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::Required);
        assert_eq!(errors[0].message, "Phone is required");
        assert_eq!(errors[0].field_key, "phone");
    }

    #[test]
    fn optional_blank_passes() {
        assert!(validate_value(&phone_field(), "").is_empty());
    }

    #[test]
    fn all_rules_run_without_short_circuit() {
        let errors = validate_value(&phone_field(), "1234");
        let codes: Vec<_> = errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::PhoneJpLen, ErrorCode::MinLength]);
    }

    #[test]
    fn clean_value_has_no_errors() {
        assert!(validate_value(&phone_field(), "0312345678").is_empty());
    }

    #[test]
    fn row_validation_skips_computed_fields() {
        let definition = ImportDefinition::new(
            "1",
            "customer",
            vec![
                FieldDefinition::new("full_name", "Full name", FieldType::Text).required(),
                phone_field(),
            ],
        );
        let normalized = BTreeMap::from([
            ("phone".to_string(), "0312345678".to_string()),
            ("phone_norm".to_string(), String::new()),
        ]);
        let errors = validate_row(&definition, &normalized);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_key, "full_name");
        assert_eq!(errors[0].code, ErrorCode::Required);
    }
}

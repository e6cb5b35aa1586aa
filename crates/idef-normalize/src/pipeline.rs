//! Ordered normalizer execution.

use std::collections::BTreeMap;

use idef_model::{DefinitionError, ImportDefinition, NormalizerId, NormalizerParams};

use crate::transforms;

/// Apply a single normalizer.
pub fn apply(id: NormalizerId, value: &str, params: Option<&NormalizerParams>) -> String {
    match id {
        NormalizerId::Trim => transforms::trim(value),
        NormalizerId::CollapseSpaces => transforms::collapse_spaces(value),
        NormalizerId::Lower => transforms::lower(value),
        NormalizerId::ToHalfwidth => transforms::to_halfwidth(value),
        NormalizerId::DigitsOnly => transforms::digits_only(value),
        NormalizerId::NormalizeHyphens => transforms::normalize_hyphens(value),
        NormalizerId::EnumMap => transforms::enum_map(value, params),
    }
}

/// Apply `normalizers` strictly left to right, each consuming the previous output.
pub fn normalize(
    value: &str,
    normalizers: &[NormalizerId],
    params: Option<&NormalizerParams>,
) -> String {
    normalizers
        .iter()
        .fold(value.to_string(), |current, id| apply(*id, &current, params))
}

/// Like [`normalize`], for normalizers given by name.
///
/// All names are resolved before any transform runs.
///
/// # Errors
///
/// Returns [`DefinitionError::UnknownNormalizer`] for the first name outside
/// the supported set; the value is never passed through unchanged.
pub fn normalize_named<S: AsRef<str>>(
    value: &str,
    names: &[S],
    params: Option<&NormalizerParams>,
) -> Result<String, DefinitionError> {
    let ids = names
        .iter()
        .map(|name| name.as_ref().parse::<NormalizerId>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(normalize(value, &ids, params))
}

/// Normalize every field of a mapped row, then derive computed fields.
///
/// Computed fields read the already-normalized value of their source,
/// falling back to the mapped raw value, then to the empty string.
pub fn normalize_mapped(
    mapped: &BTreeMap<String, String>,
    definition: &ImportDefinition,
) -> BTreeMap<String, String> {
    let mut normalized = BTreeMap::new();

    for field in &definition.fields {
        let raw = mapped.get(&field.key).map_or("", String::as_str);
        let value = normalize(raw, &field.normalizers, field.normalizer_params.as_ref());
        normalized.insert(field.key.clone(), value);
    }

    for computed in &definition.computed_fields {
        let source = normalized
            .get(&computed.from)
            .or_else(|| mapped.get(&computed.from))
            .map_or("", String::as_str);
        let value = normalize(source, &computed.normalizers, None);
        normalized.insert(computed.key.clone(), value);
    }

    tracing::trace!(
        fields = definition.fields.len(),
        computed = definition.computed_fields.len(),
        "normalized row"
    );

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use idef_model::{ComputedField, FieldDefinition, FieldType};

    #[test]
    fn applies_left_to_right() {
        // digits_only before to_halfwidth drops full-width digits entirely.
        assert_eq!(
            normalize("０３-12", &[NormalizerId::DigitsOnly, NormalizerId::ToHalfwidth], None),
            "12"
        );
        assert_eq!(
            normalize("０３-12", &[NormalizerId::ToHalfwidth, NormalizerId::DigitsOnly], None),
            "0312"
        );
    }

    #[test]
    fn enum_map_sees_previous_output() {
        let params = NormalizerParams::default().with_alias("female", ["f"]);
        assert_eq!(
            normalize(
                "  Ｆ ",
                &[NormalizerId::ToHalfwidth, NormalizerId::EnumMap],
                Some(&params)
            ),
            "female"
        );
    }

    #[test]
    fn unknown_named_normalizer_fails() {
        let err = normalize_named("abc", &["trim", "uppercase"], None).unwrap_err();
        assert!(matches!(err, DefinitionError::UnknownNormalizer(ref n) if n == "uppercase"));
        assert_eq!(normalize_named(" ABC ", &["trim", "lower"], None).unwrap(), "abc");
    }

    #[test]
    fn computed_fields_chain_from_normalized_values() {
        let definition = ImportDefinition::new(
            "1",
            "customer",
            vec![
                FieldDefinition::new("phone", "Phone", FieldType::Telephone)
                    .with_normalizers([NormalizerId::ToHalfwidth]),
            ],
        )
        .with_computed_field(ComputedField::new(
            "phone_norm",
            "phone",
            [NormalizerId::DigitsOnly],
        ))
        .with_computed_field(ComputedField::new("phone_copy", "phone_norm", []));

        let mapped = BTreeMap::from([("phone".to_string(), "０３-1234".to_string())]);
        let normalized = normalize_mapped(&mapped, &definition);

        assert_eq!(normalized["phone"], "03-1234");
        assert_eq!(normalized["phone_norm"], "031234");
        assert_eq!(normalized["phone_copy"], "031234");
    }

    #[test]
    fn missing_mapped_value_normalizes_from_empty() {
        let definition = ImportDefinition::new(
            "1",
            "customer",
            vec![FieldDefinition::new("name", "Name", FieldType::Text)],
        );
        let normalized = normalize_mapped(&BTreeMap::new(), &definition);
        assert_eq!(normalized["name"], "");
    }
}

//! Row processing: map, normalize, validate.

use idef_model::{FieldMapping, ImportDefinition, RowInput, RowProcessed};

use crate::mapper::map_row;

/// Process one source row.
///
/// Deterministic and independent of any other row. Errors follow field
/// order; computed fields are derived but never validated.
pub fn process_row(
    row: &RowInput,
    mapping: &FieldMapping,
    definition: &ImportDefinition,
) -> RowProcessed {
    let mapped = map_row(row, mapping, definition);
    let normalized = idef_normalize::normalize_mapped(&mapped, definition);
    let errors = idef_validate::validate_row(definition, &normalized);

    RowProcessed {
        raw: row.clone(),
        mapped,
        normalized,
        errors,
    }
}

/// A definition and mapping bound together for repeated row processing.
#[derive(Debug, Clone, Copy)]
pub struct RowProcessor<'a> {
    definition: &'a ImportDefinition,
    mapping: &'a FieldMapping,
}

impl<'a> RowProcessor<'a> {
    pub fn new(definition: &'a ImportDefinition, mapping: &'a FieldMapping) -> Self {
        Self {
            definition,
            mapping,
        }
    }

    pub fn definition(&self) -> &'a ImportDefinition {
        self.definition
    }

    pub fn mapping(&self) -> &'a FieldMapping {
        self.mapping
    }

    pub fn process(&self, row: &RowInput) -> RowProcessed {
        process_row(row, self.mapping, self.definition)
    }

    /// Process rows in order; output index `i` corresponds to input row `i`.
    pub fn process_batch<'r, I>(&self, rows: I) -> Vec<RowProcessed>
    where
        I: IntoIterator<Item = &'r RowInput>,
    {
        let processed: Vec<RowProcessed> = rows.into_iter().map(|row| self.process(row)).collect();
        tracing::debug!(
            entity = %self.definition.entity,
            rows = processed.len(),
            error_rows = processed.iter().filter(|row| !row.is_clean()).count(),
            "processed batch"
        );
        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idef_model::{ErrorCode, FieldDefinition, FieldType, NormalizerId, Validator, row};

    fn definition() -> ImportDefinition {
        ImportDefinition::new(
            "1",
            "customer",
            vec![
                FieldDefinition::new("full_name", "Name", FieldType::Text).required(),
                FieldDefinition::new("email", "Email", FieldType::Email)
                    .with_normalizers([NormalizerId::Trim, NormalizerId::Lower])
                    .with_validator(Validator::EmailFormat),
            ],
        )
    }

    #[test]
    fn processes_in_input_order() {
        let definition = definition();
        let mapping: FieldMapping = [("full_name", "Name"), ("email", "Email")].into_iter().collect();
        let rows = vec![
            row([("Name", "Alice"), ("Email", "A@X.IO")]),
            row([("Name", ""), ("Email", "nope")]),
        ];
        let processed = RowProcessor::new(&definition, &mapping).process_batch(&rows);

        assert_eq!(processed.len(), 2);
        assert!(processed[0].is_clean());
        assert_eq!(processed[0].normalized_value("email"), "a@x.io");

        let codes: Vec<_> = processed[1].errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, [ErrorCode::Required, ErrorCode::EmailFormat]);
        assert_eq!(processed[1].raw, rows[1]);
    }
}

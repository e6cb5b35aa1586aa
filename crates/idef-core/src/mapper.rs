//! Source column to field key mapping.

use std::collections::BTreeMap;

use idef_model::{FieldMapping, ImportDefinition, RowInput};
use serde::{Deserialize, Serialize};

/// Project a source row onto the definition's fields.
///
/// Every field gets an entry. Unmapped fields, missing columns and null
/// cells become `""`; other cells use their text form.
pub fn map_row(
    row: &RowInput,
    mapping: &FieldMapping,
    definition: &ImportDefinition,
) -> BTreeMap<String, String> {
    definition
        .fields
        .iter()
        .map(|field| {
            let value = mapping
                .source_column(&field.key)
                .and_then(|column| row.get(column))
                .map(|cell| cell.to_text())
                .unwrap_or_default();
            (field.key.clone(), value)
        })
        .collect()
}

/// Propose a mapping from source column names.
///
/// A field takes the first column equal to its label or key; failing that,
/// the first column containing its label.
pub fn suggest_mapping<S: AsRef<str>>(definition: &ImportDefinition, columns: &[S]) -> FieldMapping {
    let mut mapping = FieldMapping::new();
    for field in &definition.fields {
        let exact = columns.iter().map(AsRef::<str>::as_ref).find(|column| {
            let column = column.trim();
            column == field.label || column == field.key
        });
        let found = exact.or_else(|| {
            if field.label.trim().is_empty() {
                return None;
            }
            columns
                .iter()
                .map(AsRef::<str>::as_ref)
                .find(|column| column.contains(field.label.as_str()))
        });
        if let Some(column) = found {
            tracing::trace!(field = %field.key, column, "suggested column");
            mapping.set(field.key.clone(), column);
        }
    }
    mapping
}

/// A required field that has no source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedField {
    pub key: String,
    pub label: String,
}

/// Required fields without a mapped column, in definition order.
pub fn required_unmapped(definition: &ImportDefinition, mapping: &FieldMapping) -> Vec<UnmappedField> {
    definition
        .required_fields()
        .filter(|field| !mapping.is_mapped(&field.key))
        .map(|field| UnmappedField {
            key: field.key.clone(),
            label: field.label.clone(),
        })
        .collect()
}

/// Mapped columns that do not appear among `columns`, as `(field key, column)`.
pub fn missing_columns<'a, S: AsRef<str>>(
    mapping: &'a FieldMapping,
    columns: &[S],
) -> Vec<(&'a str, &'a str)> {
    mapping
        .iter()
        .filter(|(_, column)| !column.trim().is_empty())
        .filter(|(_, column)| !columns.iter().any(|c| c.as_ref() == *column))
        .collect()
}

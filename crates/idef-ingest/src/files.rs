//! JSON document loaders.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use idef_model::{FieldMapping, ImportDefinition, TabularData};
use serde::de::DeserializeOwned;

use crate::error::{IngestError, Result};
use crate::tabular::read_csv_table;

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| IngestError::read(path, source))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| IngestError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and check an import definition.
///
/// Schema errors and cross-reference violations both reject the file.
pub fn load_definition(path: &Path) -> Result<ImportDefinition> {
    let text = read_text(path)?;
    let definition =
        ImportDefinition::from_json_str(&text).map_err(|source| IngestError::InvalidDefinition {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        path = %path.display(),
        entity = %definition.entity,
        schema_version = %definition.schema_version,
        fields = definition.fields.len(),
        computed = definition.computed_fields.len(),
        "loaded import definition"
    );
    Ok(definition)
}

/// Load a `{ "field_key": "Column" }` mapping document.
pub fn load_mapping(path: &Path) -> Result<FieldMapping> {
    read_json(path)
}

/// Load a `{ "columns": [...], "rows": [{...}] }` document.
pub fn load_rows_json(path: &Path) -> Result<TabularData> {
    let table: TabularData = read_json(path)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "loaded JSON rows");
    Ok(table)
}

/// Load a JSON array of normalized records that already exist.
pub fn load_existing(path: &Path) -> Result<Vec<BTreeMap<String, String>>> {
    let records: Vec<BTreeMap<String, String>> = read_json(path)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded existing records");
    Ok(records)
}

/// Load source rows by extension: `.json` as a row document, anything else as CSV.
pub fn load_source(path: &Path) -> Result<TabularData> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_rows_json(path)
    } else {
        read_csv_table(path)
    }
}

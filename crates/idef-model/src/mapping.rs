//! Field key to source column mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which source column feeds each target field.
///
/// Keys absent from the mapping, or mapped to a blank column name, are
/// unmapped and produce an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<String, String>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `field_key` to `column`, replacing any previous column.
    pub fn set(&mut self, field_key: impl Into<String>, column: impl Into<String>) {
        self.0.insert(field_key.into(), column.into());
    }

    /// Remove the mapping for `field_key`, returning the column it had.
    pub fn clear(&mut self, field_key: &str) -> Option<String> {
        self.0.remove(field_key)
    }

    /// The mapped column, if any and non-blank.
    pub fn source_column(&self, field_key: &str) -> Option<&str> {
        self.0
            .get(field_key)
            .map(String::as_str)
            .filter(|column| !column.trim().is_empty())
    }

    pub fn is_mapped(&self, field_key: &str) -> bool {
        self.source_column(field_key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_columns_count_as_unmapped() {
        let mapping: FieldMapping = [("full_name", "Name"), ("email", "  ")].into_iter().collect();
        assert_eq!(mapping.source_column("full_name"), Some("Name"));
        assert_eq!(mapping.source_column("email"), None);
        assert_eq!(mapping.source_column("phone"), None);
    }

    #[test]
    fn set_and_clear() {
        let mut mapping = FieldMapping::new();
        mapping.set("email", "Mail");
        mapping.set("email", "E-mail");
        assert_eq!(mapping.source_column("email"), Some("E-mail"));
        assert_eq!(mapping.clear("email"), Some("E-mail".to_string()));
        assert!(mapping.is_empty());
    }

    #[test]
    fn serializes_as_plain_object() {
        let mapping: FieldMapping = [("email", "Email")].into_iter().collect();
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"email":"Email"}"#);
    }
}

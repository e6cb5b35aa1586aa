//! Batch error summary.

use std::collections::BTreeMap;

use idef_model::{ErrorCode, RowProcessed};
use serde::{Deserialize, Serialize};

/// Error counts over a processed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub total_rows: usize,
    /// Rows with at least one error.
    pub error_rows: usize,
    /// Field key -> number of errors.
    pub by_field: BTreeMap<String, usize>,
    /// Error code -> number of errors.
    pub by_code: BTreeMap<ErrorCode, usize>,
}

impl ErrorSummary {
    pub fn from_rows(rows: &[RowProcessed]) -> Self {
        let mut summary = Self {
            total_rows: rows.len(),
            ..Self::default()
        };
        for row in rows {
            if !row.is_clean() {
                summary.error_rows += 1;
            }
            for error in &row.errors {
                *summary.by_field.entry(error.field_key.clone()).or_default() += 1;
                *summary.by_code.entry(error.code).or_default() += 1;
            }
        }
        summary
    }

    pub fn clean_rows(&self) -> usize {
        self.total_rows - self.error_rows
    }

    pub fn has_errors(&self) -> bool {
        self.error_rows > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idef_model::{FieldError, RowInput};

    fn processed(errors: &[(&str, ErrorCode)]) -> RowProcessed {
        RowProcessed {
            raw: RowInput::new(),
            mapped: BTreeMap::new(),
            normalized: BTreeMap::new(),
            errors: errors
                .iter()
                .map(|(key, code)| FieldError {
                    field_key: key.to_string(),
                    field_label: key.to_string(),
                    code: *code,
                    message: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn counts_rows_and_errors() {
        let rows = vec![
            processed(&[]),
            processed(&[("email", ErrorCode::EmailFormat), ("phone", ErrorCode::PhoneJpLen)]),
            processed(&[("email", ErrorCode::Required)]),
        ];
        let summary = ErrorSummary::from_rows(&rows);
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.error_rows, 2);
        assert_eq!(summary.clean_rows(), 1);
        assert_eq!(summary.by_field["email"], 2);
        assert_eq!(summary.by_field["phone"], 1);
        assert_eq!(summary.by_code[&ErrorCode::Required], 1);
        assert!(summary.has_errors());
    }

    #[test]
    fn empty_batch_has_no_errors() {
        let summary = ErrorSummary::from_rows(&[]);
        assert_eq!(summary, ErrorSummary::default());
        assert!(!summary.has_errors());
    }
}

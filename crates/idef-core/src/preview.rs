//! Batch preview: processed rows, duplicate candidates, error summary.

use std::collections::BTreeMap;

use idef_dedupe::{CandidateDetector, DedupeConfig};
use idef_model::{DuplicateCandidate, FieldMapping, ImportDefinition, RowProcessed, TabularData};
use serde::{Deserialize, Serialize};

use crate::mapper::missing_columns;
use crate::processor::RowProcessor;
use crate::summary::ErrorSummary;

/// A normalized record that already exists in the target store.
pub type ExistingRecord = BTreeMap<String, String>;

/// Options for building an [`ImportPreview`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOptions {
    /// Overrides the definition's candidate threshold.
    pub threshold: Option<u8>,
    /// Only the first `limit` source rows are processed.
    pub limit: Option<usize>,
}

impl PreviewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One processed row with its duplicate candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRow {
    pub row_index: usize,
    pub processed: RowProcessed,
    /// Earlier rows of the same batch.
    pub candidates: Vec<DuplicateCandidate>,
    /// Entries of the existing-record pool.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub existing_candidates: Vec<DuplicateCandidate>,
}

impl PreviewRow {
    pub fn is_clean(&self) -> bool {
        self.processed.is_clean()
    }

    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty() || !self.existing_candidates.is_empty()
    }
}

/// Everything needed to review a batch before importing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    pub entity: String,
    pub threshold: u8,
    pub rows: Vec<PreviewRow>,
    pub summary: ErrorSummary,
}

impl ImportPreview {
    pub fn row(&self, row_index: usize) -> Option<&PreviewRow> {
        self.rows.iter().find(|row| row.row_index == row_index)
    }

    pub fn clean_rows(&self) -> impl Iterator<Item = &PreviewRow> {
        self.rows.iter().filter(|row| row.is_clean())
    }
}

/// Process `data`, detect candidates within the batch and against `existing`.
pub fn build_preview(
    definition: &ImportDefinition,
    mapping: &FieldMapping,
    data: &TabularData,
    existing: &[ExistingRecord],
    options: &PreviewOptions,
) -> ImportPreview {
    for (field, column) in missing_columns(mapping, &data.columns) {
        tracing::warn!(field, column, "mapped column not present in source");
    }

    let limit = options.limit.unwrap_or(data.rows.len());
    let processor = RowProcessor::new(definition, mapping);
    let processed = processor.process_batch(data.rows.iter().take(limit));

    let mut config = DedupeConfig::from_policy(definition.dedupe_policy.as_ref());
    if let Some(threshold) = options.threshold {
        config = config.with_threshold(threshold);
    }
    let threshold = config.threshold;
    let detector = CandidateDetector::new(config);

    let batch_candidates = detector.detect_all(&processed);
    let summary = ErrorSummary::from_rows(&processed);

    let rows: Vec<PreviewRow> = processed
        .into_iter()
        .zip(batch_candidates)
        .enumerate()
        .map(|(row_index, (processed, candidates))| {
            let existing_candidates = if existing.is_empty() {
                Vec::new()
            } else {
                detector.detect_existing(&processed, existing)
            };
            PreviewRow {
                row_index,
                processed,
                candidates,
                existing_candidates,
            }
        })
        .collect();

    tracing::debug!(
        rows = rows.len(),
        error_rows = summary.error_rows,
        rows_with_candidates = rows.iter().filter(|row| row.has_candidates()).count(),
        existing = existing.len(),
        "built import preview"
    );

    ImportPreview {
        entity: definition.entity.clone(),
        threshold,
        rows,
        summary,
    }
}

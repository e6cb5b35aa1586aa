//! Import request construction.
//!
//! An import request carries the clean rows of a preview together with the
//! reviewer's decision for each duplicate candidate.

use std::collections::BTreeMap;

use idef_model::{DuplicateCandidate, ResolutionAction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preview::{ImportPreview, PreviewRow};

/// Where a candidate index points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidatePool {
    /// An earlier row of the same batch.
    #[default]
    Batch,
    /// An entry of the existing-record pool.
    Existing,
}

/// A reviewer's decision for one candidate of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub row_index: usize,
    pub candidate_index: usize,
    #[serde(default)]
    pub pool: CandidatePool,
    pub action: ResolutionAction,
}

impl Resolution {
    pub fn batch(row_index: usize, candidate_index: usize, action: ResolutionAction) -> Self {
        Self {
            row_index,
            candidate_index,
            pool: CandidatePool::Batch,
            action,
        }
    }

    pub fn existing(row_index: usize, candidate_index: usize, action: ResolutionAction) -> Self {
        Self {
            row_index,
            candidate_index,
            pool: CandidatePool::Existing,
            action,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("resolution references unknown row {row_index}")]
    UnknownRow { row_index: usize },

    #[error("row {row_index} has validation errors and cannot be imported")]
    RowHasErrors { row_index: usize },

    #[error("row {row_index} has no {pool:?} candidate {candidate_index}")]
    UnknownCandidate {
        row_index: usize,
        candidate_index: usize,
        pool: CandidatePool,
    },

    #[error("candidate row {candidate_index} of row {row_index} has validation errors")]
    CandidateHasErrors {
        row_index: usize,
        candidate_index: usize,
    },

    #[error("candidate {candidate_index} of row {row_index} is resolved more than once")]
    DuplicateResolution {
        row_index: usize,
        candidate_index: usize,
    },
}

pub type Result<T> = std::result::Result<T, RequestError>;

/// A candidate with its optional resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDecision {
    pub candidate: DuplicateCandidate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionAction>,
}

/// A clean row ready for import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRow {
    pub row_index: usize,
    pub normalized: BTreeMap<String, String>,
    pub candidates: Vec<CandidateDecision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub existing_candidates: Vec<CandidateDecision>,
}

impl RequestRow {
    /// Whether every candidate has a resolution.
    pub fn is_resolved(&self) -> bool {
        self.candidates
            .iter()
            .chain(&self.existing_candidates)
            .all(|decision| decision.resolution.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub entity: String,
    pub rows: Vec<RequestRow>,
}

impl ImportRequest {
    /// Build a request from the clean rows of `preview`.
    ///
    /// # Errors
    ///
    /// Rejects resolutions for rows outside the preview, rows with errors,
    /// candidates the row does not have, batch candidates whose row has
    /// errors, and candidates resolved twice. Batch candidates pointing at
    /// rows with errors are left out of the request.
    pub fn build(preview: &ImportPreview, resolutions: &[Resolution]) -> Result<Self> {
        let mut by_candidate: BTreeMap<(usize, CandidatePool, usize), ResolutionAction> =
            BTreeMap::new();

        for resolution in resolutions {
            let row_index = resolution.row_index;
            let row = preview
                .row(row_index)
                .ok_or(RequestError::UnknownRow { row_index })?;
            if !row.is_clean() {
                return Err(RequestError::RowHasErrors { row_index });
            }
            let known = candidates_in(row, resolution.pool)
                .iter()
                .any(|c| c.candidate_index == resolution.candidate_index);
            if !known {
                return Err(RequestError::UnknownCandidate {
                    row_index,
                    candidate_index: resolution.candidate_index,
                    pool: resolution.pool,
                });
            }
            if resolution.pool == CandidatePool::Batch
                && !is_clean_target(preview, resolution.candidate_index)
            {
                return Err(RequestError::CandidateHasErrors {
                    row_index,
                    candidate_index: resolution.candidate_index,
                });
            }
            let key = (row_index, resolution.pool, resolution.candidate_index);
            if by_candidate.insert(key, resolution.action).is_some() {
                return Err(RequestError::DuplicateResolution {
                    row_index,
                    candidate_index: resolution.candidate_index,
                });
            }
        }

        let decide = |row: &PreviewRow, pool: CandidatePool| -> Vec<CandidateDecision> {
            candidates_in(row, pool)
                .iter()
                .filter(|candidate| {
                    pool == CandidatePool::Existing
                        || is_clean_target(preview, candidate.candidate_index)
                })
                .map(|candidate| CandidateDecision {
                    candidate: candidate.clone(),
                    resolution: by_candidate
                        .get(&(row.row_index, pool, candidate.candidate_index))
                        .copied(),
                })
                .collect()
        };

        let rows: Vec<RequestRow> = preview
            .clean_rows()
            .map(|row| RequestRow {
                row_index: row.row_index,
                normalized: row.processed.normalized.clone(),
                candidates: decide(row, CandidatePool::Batch),
                existing_candidates: decide(row, CandidatePool::Existing),
            })
            .collect();

        tracing::debug!(
            rows = rows.len(),
            skipped = preview.rows.len() - rows.len(),
            resolutions = resolutions.len(),
            "built import request"
        );

        Ok(Self {
            entity: preview.entity.clone(),
            rows,
        })
    }

    pub fn unresolved_rows(&self) -> impl Iterator<Item = &RequestRow> {
        self.rows.iter().filter(|row| !row.is_resolved())
    }
}

/// Whether batch row `row_index` will itself be part of the request.
fn is_clean_target(preview: &ImportPreview, row_index: usize) -> bool {
    preview.row(row_index).is_some_and(PreviewRow::is_clean)
}

fn candidates_in(row: &PreviewRow, pool: CandidatePool) -> &[DuplicateCandidate] {
    match pool {
        CandidatePool::Batch => &row.candidates,
        CandidatePool::Existing => &row.existing_candidates,
    }
}

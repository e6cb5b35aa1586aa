//! Duplicate candidate detection.
//!
//! Scores normalized records against earlier records of the same batch, or
//! against a pool of existing records, by Levenshtein similarity of their
//! name and address fields.

pub mod detector;
pub mod similarity;

pub use detector::{CandidateDetector, DedupeConfig, NormalizedRecord, detect_all_candidates};
pub use similarity::similarity;

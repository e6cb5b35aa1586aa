//! Import definition data model.
//!
//! This crate holds the declarative contract that drives an import
//! ([`ImportDefinition`]) and the value types that flow through the pipeline:
//! source rows, field mappings, processed rows, field errors and duplicate
//! candidates. It contains no processing logic beyond loading and checking
//! definitions.
//!
//! Definitions are loaded from JSON and rejected as a whole on any schema or
//! cross-reference violation:
//!
//! ```ignore
//! let definition = ImportDefinition::from_json_str(&json)?;
//! ```

pub mod candidate;
pub mod cell;
mod check;
pub mod date_format;
pub mod definition;
pub mod error;
pub mod ids;
pub mod mapping;
pub mod processed;
pub mod validator;

pub use candidate::{DuplicateCandidate, MatchType, ResolutionAction};
pub use cell::{CellValue, RowInput, TabularData, row};
pub use date_format::{DateComponents, DateFormat, DatePart};
pub use definition::{
    CandidateRule, ComputedField, DEFAULT_CANDIDATE_THRESHOLD, DedupePolicy, EnumOption,
    FieldDefinition, FieldUi, ImportDefinition, NormalizerParams,
};
pub use error::{DefinitionError, Result};
pub use ids::{FieldType, NormalizerId, ValidatorRule};
pub use mapping::FieldMapping;
pub use processed::{ErrorCode, FieldError, RowProcessed};
pub use validator::Validator;

//! Import definition engine.
//!
//! Ties the pipeline stages together: source rows are mapped onto the fields
//! of an [`ImportDefinition`](idef_model::ImportDefinition), normalized and
//! validated one at a time, then checked for probable duplicates. The results
//! can be summarized, previewed and turned into an import request.
//!
//! ```ignore
//! let processor = RowProcessor::new(&definition, &mapping);
//! let rows = processor.process_batch(&data.rows);
//! let summary = ErrorSummary::from_rows(&rows);
//! ```

pub mod mapper;
pub mod preview;
pub mod processor;
pub mod request;
pub mod summary;

pub use mapper::{UnmappedField, map_row, missing_columns, required_unmapped, suggest_mapping};
pub use preview::{ExistingRecord, ImportPreview, PreviewOptions, PreviewRow, build_preview};
pub use processor::{RowProcessor, process_row};
pub use request::{
    CandidateDecision, CandidatePool, ImportRequest, RequestError, RequestRow, Resolution,
};
pub use summary::ErrorSummary;

//! Input loading for the import definition engine.
//!
//! # Features
//!
//! - **CSV Loading**: header-row CSV files into [`TabularData`](idef_model::TabularData)
//! - **JSON Documents**: definitions, field mappings, row documents and
//!   existing-record pools
//!
//! Every loader reports failures as [`IngestError`] carrying the offending path.

pub mod error;
pub mod files;
pub mod tabular;

pub use error::{IngestError, Result};
pub use files::{load_definition, load_existing, load_mapping, load_rows_json, load_source};
pub use tabular::{parse_csv_str, read_csv_table};

//! Normalizer pipeline.
//!
//! Applies the ordered, named string transforms declared on each field of an
//! import definition, then derives computed fields from the normalized values.
//!
//! # Design Principles
//!
//! - **Closed set**: normalizers are an enum; unknown names fail when parsed
//! - **Stateless functions**: every transform is a pure function of its input
//! - **Left to right**: each transform consumes the previous transform's output

mod pipeline;
pub mod transforms;

pub use pipeline::{apply, normalize, normalize_mapped, normalize_named};

//! CLI library components for the import definition engine.

pub mod logging;

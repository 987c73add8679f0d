//! Transformation module.
//!
//! - Extract: fixed-position fields to product records
//! - Pipeline: read, extract and write in one run

pub mod extract;
pub mod pipeline;

pub use extract::*;
pub use pipeline::*;

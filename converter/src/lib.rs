//! # products-import - bulk-edit sheet to products table CSV
//!
//! Converts the product bulk-edit spreadsheet export into a clean CSV that
//! the products table import accepts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ Sheet export │────▶│   Parser    │────▶│   Extract   │────▶│  Import CSV  │
//! │ (30-line pre)│     │ (auto-enc)  │     │ (fixed cols)│     │ (per schema) │
//! └──────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use products_import::{run, ConvertOptions};
//!
//! let result = run(&ConvertOptions::default()).unwrap();
//! println!("{}", result.summary_line());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`logs`] - Console progress logging
//! - [`models`] - Raw rows, product records and output schemas
//! - [`parser`] - Decoding and preamble skipping
//! - [`transform`] - Extraction and pipeline
//! - [`writer`] - Import CSV serialization

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Reading
pub mod parser;

// Transformation
pub mod transform;

// Writing
pub mod writer;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConvertResult, PipelineError, ReadError, ReadResult, WriteError, WriteResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{columns, OutputSchema, ProductRecord, RawRow, DEFAULT_CATEGORY, PREAMBLE_LINES};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_auto, decode_content, detect_encoding, read_bytes, read_file, RawRows};

// =============================================================================
// Re-exports - Extraction & Pipeline
// =============================================================================

pub use transform::extract::{extract, extract_all, normalize_price, ExtractResult, Rejection};

pub use transform::pipeline::{
    convert_bytes,
    convert_file,
    run,
    ConvertOptions,
    PipelineResult,
    DEFAULT_INPUT,
    DEFAULT_OUTPUT,
    DEFAULT_PREVIEW,
};

// =============================================================================
// Re-exports - Writer
// =============================================================================

pub use writer::{to_bytes, write_file, write_to};

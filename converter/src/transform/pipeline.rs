//! High-level pipeline API: read → extract → write.
//!
//! # Example
//!
//! ```rust,ignore
//! use products_import::{run, ConvertOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = run(&ConvertOptions::default())?;
//!     println!("{}", result.summary_line());
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::extract::{extract_all, ExtractResult};
use crate::error::{ConvertResult, ReadResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{OutputSchema, ProductRecord, PREAMBLE_LINES};
use crate::parser::{read_bytes, read_file, SourceRows};
use crate::writer::write_file;

/// Bulk-edit sheet exported from the spreadsheet.
pub const DEFAULT_INPUT: &str = "상품_일괄수정_엑셀양식.csv";

/// File picked up by the database import.
pub const DEFAULT_OUTPUT: &str = "products_import.csv";

/// Records shown after a run.
pub const DEFAULT_PREVIEW: usize = 10;

/// Options for a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Spreadsheet export to read
    pub input: PathBuf,

    /// Import CSV to create or overwrite
    pub output: PathBuf,

    /// Output layout
    pub schema: OutputSchema,

    /// Preamble records to discard before the data rows
    pub skip_lines: usize,

    /// Number of records listed in the preview
    pub preview: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            schema: OutputSchema::default(),
            skip_lines: PREAMBLE_LINES,
            preview: DEFAULT_PREVIEW,
        }
    }
}

/// Result of a conversion run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Accepted records, in source order
    pub records: Vec<ProductRecord>,

    /// Encoding the input was decoded with
    pub encoding: String,

    /// Records seen after the preamble, empty lines included
    pub rows_read: usize,

    /// Rows with too few fields
    pub too_short: usize,

    /// Rows with a missing name or unusable price
    pub rejected: usize,

    /// Where the records were written, if they were
    pub output: Option<PathBuf>,
}

impl PipelineResult {
    fn from_extract(encoding: String, extracted: ExtractResult) -> Self {
        Self {
            records: extracted.records,
            encoding,
            rows_read: extracted.rows_read,
            too_short: extracted.too_short,
            rejected: extracted.rejected,
            output: None,
        }
    }

    /// Closing line printed after a run.
    pub fn summary_line(&self) -> String {
        let file = self
            .output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        format!("총 {}개 상품을 {}에 저장했습니다.", self.records.len(), file)
    }

    /// Heading plus the first `limit` records, numbered from 1.
    pub fn preview_lines(&self, limit: usize) -> Vec<String> {
        let mut lines = vec![format!("처음 {}개 상품:", limit)];
        lines.extend(
            self.records
                .iter()
                .take(limit)
                .enumerate()
                .map(|(i, p)| format!("{}. {} - {} - {}원", i + 1, p.name, p.category, p.price)),
        );
        lines
    }
}

/// Convert the input file and write the import CSV.
///
/// The output is only created once every row has been read, so a read
/// failure never leaves a partial file behind.
pub fn run(options: &ConvertOptions) -> ConvertResult<PipelineResult> {
    log_info(format!("📖 Reading {}", options.input.display()));
    let source = read_file(&options.input, options.skip_lines)?;

    let mut result = extract_source(source, options.schema)?;

    log_info(format!("💾 Writing {} ({})", options.output.display(), options.schema));
    write_file(&options.output, &result.records, options.schema)?;
    log_success(format!("Wrote {} records", result.records.len()));

    result.output = Some(options.output.clone());
    Ok(result)
}

/// Read and extract in-memory bytes without writing anything.
pub fn convert_bytes(bytes: &[u8], schema: OutputSchema, skip_lines: usize) -> ReadResult<PipelineResult> {
    let source = read_bytes(bytes, skip_lines)?;
    extract_source(source, schema)
}

/// Read and extract a file without writing anything.
pub fn convert_file(path: &Path, schema: OutputSchema, skip_lines: usize) -> ReadResult<PipelineResult> {
    log_info(format!("📖 Reading {}", path.display()));
    let source = read_file(path, skip_lines)?;
    extract_source(source, schema)
}

fn extract_source(source: SourceRows, schema: OutputSchema) -> ReadResult<PipelineResult> {
    log_success(format!("Detected encoding: {}", source.encoding));

    let extracted = extract_all(source.rows, schema)?;
    log_success(format!("Read {} rows", extracted.rows_read));
    print_extract_result(&extracted);

    Ok(PipelineResult::from_extract(source.encoding, extracted))
}

/// Log one line of skip totals
fn print_extract_result(result: &ExtractResult) {
    if result.too_short + result.rejected == 0 {
        log_success(format!("All {} rows accepted", result.records.len()));
    } else {
        log_warning(result.summary());
        log_info_indent(
            format!("{} too short, {} without name or valid price", result.too_short, result.rejected),
            1,
        );
    }
}

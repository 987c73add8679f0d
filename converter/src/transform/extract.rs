//! Row extraction: fixed-position fields to [`ProductRecord`]s.
//!
//! Rows that are too short or fail the acceptance check are dropped
//! silently; only their counts are kept.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ReadResult;
use crate::models::{columns, OutputSchema, ProductRecord, RawRow, DEFAULT_CATEGORY};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Fewer than [`columns::MIN_FIELDS`] fields.
    TooShort,
    /// Empty name, or price is empty or not a whole number.
    Invalid,
}

/// Outcome of running extraction over a row stream.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ExtractResult {
    /// Accepted records, in source order
    pub records: Vec<ProductRecord>,
    /// Records seen after the preamble, empty lines included
    pub rows_read: usize,
    /// Rows with fewer than the required fields, empty lines included
    pub too_short: usize,
    /// Rows that failed the name/price check
    pub rejected: usize,
}

impl ExtractResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        format!(
            "{} rows read: {} accepted, {} too short, {} rejected",
            self.rows_read,
            self.records.len(),
            self.too_short,
            self.rejected
        )
    }
}

/// Strip thousands separators and check the price is a whole number.
pub fn normalize_price(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let price = raw.replace(',', "");
    DIGITS.is_match(&price).then_some(price)
}

/// Extract one record from a row.
pub fn extract(row: &RawRow, schema: OutputSchema) -> Result<ProductRecord, Rejection> {
    if row.len() < columns::MIN_FIELDS {
        return Err(Rejection::TooShort);
    }

    let name = row.field(columns::NAME);
    let mut category = row.field(columns::CATEGORY);

    if name.is_empty() {
        return Err(Rejection::Invalid);
    }
    let price = normalize_price(row.field(columns::UNIT_PRICE)).ok_or(Rejection::Invalid)?;

    if category.is_empty() && schema.defaults_category() {
        category = DEFAULT_CATEGORY;
    }

    let description = schema
        .has_description()
        .then(|| row.field(columns::DESCRIPTION).to_string());

    Ok(ProductRecord {
        name: name.to_string(),
        price,
        category: category.to_string(),
        description,
    })
}

/// Run extraction over every row, stopping at the first read failure.
pub fn extract_all<I>(rows: I, schema: OutputSchema) -> ReadResult<ExtractResult>
where
    I: IntoIterator<Item = ReadResult<RawRow>>,
{
    let mut result = ExtractResult::new();

    for row in rows {
        let row = row?;
        result.rows_read += 1;

        match extract(&row, schema) {
            Ok(record) => result.records.push(record),
            Err(Rejection::TooShort) => result.too_short += 1,
            Err(Rejection::Invalid) => result.rejected += 1,
        }
    }

    Ok(result)
}

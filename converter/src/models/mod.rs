//! Domain models for the products import pipeline.
//!
//! - [`RawRow`] - one source line split into positional fields
//! - [`ProductRecord`] - validated, normalized output row
//! - [`OutputSchema`] - which columns are written and how categories default
//! - [`columns`] - fixed positions in the bulk-edit sheet

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Sheet layout
// =============================================================================

/// Column positions in the product bulk-edit sheet.
pub mod columns {
    /// Second-level category.
    pub const CATEGORY: usize = 3;
    /// Product name.
    pub const NAME: usize = 4;
    /// Sales unit / packaging spec.
    pub const DESCRIPTION: usize = 5;
    /// Distributor purchase unit price.
    pub const UNIT_PRICE: usize = 12;
    /// Rows shorter than this carry no price column.
    pub const MIN_FIELDS: usize = UNIT_PRICE + 1;
}

/// Preamble lines above the data rows in the sheet.
pub const PREAMBLE_LINES: usize = 30;

/// Category written for rows with no category.
pub const DEFAULT_CATEGORY: &str = "기타";

// =============================================================================
// Raw Row
// =============================================================================

/// One data line from the source, split into fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Field at `index`, trimmed. Empty when the row is shorter.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(|s| s.trim()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// A product accepted for import.
///
/// `name` and `price` are never empty and `price` holds only ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: String,
    pub category: String,
    /// Only filled for [`OutputSchema::Catalog`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Output Schema
// =============================================================================

/// Layout of the generated import file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputSchema {
    /// `name,category,unit_price,description`; empty categories kept as-is.
    Catalog,
    /// `name,price,category`, matching the products table.
    /// Empty categories become [`DEFAULT_CATEGORY`].
    #[default]
    ProductsTable,
}

impl OutputSchema {
    /// Header line columns.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::Catalog => &["name", "category", "unit_price", "description"],
            Self::ProductsTable => &["name", "price", "category"],
        }
    }

    /// Record fields in header order.
    pub fn project<'a>(&self, record: &'a ProductRecord) -> Vec<&'a str> {
        match self {
            Self::Catalog => vec![
                record.name.as_str(),
                record.category.as_str(),
                record.price.as_str(),
                record.description.as_deref().unwrap_or(""),
            ],
            Self::ProductsTable => vec![
                record.name.as_str(),
                record.price.as_str(),
                record.category.as_str(),
            ],
        }
    }

    /// Whether empty categories are replaced by [`DEFAULT_CATEGORY`].
    pub fn defaults_category(&self) -> bool {
        matches!(self, Self::ProductsTable)
    }

    /// Whether the description column is extracted.
    pub fn has_description(&self) -> bool {
        matches!(self, Self::Catalog)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::ProductsTable => "products-table",
        }
    }
}

impl fmt::Display for OutputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "catalog" | "a" => Ok(Self::Catalog),
            "products-table" | "products_table" | "products" | "table" | "b" => {
                Ok(Self::ProductsTable)
            }
            other => Err(format!(
                "unknown schema '{}' (expected 'catalog' or 'products-table')",
                other
            )),
        }
    }
}

//! Writer stage: serialize accepted products to the import CSV.
//!
//! A field is quoted only when it contains a comma, a double quote or a line
//! break; embedded quotes are doubled. The same rule applies to every schema.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{WriteError, WriteResult};
use crate::models::{OutputSchema, ProductRecord};

/// Line terminator for the current platform.
fn platform_terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}

/// Write header and records to any sink, then flush it.
pub fn write_to<W: Write>(sink: W, records: &[ProductRecord], schema: OutputSchema) -> WriteResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .terminator(platform_terminator())
        .from_writer(sink);

    writer.write_record(schema.header())?;
    for record in records {
        writer.write_record(schema.project(record))?;
    }

    writer.flush()?;
    Ok(())
}

/// Create or truncate `path` and write the import file.
///
/// The file is closed when this returns, on success or error.
pub fn write_file<P: AsRef<Path>>(path: P, records: &[ProductRecord], schema: OutputSchema) -> WriteResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| WriteError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_to(file, records, schema)
}

/// Render the import file in memory.
pub fn to_bytes(records: &[ProductRecord], schema: OutputSchema) -> WriteResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_to(&mut buf, records, schema)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

    fn product(name: &str, price: &str, category: &str, description: Option<&str>) -> ProductRecord {
        ProductRecord {
            name: name.into(),
            price: price.into(),
            category: category.into(),
            description: description.map(String::from),
        }
    }

    fn render(records: &[ProductRecord], schema: OutputSchema) -> String {
        String::from_utf8(to_bytes(records, schema).unwrap()).unwrap()
    }

    #[test]
    fn test_products_table_output() {
        let out = render(&[product("사과즙", "1200", "식품", None)], OutputSchema::ProductsTable);
        assert_eq!(out, format!("name,price,category{NL}사과즙,1200,식품{NL}"));
    }

    #[test]
    fn test_catalog_output_with_empty_category() {
        let out = render(&[product("배즙", "900", "", Some("1L"))], OutputSchema::Catalog);
        assert_eq!(out, format!("name,category,unit_price,description{NL}배즙,,900,1L{NL}"));
    }

    #[test]
    fn test_header_only_when_no_records() {
        let out = render(&[], OutputSchema::ProductsTable);
        assert_eq!(out, format!("name,price,category{NL}"));
    }

    #[test]
    fn test_quoting_applies_to_every_schema() {
        let records = [product("사과, 배 \"세트\"", "15000", "선물\n세트", Some("2kg, 3kg"))];

        let table = render(&records, OutputSchema::ProductsTable);
        assert!(table.contains("\"사과, 배 \"\"세트\"\"\",15000,\"선물\n세트\""));

        let catalog = render(&records, OutputSchema::Catalog);
        assert!(catalog.contains("\"사과, 배 \"\"세트\"\"\",\"선물\n세트\",15000,\"2kg, 3kg\""));
    }

    #[test]
    fn test_write_file_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products_import.csv");
        std::fs::write(&path, "stale content that is longer than the output\n".repeat(10)).unwrap();

        write_file(&path, &[product("a", "1", "b", None)], OutputSchema::ProductsTable).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("name,price,category{NL}a,1,b{NL}"));
    }

    #[test]
    fn test_write_file_bad_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_file(&path, &[], OutputSchema::ProductsTable).unwrap_err();
        assert!(matches!(err, WriteError::Create { .. }));
    }
}

//! Reader stage: decode the spreadsheet export and yield positional rows.
//!
//! The bulk-edit sheet starts with a fixed preamble of instructions and
//! headers. Those records are discarded through the same CSV reader that
//! parses the data, so quoted cells spanning lines stay intact; everything
//! after is handed out lazily as [`RawRow`]s.

use csv::{Reader, ReaderBuilder, StringRecord};
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::Path;

use crate::error::{ReadError, ReadResult};
use crate::models::RawRow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decoded source text with the encoding it was read as.
#[derive(Debug, Clone)]
pub struct DecodedSource {
    pub content: String,
    pub encoding: String,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 always wins; chardet is only consulted for other bytes.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "euc-kr" | "cp949" | "uhc" | "windows-949" | "ks_c_5601-1987" => "euc-kr".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding label.
///
/// Bytes that are invalid for the label are an error, never replaced.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ReadResult<String> {
    let label = encoding.to_lowercase();
    if matches!(label.as_str(), "utf-8" | "utf8" | "ascii") {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        return String::from_utf8(body.to_vec())
            .map_err(|e| ReadError::Decode(format!("invalid UTF-8: {}", e.utf8_error())));
    }

    let enc = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| ReadError::Decode(format!("unsupported encoding '{}'", encoding)))?;
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(ReadError::Decode(format!("invalid {} byte sequence", enc.name())));
    }
    Ok(text.into_owned())
}

/// Detect the encoding and decode in one step.
pub fn decode_auto(bytes: &[u8]) -> ReadResult<DecodedSource> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    Ok(DecodedSource { content, encoding })
}

/// Line terminators at the start of `bytes`, counting `\r\n` once.
fn leading_terminators(bytes: &[u8]) -> (usize, usize) {
    let (mut count, mut pos) = (0, 0);
    while pos < bytes.len() {
        match bytes[pos] {
            b'\r' if bytes.get(pos + 1) == Some(&b'\n') => pos += 2,
            b'\r' | b'\n' => pos += 1,
            _ => break,
        }
        count += 1;
    }
    (count, pos)
}

/// Line terminators anywhere in `bytes`, counting `\r\n` once.
fn count_terminators(bytes: &[u8]) -> u64 {
    let mut count = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let crlf_tail = b == b'\n' && i > 0 && bytes[i - 1] == b'\r';
        if (b == b'\r' || b == b'\n') && !crlf_tail {
            count += 1;
        }
    }
    count
}

/// Lazy iterator over CSV records, one [`RawRow`] per record.
///
/// The csv reader drops empty lines; they are put back here as rows with
/// no fields, so every source record is counted.
pub struct RawRows {
    reader: Reader<Cursor<Vec<u8>>>,
    queue: VecDeque<ReadResult<RawRow>>,
    /// Line where the unconsumed input starts
    line: u64,
    /// Last consumed byte was a `\r` whose `\n` is still unread
    after_cr: bool,
    finished: bool,
}

impl RawRows {
    /// Build the iterator over decoded text and discard the first `skip` records.
    pub fn from_content(content: &str, skip: usize) -> ReadResult<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(b',')
            .from_reader(Cursor::new(content.as_bytes().to_vec()));

        let mut rows = Self {
            reader,
            queue: VecDeque::new(),
            line: 1,
            after_cr: false,
            finished: false,
        };

        for found in 0..skip {
            match rows.next() {
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Err(ReadError::TooShort { expected: skip, found }),
            }
        }
        Ok(rows)
    }

    /// Read one record and queue it behind the empty lines that preceded it.
    fn fill(&mut self) {
        let start = self.reader.position().byte() as usize;
        let mut record = StringRecord::new();
        let result = self.reader.read_record(&mut record);
        let end = self.reader.position().byte() as usize;

        let input = self.reader.get_ref().get_ref();
        let mut consumed = &input[start.min(input.len())..end.min(input.len())];
        if self.after_cr && consumed.first() == Some(&b'\n') {
            consumed = &consumed[1..];
        }
        self.after_cr = consumed.last() == Some(&b'\r');

        let (blanks, blank_len) = leading_terminators(consumed);
        for _ in 0..blanks {
            self.queue.push_back(Ok(RawRow::new(self.line, Vec::new())));
            self.line += 1;
        }
        let body = &consumed[blank_len..];

        match result {
            Ok(true) => {
                let row = RawRow::new(self.line, record.iter().map(str::to_string).collect());
                self.queue.push_back(Ok(row));
                self.line += count_terminators(body);
            }
            Ok(false) => self.finished = true,
            Err(e) => {
                self.queue.push_back(Err(ReadError::Malformed { line: self.line, message: e.to_string() }));
                self.finished = true;
            }
        }
    }
}

impl Iterator for RawRows {
    type Item = ReadResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.queue.is_empty() && !self.finished {
            self.fill();
        }
        self.queue.pop_front()
    }
}

/// Rows read from a source, with the detected encoding.
pub struct SourceRows {
    pub encoding: String,
    pub rows: RawRows,
}

/// Read bytes, decode them and return the rows after `skip` preamble records.
pub fn read_bytes(bytes: &[u8], skip: usize) -> ReadResult<SourceRows> {
    let decoded = decode_auto(bytes)?;
    let rows = RawRows::from_content(&decoded.content, skip)?;
    Ok(SourceRows { encoding: decoded.encoding, rows })
}

/// Open `path` and return the rows after `skip` preamble records.
pub fn read_file<P: AsRef<Path>>(path: P, skip: usize) -> ReadResult<SourceRows> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_bytes(&bytes, skip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(content: &str, skip: usize) -> Vec<RawRow> {
        RawRows::from_content(content, skip)
            .unwrap()
            .collect::<ReadResult<Vec<_>>>()
            .unwrap()
    }

    fn too_short(content: &str, skip: usize) -> (usize, usize) {
        match RawRows::from_content(content, skip) {
            Err(ReadError::TooShort { expected, found }) => (expected, found),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected TooShort"),
        }
    }

    #[test]
    fn test_skip_counts_records() {
        assert_eq!(collect("a\nb\nc\n", 2), vec![RawRow::new(3, vec!["c".into()])]);
        assert!(collect("a\nb", 2).is_empty());
        assert_eq!(collect("anything", 0).len(), 1);
    }

    #[test]
    fn test_too_short_preamble() {
        assert_eq!(too_short("a\nb\n", 3), (3, 2));
        assert_eq!(too_short("", 30), (30, 0));
        // Two physical lines, one record
        assert_eq!(too_short("x,\"two\nlines\"\n", 2), (2, 1));
    }

    #[test]
    fn test_rows_after_preamble() {
        let rows = collect("title\nheader\nx,y,z\n1,2\n", 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields, vec!["x", "y", "z"]);
        assert_eq!(rows[1].fields, vec!["1", "2"]);
    }

    #[test]
    fn test_line_numbers_include_preamble() {
        let rows = collect("p1\np2\np3\na,b\nc,d\n", 3);
        assert_eq!(rows[0].line, 4);
        assert_eq!(rows[1].line, 5);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let rows = collect("skip\n\"1,200\",\"say \"\"hi\"\"\"\n", 1);
        assert_eq!(rows[0].fields, vec!["1,200", "say \"hi\""]);
    }

    #[test]
    fn test_multiline_preamble_cell_counts_as_one_record() {
        let mut content: String = (1..=29).map(|i| format!("안내 {i},,\n")).collect();
        content.push_str("주의,\"가격 입력\n\",끝\n");
        content.push_str(",,,식품,사과즙,500ml,,,,,,,1200\n");
        content.push_str(",,,음료,배즙,1L,,,,,,,900\n");

        let rows = collect(&content, 30);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field(4), "사과즙");
        assert_eq!(rows[1].field(4), "배즙");
        assert_eq!(rows[0].line, 32);
    }

    #[test]
    fn test_blank_lines_are_empty_rows() {
        let rows = collect("\na\n\nb,c\n\n", 0);
        let fields: Vec<usize> = rows.iter().map(RawRow::len).collect();
        assert_eq!(fields, vec![0, 1, 0, 2, 0]);
        let lines: Vec<u64> = rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_blank_lines_with_crlf() {
        let rows = collect("a\r\n\r\nb,c\r\n", 0);
        let fields: Vec<usize> = rows.iter().map(RawRow::len).collect();
        assert_eq!(fields, vec![1, 0, 2]);
        assert_eq!(rows[2].line, 3);
    }

    #[test]
    fn test_blank_preamble_lines_are_skipped_records() {
        let rows = collect("p1\n\np3\nx,y\n", 3);
        assert_eq!(rows, vec![RawRow::new(4, vec!["x".into(), "y".into()])]);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("식품,사과즙".as_bytes());
        let decoded = decode_auto(&bytes).unwrap();
        assert_eq!(decoded.encoding, "utf-8");
        assert_eq!(decoded.content, "식품,사과즙");
    }

    #[test]
    fn test_euc_kr_decoding() {
        let (bytes, _, _) = encoding_rs::EUC_KR.encode("사과즙,식품");
        let decoded = decode_content(&bytes, "euc-kr").unwrap();
        assert_eq!(decoded, "사과즙,식품");
    }

    #[test]
    fn test_invalid_bytes_for_label() {
        // Lone lead byte is not valid EUC-KR
        let result = decode_content(&[0x41, 0xB0], "euc-kr");
        assert!(matches!(result, Err(ReadError::Decode(_))));
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let result = decode_content(&[0x66, 0xFF, 0x6F], "utf-8");
        assert!(matches!(result, Err(ReadError::Decode(_))));

        let result = decode_content(&[0x66, 0xFF], "ascii");
        assert!(matches!(result, Err(ReadError::Decode(_))));
    }

    #[test]
    fn test_unknown_label_is_decode_error() {
        let result = decode_content(b"plain", "x-no-such-charset");
        assert!(matches!(result, Err(ReadError::Decode(_))));
    }

    #[test]
    fn test_read_file_missing() {
        let result = read_file("/definitely/not/here.csv", 30);
        assert!(matches!(result, Err(ReadError::Open { .. })));
    }
}

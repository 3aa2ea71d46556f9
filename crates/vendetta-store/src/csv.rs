//! Delimited-text codec shared by all Vendetta stores.
//!
//! Each store file is a header row followed by one record per row.
//! Quoting follows the RFC 4180 convention: a field containing the
//! delimiter, a quote, or a newline is wrapped in quotes, and quotes
//! inside a quoted field are doubled. The parser works at record level
//! rather than line level, so a quoted field may legally contain
//! newlines and still round-trip.
//!
//! Writes go to a sibling temp file which is renamed into place, so a
//! crash mid-write never leaves a truncated store behind.

use std::borrow::Cow;
use std::path::Path;

use crate::error::StoreError;

/// Escape a single field for writing.
///
/// Returns the field unchanged unless it contains a comma, a quote, or
/// a line break, in which case it is quoted with internal quotes
/// doubled.
pub fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        let mut escaped = String::with_capacity(field.len().saturating_add(2));
        escaped.push('"');
        for c in field.chars() {
            if c == '"' {
                escaped.push('"');
            }
            escaped.push(c);
        }
        escaped.push('"');
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(field)
    }
}

/// Parse a whole store file into records of fields.
///
/// - Fields are separated by commas outside quotes.
/// - A quote toggles quoted mode; a doubled quote inside quoted mode is
///   a literal quote.
/// - Records are separated by newlines outside quotes (`\r\n` and `\n`
///   both accepted); newlines inside quotes belong to the field.
/// - Blank and whitespace-only rows are skipped.
///
/// The parser never fails: malformed input degrades to whatever fields
/// it can recover, and the per-store loaders decide row by row whether
/// the result is usable.
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    // Tracks whether the current record saw a comma or a quote, so a
    // whitespace-only row can be told apart from a quoted empty field.
    let mut structured = false;
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => {
                in_quotes = true;
                structured = true;
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
                structured = true;
            }
            '\r' if !in_quotes => {
                // Part of a `\r\n` record break; a stray `\r` is kept.
                if chars.peek() != Some(&'\n') {
                    field.push('\r');
                }
            }
            '\n' if !in_quotes => {
                if structured || !field.trim().is_empty() {
                    fields.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut fields));
                } else {
                    field.clear();
                }
                structured = false;
            }
            _ => field.push(c),
        }
    }

    // Final record without a trailing newline.
    if structured || !field.trim().is_empty() {
        fields.push(field);
        records.push(fields);
    }

    records
}

/// Read a store file, returning `None` when it does not exist yet.
pub fn read_file(path: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Write a header plus rows to a store file.
///
/// The content is written to a sibling `.tmp` file first and renamed
/// into place, so readers never observe a half-written store.
pub fn write_rows(path: &Path, header: &str, rows: &[String]) -> Result<(), StoreError> {
    let mut content = String::with_capacity(
        header
            .len()
            .saturating_add(rows.iter().map(|r| r.len().saturating_add(1)).sum::<usize>())
            .saturating_add(1),
    );
    content.push_str(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content).map_err(|e| StoreError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(escape("Alice"), "Alice");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn special_fields_are_quoted_with_doubled_quotes() {
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn parses_simple_rows() {
        let records = parse_records("a,b,c\n1,2,3\n");
        assert_eq!(records, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn blank_and_whitespace_rows_are_skipped() {
        let records = parse_records("a,b\n\n   \n1,2\n");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn quoted_commas_quotes_and_newlines_round_trip() {
        let tricky = ["a,b", "say \"hi\"", "two\nlines", "plain"];
        let row: Vec<String> = tricky.iter().map(|f| escape(f).into_owned()).collect();
        let text = format!("{}\n", row.join(","));
        let records = parse_records(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], tricky);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let records = parse_records("a,b\r\n1,2\r\n");
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn missing_trailing_newline_still_yields_the_last_record() {
        let records = parse_records("a,b\n1,2");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn quoted_empty_field_survives() {
        let records = parse_records("\"\",x\n");
        assert_eq!(records, vec![vec!["", "x"]]);
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        write_rows(&path, "id,name", &["1,Alice".to_owned(), "2,Bob".to_owned()]).unwrap();

        let text = read_file(&path).unwrap().unwrap();
        let records = parse_records(&text);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], vec!["id", "name"]);
        // No temp file is left behind.
        assert!(!dir.path().join("sample.tmp").exists());
    }

    #[test]
    fn reading_a_missing_file_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_file(&dir.path().join("absent.csv")).unwrap().is_none());
    }
}

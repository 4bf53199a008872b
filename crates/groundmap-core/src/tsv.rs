//! Tab-separated resources: one row per physical line.
//!
//! Quoting is off, so a `"` in a raw text is an ordinary character. A blank
//! line is a row with zero columns and fails the load like any other short
//! row. A trailing `\r` (CRLF files) is stripped from the last column.

use crate::error::{GroundingError, Result};
use std::io::Read;

/// Read every row of `reader`, handing `visit` the columns and the 1-based line.
///
/// Rows whose column count differs from `expected` stop the read.
pub(crate) fn read_rows<R, F>(
    mut reader: R,
    origin: &str,
    expected: usize,
    mut visit: F,
) -> Result<()>
where
    R: Read,
    F: FnMut(&[&str], u64) -> Result<()>,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| GroundingError::io(origin, e))?;
    let total = bytes.len() as u64;
    let ends_with_newline = bytes.last() == Some(&b'\n');

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(bytes.as_slice());

    let mut record = csv::StringRecord::new();
    loop {
        // Line the next read starts on.
        let line = rdr.position().line();
        let more = rdr
            .read_record(&mut record)
            .map_err(|e| GroundingError::csv(origin, e))?;
        let after = rdr.position();

        // The reader skips empty lines. Any newline consumed besides the
        // row's own terminator belongs to a skipped, zero-column row.
        let mut skipped = after.line() - line;
        if more && (after.byte() < total || ends_with_newline) {
            skipped -= 1;
        }
        if skipped > 0 {
            return Err(GroundingError::MalformedRow {
                origin: origin.to_string(),
                line,
                expected,
                found: 0,
            });
        }
        if !more {
            return Ok(());
        }

        let mut fields: Vec<&str> = record.iter().collect();
        if let Some(last) = fields.last_mut() {
            let value: &str = *last;
            if let Some(trimmed) = value.strip_suffix('\r') {
                *last = trimmed;
            }
        }
        if fields.len() == 1 && fields[0].is_empty() {
            fields.clear();
        }
        if fields.len() != expected {
            return Err(GroundingError::MalformedRow {
                origin: origin.to_string(),
                line,
                expected,
                found: fields.len(),
            });
        }
        visit(&fields, line)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str, expected: usize) -> Result<Vec<(u64, Vec<String>)>> {
        let mut rows = Vec::new();
        read_rows(input.as_bytes(), "inline", expected, |fields, line| {
            rows.push((line, fields.iter().map(|f| f.to_string()).collect()));
            Ok(())
        })?;
        Ok(rows)
    }

    fn malformed_at(err: GroundingError) -> (u64, usize) {
        match err {
            GroundingError::MalformedRow { line, found, .. } => (line, found),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rows_are_numbered_by_physical_line() {
        let rows = collect("a\tb\nc\td\n", 2).unwrap();
        assert_eq!(rows[0], (1, vec!["a".to_string(), "b".to_string()]));
        assert_eq!(rows[1].0, 2);
    }

    #[test]
    fn last_row_without_newline_is_read() {
        let rows = collect("a\tb\nc\td", 2).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn blank_line_is_a_zero_column_row() {
        let err = collect("a\tb\n\nc\td\n", 2).unwrap_err();
        assert_eq!(malformed_at(err), (2, 0));
    }

    #[test]
    fn trailing_blank_line_is_rejected() {
        let err = collect("a\tb\n\n", 2).unwrap_err();
        assert_eq!(malformed_at(err), (2, 0));
    }

    #[test]
    fn leading_blank_line_is_rejected() {
        let err = collect("\na\tb\n", 2).unwrap_err();
        assert_eq!(malformed_at(err), (1, 0));
    }

    #[test]
    fn quotes_are_ordinary_characters() {
        let rows = collect("\"ROS\tx\nERK\ty\n", 2).unwrap();
        assert_eq!(rows[0].1[0], "\"ROS");
        assert_eq!(rows[1].1[0], "ERK");
    }

    #[test]
    fn blank_crlf_line_is_a_zero_column_row() {
        let err = collect("a\tb\r\n\r\nc\td\r\n", 2).unwrap_err();
        assert_eq!(malformed_at(err), (2, 0));
    }

    #[test]
    fn rows_after_several_lines_keep_their_number() {
        let err = collect("a\tb\nc\td\ne\tf\ng\n", 2).unwrap_err();
        assert_eq!(malformed_at(err), (4, 1));
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let rows = collect("a\tb\r\nc\td\r\n", 2).unwrap();
        assert_eq!(rows[0].1[1], "b");
        assert_eq!(rows[1].1[1], "d");
    }
}

//! Table-of-contents input.
//!
//! A ToC file is comma-separated text with a header row and two columns,
//! timestamp then chapter title:
//!
//! ```text
//! timestamp,text
//! 0:00:00,Intro
//! 0:05:30,"Q&A, part ""one"""
//! ```
//!
//! Fields may be double-quoted; inside quotes commas and line breaks are
//! literal and `""` stands for one quote. Columns past the second are
//! ignored.

use std::path::Path;

use quietcut_common::timestamp::timestamp_to_seconds;
use quietcut_common::{Error, Result};

/// One chapter of the table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub timestamp: String,
    pub text: String,
}

/// Read and validate the ToC file at `path`.
pub fn read_toc(path: &Path) -> Result<Vec<TocEntry>> {
    let content = std::fs::read_to_string(path)?;
    parse_toc(&content)
}

/// Parse ToC text. The first record is the header and is skipped.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a row with fewer than two columns or
/// an unterminated quote, and [`Error::Format`] for a bad timestamp.
pub fn parse_toc(content: &str) -> Result<Vec<TocEntry>> {
    parse_records(content)?
        .into_iter()
        .enumerate()
        .skip(1)
        .map(|(index, mut fields)| {
            if fields.len() < 2 {
                return Err(Error::invalid_input(format!(
                    "ToC row {}: expected timestamp and text columns, got {}",
                    index + 1,
                    fields.len()
                )));
            }
            fields.truncate(2);
            let text = fields.pop().unwrap_or_default();
            let timestamp = fields.pop().unwrap_or_default().trim().to_string();
            timestamp_to_seconds(&timestamp)?;
            Ok(TocEntry { timestamp, text })
        })
        .collect()
}

fn parse_records(content: &str) -> Result<Vec<Vec<String>>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                fields.push(std::mem::take(&mut field));
                end_record(&mut records, std::mem::take(&mut fields), quoted);
                quoted = false;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::invalid_input("ToC ends inside a quoted field"));
    }
    if !field.is_empty() || !fields.is_empty() || quoted {
        fields.push(field);
        end_record(&mut records, fields, quoted);
    }

    Ok(records)
}

/// Keep a finished record unless it came from a blank line.
fn end_record(records: &mut Vec<Vec<String>>, fields: Vec<String>, quoted: bool) {
    let blank = !quoted && fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: &str, text: &str) -> TocEntry {
        TocEntry {
            timestamp: timestamp.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn parses_rows_after_header() {
        let toc = parse_toc("timestamp,text\n0:00:00,Intro\n0:05:30,Setup\n").unwrap();
        assert_eq!(toc, vec![entry("0:00:00", "Intro"), entry("0:05:30", "Setup")]);
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse_toc("timestamp,text\n").unwrap().is_empty());
        assert!(parse_toc("").unwrap().is_empty());
    }

    #[test]
    fn quoted_fields() {
        let toc = parse_toc(
            "timestamp,text\n0:01:00,\"Q&A, part \"\"one\"\"\"\n\"0:02:00\",\"two\nlines\"\n",
        )
        .unwrap();
        assert_eq!(
            toc,
            vec![
                entry("0:01:00", "Q&A, part \"one\""),
                entry("0:02:00", "two\nlines"),
            ]
        );
    }

    #[test]
    fn crlf_blank_lines_and_bom() {
        let toc = parse_toc("\u{feff}timestamp,text\r\n\r\n0:00:10,Intro\r\n\r\n").unwrap();
        assert_eq!(toc, vec![entry("0:00:10", "Intro")]);
    }

    #[test]
    fn no_trailing_newline() {
        let toc = parse_toc("timestamp,text\n0:00:10,Outro").unwrap();
        assert_eq!(toc, vec![entry("0:00:10", "Outro")]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let toc = parse_toc("timestamp,text,notes\n0:00:10,Intro,skip me\n").unwrap();
        assert_eq!(toc, vec![entry("0:00:10", "Intro")]);
    }

    #[test]
    fn missing_text_column() {
        let err = parse_toc("timestamp,text\n0:00:10\n").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn bad_timestamp() {
        let err = parse_toc("timestamp,text\n10s,Intro\n").unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn unterminated_quote() {
        let err = parse_toc("timestamp,text\n0:00:10,\"Intro\n").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toc.csv");
        std::fs::write(&path, "timestamp,text\n0:00:00,Intro\n").unwrap();

        assert_eq!(read_toc(&path).unwrap(), vec![entry("0:00:00", "Intro")]);
        assert!(read_toc(&dir.path().join("missing.csv")).is_err());
    }
}

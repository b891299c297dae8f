//! Two-pass reference tokenizer
//!
//! Reads the whole file, splits it into lines, then splits each line on
//! commas. Follows the same separator rules as the single-pass scanner
//! without quoting, so the two produce identical documents; it exists to
//! measure the scanner against.

use std::path::Path;

use super::error::ReadError;
use super::model::{Document, Row};

/// Split `content` into lines, then each line into fields
pub fn split_lines_then_fields(content: &str) -> Document {
    content
        .split_inclusive('\n')
        .map(|line| {
            let line = match line.strip_suffix('\n') {
                Some(line) => line.strip_suffix('\r').unwrap_or(line),
                None => line,
            };
            Row::from(line.split(',').map(str::to_owned).collect::<Vec<_>>())
        })
        .collect::<Vec<_>>()
        .into()
}

/// Read the file at `path` and tokenize it with [`split_lines_then_fields`]
pub fn read_two_pass(path: impl AsRef<Path>) -> Result<Document, ReadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| ReadError::io(path, e))?;
    let content = std::str::from_utf8(&bytes).map_err(|source| {
        let prefix = &bytes[..source.valid_up_to()];
        let line_start = prefix
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        ReadError::Decode {
            line: prefix.iter().filter(|&&b| b == b'\n').count() + 1,
            field: prefix[line_start..].iter().filter(|&&b| b == b',').count() + 1,
            source,
        }
    })?;
    Ok(split_lines_then_fields(content))
}

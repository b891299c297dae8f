//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::io::Write;

use customcsv::Document;
use tempfile::NamedTempFile;

/// Write `content` to a temp file that is deleted when dropped
pub fn csv_file(content: impl AsRef<[u8]>) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_ref()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Minimal writer: fields joined with `,`, rows terminated with `\n`.
/// No quoting, so only valid for fields without `,`, `\n` or a trailing `\r`.
pub fn write_minimal(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// `rows` x `fields` grid where each field names its own position
pub fn grid(rows: usize, fields: usize) -> Vec<Vec<String>> {
    (0..rows)
        .map(|r| (0..fields).map(|f| format!("r{}c{}", r, f)).collect())
        .collect()
}

/// Tokenize `content` with the `csv` crate, without headers, ragged rows allowed
pub fn reference_parse(content: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
        .records()
        .map(|record| record.expect("reference parse").iter().map(str::to_owned).collect())
        .collect()
}

/// Plain nested vectors, for comparisons against other tokenizers
pub fn as_vecs(doc: &Document) -> Vec<Vec<String>> {
    doc.to_vec()
}

/// Generated file body of `rows` lines shaped like a customer export
pub fn sample_body(rows: usize) -> String {
    let mut out = String::from("id,name,email,city,amount\n");
    for i in 0..rows {
        out.push_str(&format!(
            "{},Customer {},user{}@example.com,City {},{}.{:02}\n",
            i,
            i,
            i,
            i % 97,
            i * 7,
            i % 100
        ));
    }
    out
}

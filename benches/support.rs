//! Shared helpers for benchmarks

use std::io::Write;

use tempfile::NamedTempFile;

/// Write a customer-export style CSV with a header and `rows` data lines
#[allow(dead_code)]
pub fn sample_file(rows: usize) -> NamedTempFile {
    let mut out = String::with_capacity(rows * 64);
    out.push_str("id,name,email,city,amount\n");
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
    write_temp(out.as_bytes())
}

/// Same shape as [`sample_file`] but every text field is quoted
#[allow(dead_code)]
pub fn quoted_sample_file(rows: usize) -> NamedTempFile {
    let mut out = String::with_capacity(rows * 72);
    out.push_str("id,name,note\n");
    for i in 0..rows {
        out.push_str(&format!(
            "{},\"Customer, {}\",\"said \"\"hello\"\" on day {}\"\n",
            i,
            i,
            i % 31
        ));
    }
    write_temp(out.as_bytes())
}

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

//! customcsv - single-pass CSV file tokenizer
//!
//! This crate reads a comma-delimited text file into an ordered list of rows
//! of string fields, scanning the input once in bounded chunks instead of
//! splitting it into lines and then splitting each line.
//!
//! ```no_run
//! let doc = customcsv::read_csv_file("example.csv")?;
//! for row in &doc {
//!     println!("{}", row.fields().join(" | "));
//! }
//! # Ok::<(), customcsv::ReadError>(())
//! ```

pub mod config;
pub mod config_paths;
pub mod csv;
pub mod perf;
pub mod tracing;

// Re-export commonly used types
pub use crate::csv::{
    parse_bytes, parse_str, read_csv_file, CsvReader, Document, ErrorKind, ReadError,
    ReaderOptions, Row,
};
pub use config::CliConfig;

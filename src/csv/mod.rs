//! CSV file tokenizer
//!
//! Turns a comma-delimited text file into a [`Document`] of [`Row`]s in a
//! single left-to-right scan over a bounded read buffer.
//!
//! # Architecture
//!
//! ```text
//! read_csv_file(path)
//! └── CsvReader (ReaderOptions)
//!     ├── File, read in fixed-size chunks
//!     └── Scanner (one pass per chunk)
//!             ├── carry (field straddling a chunk boundary)
//!             ├── current row
//!             └── Document (completed rows)
//! ```
//!
//! [`baseline`] holds the naive split-lines-then-split-fields tokenizer the
//! scanner is benchmarked against.

pub mod baseline;
mod error;
mod model;
mod reader;
mod scanner;

pub use error::{ErrorKind, ReadError};
pub use model::{Document, Row};
pub use reader::{
    parse_bytes, parse_str, read_csv_file, CsvReader, ReaderOptions, DEFAULT_CHUNK_SIZE,
};
pub use scanner::{DELIMITER, QUOTE};

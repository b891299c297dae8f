//! File reader: streams a file through the scanner in fixed-size chunks

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::error::ReadError;
use super::model::Document;
use super::scanner::Scanner;

/// Default read chunk size (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Options for a [`CsvReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Bytes read from the file per refill (at least 1)
    pub chunk_size: usize,
    /// Enable RFC 4180 style quoted fields
    pub quoting: bool,
    /// Replace invalid UTF-8 with U+FFFD instead of failing
    pub lossy_utf8: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            quoting: false,
            lossy_utf8: false,
        }
    }
}

impl ReaderOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn quoting(mut self, quoting: bool) -> Self {
        self.quoting = quoting;
        self
    }

    pub fn lossy_utf8(mut self, lossy: bool) -> Self {
        self.lossy_utf8 = lossy;
        self
    }
}

/// Reads CSV documents with a fixed set of options.
///
/// Holds no state between calls, so one reader can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    options: ReaderOptions,
}

impl CsvReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Read and tokenize the file at `path`.
    ///
    /// The whole document is materialized before returning. The file handle
    /// is dropped on every exit path.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Document, ReadError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| ReadError::io(path, e))?;

        let metadata = file.metadata().map_err(|e| ReadError::io(path, e))?;
        if metadata.is_dir() {
            return Err(ReadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        // Small files get a buffer sized to fit instead of a full chunk.
        // Pipes and other special files report a length of 0.
        let chunk_size = self.options.chunk_size.max(1);
        let buf_len = match usize::try_from(metadata.len()) {
            Ok(0) | Err(_) => chunk_size,
            Ok(len) => len.saturating_add(1).min(chunk_size),
        };
        let mut buf = vec![0u8; buf_len];

        tracing::debug!(
            "Reading {} ({} bytes, chunk size {})",
            path.display(),
            metadata.len(),
            buf_len
        );

        let mut scanner = Scanner::new(self.options.quoting, self.options.lossy_utf8);
        loop {
            let n = match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReadError::io(path, e)),
            };
            tracing::trace!("Scanning chunk of {} bytes", n);
            scanner.feed(&buf[..n])?;
        }

        let bytes = scanner.bytes_scanned();
        let document = scanner.finish()?;
        tracing::debug!(
            "Parsed {} rows from {} ({} bytes)",
            document.row_count(),
            path.display(),
            bytes
        );
        Ok(document)
    }

    /// Tokenize an in-memory buffer as a single chunk
    pub fn parse_bytes(&self, input: &[u8]) -> Result<Document, ReadError> {
        let mut scanner = Scanner::new(self.options.quoting, self.options.lossy_utf8);
        scanner.feed(input)?;
        scanner.finish()
    }

    pub fn parse_str(&self, input: &str) -> Result<Document, ReadError> {
        self.parse_bytes(input.as_bytes())
    }
}

/// Read the file at `path` with default options: no quoting, strict UTF-8.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Document, ReadError> {
    CsvReader::default().read_file(path)
}

/// Tokenize an in-memory buffer with the given options
pub fn parse_bytes(input: &[u8], options: &ReaderOptions) -> Result<Document, ReadError> {
    CsvReader::new(*options).parse_bytes(input)
}

/// Tokenize a string with the given options
pub fn parse_str(input: &str, options: &ReaderOptions) -> Result<Document, ReadError> {
    CsvReader::new(*options).parse_str(input)
}

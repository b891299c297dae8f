//! Timing harness for the `bench` subcommand
//!
//! Reads one file repeatedly with each tokenizer and reports the total
//! wall-clock time per tokenizer. Results are not compared for equality.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::csv::{baseline, CsvReader, ReadError};

/// Tokenizers that can be timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tokenizer {
    /// This crate's chunked single-pass reader
    SinglePass,
    /// Read everything, split lines, split fields
    TwoPass,
    /// The `csv` crate, fully RFC 4180
    CsvCrate,
}

impl Tokenizer {
    pub const ALL: [Tokenizer; 3] = [
        Tokenizer::SinglePass,
        Tokenizer::TwoPass,
        Tokenizer::CsvCrate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tokenizer::SinglePass => "single-pass",
            Tokenizer::TwoPass => "two-pass",
            Tokenizer::CsvCrate => "csv crate",
        }
    }
}

/// Total time spent by one tokenizer over all iterations
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub tokenizer: Tokenizer,
    pub iterations: usize,
    pub total: Duration,
    /// Rows produced by the last iteration
    pub rows: usize,
}

impl Timing {
    pub fn per_read(&self) -> Duration {
        if self.iterations == 0 {
            Duration::ZERO
        } else {
            self.total / self.iterations as u32
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} time: {:.6} seconds ({} reads, {:?} per read, {} rows)",
            self.tokenizer.name(),
            self.total.as_secs_f64(),
            self.iterations,
            self.per_read(),
            self.rows
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("csv crate failed on {path}: {source}")]
    Csv { path: String, source: ::csv::Error },
}

/// Read `path` once with `tokenizer`, returning the row count
pub fn read_once(
    tokenizer: Tokenizer,
    reader: &CsvReader,
    path: &Path,
) -> Result<usize, BenchError> {
    match tokenizer {
        Tokenizer::SinglePass => Ok(reader.read_file(path)?.row_count()),
        Tokenizer::TwoPass => Ok(baseline::read_two_pass(path)?.row_count()),
        Tokenizer::CsvCrate => {
            let csv_err = |source: ::csv::Error| BenchError::Csv {
                path: path.display().to_string(),
                source,
            };
            let mut rdr = ::csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(path)
                .map_err(csv_err)?;
            let mut rows = 0;
            for record in rdr.records() {
                record.map_err(csv_err)?;
                rows += 1;
            }
            Ok(rows)
        }
    }
}

/// Time `iterations` reads of `path` with `tokenizer`
pub fn time_reads(
    tokenizer: Tokenizer,
    reader: &CsvReader,
    path: &Path,
    iterations: usize,
) -> Result<Timing, BenchError> {
    let mut rows = 0;
    let start = Instant::now();
    for _ in 0..iterations {
        rows = read_once(tokenizer, reader, path)?;
    }
    let total = start.elapsed();

    tracing::debug!(
        "{}: {} reads of {} in {:?}",
        tokenizer.name(),
        iterations,
        path.display(),
        total
    );

    Ok(Timing {
        tokenizer,
        iterations,
        total,
        rows,
    })
}

/// Time every tokenizer in [`Tokenizer::ALL`] order
pub fn compare(
    reader: &CsvReader,
    path: &Path,
    iterations: usize,
) -> Result<Vec<Timing>, BenchError> {
    Tokenizer::ALL
        .iter()
        .map(|&tokenizer| time_reads(tokenizer, reader, path, iterations))
        .collect()
}

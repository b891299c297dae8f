//! Command-line argument parsing
//!
//! Supports:
//! - Parsing a file and printing its rows
//! - Timing repeated reads against the two-pass and `csv` crate tokenizers

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use customcsv::{CliConfig, ReaderOptions};

/// A fast single-pass CSV tokenizer
#[derive(Parser, Debug)]
#[command(name = "customcsv", version, about = "A fast single-pass CSV tokenizer")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a file and print its rows
    Parse(ParseArgs),
    /// Time repeated reads of a file with each tokenizer
    Bench(BenchArgs),
}

/// Reader flags shared by every subcommand; unset flags fall back to config
#[derive(Args, Debug, Clone, Default)]
pub struct ReaderArgs {
    /// Parse RFC 4180 quoted fields
    #[arg(long)]
    pub quoted: bool,

    /// Replace invalid UTF-8 with U+FFFD instead of failing
    #[arg(long)]
    pub lossy: bool,

    /// Read buffer size in bytes
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// CSV file to read
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub reader: ReaderArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Rows)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// CSV file to read repeatedly
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub reader: ReaderArgs,

    /// Reads per tokenizer (defaults to config `bench_iterations`)
    #[arg(short = 'n', long, value_name = "N")]
    pub iterations: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per row, fields joined by " | "
    Rows,
    /// The whole document as a JSON array of arrays
    Json,
}

impl ReaderArgs {
    /// Merge flags over the config defaults
    pub fn options(&self, config: &CliConfig) -> ReaderOptions {
        config
            .reader_options()
            .with_chunk_size(self.chunk_size.unwrap_or(config.chunk_size))
            .quoting(self.quoted || config.quoting)
            .lossy_utf8(self.lossy || config.lossy_utf8)
    }
}

impl BenchArgs {
    pub fn iterations(&self, config: &CliConfig) -> usize {
        self.iterations.unwrap_or(config.bench_iterations)
    }
}

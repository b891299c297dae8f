#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

mod cli;

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;

use cli::{BenchArgs, CliArgs, Command, OutputFormat, ParseArgs};
use customcsv::{perf, CliConfig, CsvReader, Document};

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let args = CliArgs::parse();
    customcsv::tracing::init();

    let config = CliConfig::load();

    match args.command {
        Command::Parse(parse_args) => run_parse(parse_args, &config),
        Command::Bench(bench_args) => run_bench(bench_args, &config),
    }
}

fn run_parse(args: ParseArgs, config: &CliConfig) -> Result<()> {
    let reader = CsvReader::new(args.reader.options(config));
    let doc = reader
        .read_file(&args.path)
        .with_context(|| format!("Failed to parse {}", args.path.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_document(&mut out, &doc, args.format)?;
    out.flush()?;

    eprintln!(
        "{}: {} rows, {} fields (widest row {})",
        args.path.display(),
        doc.row_count(),
        doc.field_count(),
        doc.max_field_count()
    );
    Ok(())
}

fn write_document(out: &mut impl Write, doc: &Document, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Rows => {
            for row in doc {
                writeln!(out, "{}", row.fields().join(" | "))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, doc)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_bench(args: BenchArgs, config: &CliConfig) -> Result<()> {
    let reader = CsvReader::new(args.reader.options(config));
    let iterations = args.iterations(config);

    eprintln!("Bench - {} reads of {}", iterations, args.path.display());
    eprintln!("==============================================");

    let timings = perf::compare(&reader, &args.path, iterations)
        .with_context(|| format!("Failed to bench {}", args.path.display()))?;
    for timing in &timings {
        println!("{}", timing);
    }
    Ok(())
}

//! kiln-parse: Resolve JSON:API documents into nested object trees
//!
//! Every relationship identifier is replaced by the resource it points at in
//! `included`, recursively.
//!
//! Usage:
//!   # Read a document from a file, output to stdout
//!   kiln-parse response.json
//!
//!   # Read from stdin
//!   curl -s https://api.example.com/projects | kiln-parse
//!
//!   # One document per line, stop resolving below level 2
//!   kiln-parse --ndjson --max-depth 2 responses.jsonl

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use kiln::{parse_json, NodeWriter, ParseConfig, Resolver};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "kiln-parse")]
#[command(about = "Resolve JSON:API documents into nested trees", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one document per line)
    #[arg(long)]
    ndjson: bool,

    /// Deepest level to resolve, root = 1 (default: unlimited)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_depth: Option<u64>,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Pretty-print output
    #[arg(long)]
    pretty: bool,

    /// Log resolution details to stderr (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = ParseConfig::default();
    if let Some(depth) = args.max_depth {
        config.max_depth_level = Some(depth as usize);
    }

    let reader: Box<dyn BufRead> = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?;
        Box::new(BufReader::new(file))
    } else {
        Box::new(BufReader::new(std::io::stdin()))
    };

    let output: Box<dyn Write> = if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
        Box::new(std::io::BufWriter::new(file))
    } else {
        Box::new(std::io::stdout().lock())
    };
    let mut writer = NodeWriter::new(output).pretty(args.pretty);

    if args.ndjson {
        parse_json(reader, &mut writer, &config)?;
    } else {
        process_document(reader, &mut writer, config)?;
    }

    if writer.written() == 0 {
        warn!("No documents found in input");
    }

    writer.flush()
}

/// Parse the whole input as one JSON value. A top-level array is treated as a
/// list of documents.
fn process_document<W: Write>(
    mut reader: Box<dyn BufRead>,
    writer: &mut NodeWriter<W>,
    config: ParseConfig,
) -> Result<()> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content).context("Failed to read input")?;
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    let input: Value = simd_json::serde::from_slice(&mut content).context("Failed to parse JSON")?;
    let resolver = Resolver::new(config);

    match input {
        Value::Array(documents) => {
            debug!(count = documents.len(), "resolving document list");
            for document in &documents {
                writer.write_value(&resolver.parse(Some(document)))?;
            }
        }
        document => writer.write_value(&resolver.parse(Some(&document)))?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

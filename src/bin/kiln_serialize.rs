//! kiln-serialize: Project plain JSON objects into JSON:API documents
//!
//! Attributes and relationships are picked per resource type from a rule book:
//!
//!   {
//!     "posts": { "attributes": ["title"], "relationships": ["tags"] },
//!     "tags":  { "attributes": ["label"] }
//!   }
//!
//! Usage:
//!   # One object (or an array of objects) from a file
//!   kiln-serialize --rules rules.json posts.json
//!
//!   # One object per line from stdin, drop repeated included resources
//!   kiln-serialize --rules rules.json --ndjson --dedupe < posts.jsonl

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use kiln::project::{serialize_with, RuleBook};
use kiln::{NodeWriter, Processed, SerializeConfig};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "kiln-serialize")]
#[command(about = "Project JSON objects into JSON:API documents", long_about = None)]
struct Args {
    /// Rule book: resource type -> attributes and relationships
    #[arg(long, short = 'r', value_name = "RULES")]
    rules: String,

    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one source per line)
    #[arg(long)]
    ndjson: bool,

    /// Keep only the first included resource for each (type, id)
    #[arg(long)]
    dedupe: bool,

    /// Pretty-print output
    #[arg(long)]
    pretty: bool,

    /// Log projection details to stderr (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let book = RuleBook::from_path(&args.rules)?;
    let config = SerializeConfig {
        dedupe_included: args.dedupe,
    };

    let mut reader: Box<dyn BufRead> = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?;
        Box::new(BufReader::new(file))
    } else {
        Box::new(BufReader::new(std::io::stdin()))
    };

    let mut writer = NodeWriter::new(std::io::stdout().lock()).pretty(args.pretty);

    if args.ndjson {
        for (index, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read line")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let source: Value = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse JSON on line {}", index + 1))?;
            write_document(&source, &book, &config, &mut writer)?;
        }
    } else {
        let mut content = Vec::new();
        reader.read_to_end(&mut content).context("Failed to read input")?;
        if !content.iter().all(u8::is_ascii_whitespace) {
            let source: Value =
                simd_json::serde::from_slice(&mut content).context("Failed to parse JSON")?;
            write_document(&source, &book, &config, &mut writer)?;
        }
    }

    if writer.written() == 0 {
        warn!("No JSON objects found in input");
    }

    writer.flush()
}

/// Project one source value. An array becomes a document with array `data`,
/// each element serialized with the rules of its own type.
fn write_document<W: Write>(
    source: &Value,
    book: &RuleBook,
    config: &SerializeConfig,
    writer: &mut NodeWriter<W>,
) -> Result<()> {
    let processed = match source {
        Value::Array(items) => {
            debug!(count = items.len(), "projecting source list");
            Processed::concat(items.iter().map(|item| project(item, book)))
        }
        item => project(item, book),
    };

    writer.write_value(&processed.finish(config))
}

fn project(item: &Value, book: &RuleBook) -> Processed {
    if book.resource(item).is_none() {
        let kind = item.get("type").and_then(Value::as_str);
        warn!(?kind, "no rules for source type, emitting id and type only");
    }
    serialize_with(book, item)
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

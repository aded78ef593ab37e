//! # Kiln - JSON:API Document Toolkit
//!
//! Converts between normalized resource documents (primary `data` plus a flat
//! `included` side-table) and fully nested object trees.
//!
//! ## Modules
//!
//! - **resolve**: inline related resources from `included` into a nested tree
//! - **project**: turn domain objects into normalized documents via rule sets
//!
//! ## Quick Start
//!
//! ### Resolving a document
//!
//! ```rust
//! use kiln::{parse, ParseConfig};
//! use serde_json::json;
//!
//! let document = json!({
//!     "data": {
//!         "type": "tasklists", "id": "1",
//!         "relationships": {"tasks": {"data": [{"type": "tasks", "id": "1"}]}}
//!     },
//!     "included": [{"type": "tasks", "id": "1", "attributes": {"name": "Test 1"}}]
//! });
//!
//! let parsed = parse(Some(&document), &ParseConfig::default());
//! assert_eq!(parsed["tasks"][0]["attributes"]["name"], "Test 1");
//! ```
//!
//! ### Projecting objects
//!
//! ```rust
//! use kiln::project::{SerializationRules, Serializer};
//! use serde_json::json;
//!
//! let user = json!({"id": 1, "type": "user", "name": "Krisz", "roles": ["ADMIN"]});
//! let rules = SerializationRules::new()
//!     .attribute("name")
//!     .computed("admin", |u: &serde_json::Value| json!(u["roles"][0] == "ADMIN"));
//!
//! let document = Serializer::new(rules).with_data(&user).to_processed()?;
//! assert_eq!(document.data["attributes"]["admin"], true);
//! # Ok::<(), kiln::Error>(())
//! ```

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{BufRead, Write};

pub mod error;
pub mod project;
pub mod resolve;
pub mod types;
pub mod writer;

// Re-export commonly used types for convenience
pub use error::Error;
pub use project::{Processed, Resource, Serializable, SerializationRules, Serializer, Source};
pub use resolve::{clone, parse, Resolver};
pub use types::{KeyPart, ParseConfig, ParsedNode, ResourceKey, SerializeConfig};
pub use writer::NodeWriter;

/// Resolve a stream of newline-delimited documents, writing one tree per line
pub fn parse_json<R: BufRead, W: Write>(
    reader: R,
    writer: &mut NodeWriter<W>,
    config: &ParseConfig,
) -> Result<()> {
    let resolver = Resolver::new(config.clone());

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let document: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", index + 1))?;

        let parsed = resolver.parse(Some(&document));
        writer.write_value(&parsed)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_stream() {
        let input = concat!(
            r#"{"data":{"type":"a","id":"1","relationships":{"b":{"data":{"type":"b","id":"1"}}}},"included":[{"type":"b","id":"1"}]}"#,
            "\n\n",
            r#"{"data":null}"#,
            "\n",
        );

        let mut writer = NodeWriter::new(Vec::new());
        parse_json(input.as_bytes(), &mut writer, &ParseConfig::default()).unwrap();
        assert_eq!(writer.written(), 2);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"id":"1","type":"a","attributes":{},"b":{"id":"1","type":"b","attributes":{}}}"#,
                "{}"
            ]
        );
    }

    #[test]
    fn test_parse_json_reports_bad_line() {
        let mut writer = NodeWriter::new(Vec::new());
        let err = parse_json("{}\nnot json\n".as_bytes(), &mut writer, &ParseConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}

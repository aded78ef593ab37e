use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// Writes parsed trees or documents as JSON, one value per line
pub struct NodeWriter<W: Write> {
    writer: W,
    pretty: bool,
    written: usize,
}

impl<W: Write> NodeWriter<W> {
    pub fn new(writer: W) -> Self {
        NodeWriter {
            writer,
            pretty: false,
            written: 0,
        }
    }

    /// Pretty-print values instead of one compact line each
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .context("Failed to serialize value")?;

        writeln!(self.writer, "{}", json).context("Failed to write value")?;
        self.written += 1;
        Ok(())
    }

    pub fn write_values<'v, T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        for value in values {
            self.write_value(value)?;
        }
        Ok(())
    }

    /// Number of values written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

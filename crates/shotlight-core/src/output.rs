//! Reading and writing boundary records as JSON or JSON Lines.
//!
//! Shot descriptions, tagging output, and validation output all persist as
//! one serde record per line (JSONL) or as a single JSON array.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Write records to a writer in the given format.
///
/// JSON writes one array (optionally pretty-printed); JSONL writes one
/// object per line and is never pretty-printed.
pub fn write_records<W: Write, T: Serialize>(
    writer: &mut W,
    records: &[T],
    format: OutputFormat,
    pretty: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut *writer, records).map_err(io::Error::other)?;
            } else {
                serde_json::to_writer(&mut *writer, records).map_err(io::Error::other)?;
            }
            writeln!(writer)?;
        }
        OutputFormat::JsonLines => {
            for record in records {
                serde_json::to_writer(&mut *writer, record).map_err(io::Error::other)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()
}

/// Write records to a file, creating or truncating it.
pub fn write_records_to_path<T: Serialize>(
    path: &Path,
    records: &[T],
    format: OutputFormat,
    pretty: bool,
) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    write_records(&mut writer, records, format, pretty)
}

/// Read records from a file, accepting either format.
///
/// A file starting with `[` is parsed as one JSON array; anything else is
/// read line by line as JSONL (blank lines skipped).
pub fn read_records<T: DeserializeOwned>(path: &Path) -> io::Result<Vec<T>> {
    let content = std::fs::read_to_string(path)?;
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content).map_err(io::Error::other);
    }

    let mut records = Vec::new();
    for line in content.as_bytes().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line).map_err(io::Error::other)?);
    }
    Ok(records)
}

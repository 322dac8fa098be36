//! Transcript JSONL reader
//!
//! Loads a Claude Code session transcript as a list of JSON values so it can
//! ride along with an event as `chat`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to read transcript {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read every decodable line of a transcript file, in file order.
///
/// Blank lines and lines that are not valid JSON are skipped without notice.
/// Only a failure to read the file as a whole is an error.
pub fn load_chat(path: &Path) -> Result<Vec<Value>, TranscriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| TranscriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_lines(&content))
}

fn parse_lines(content: &str) -> Vec<Value> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

//! Input loading and result persistence.
//!
//! Work items are loaded once, before any trial begins, and held read-only
//! for the whole run. Two input shapes are supported: a line-oriented text
//! file and a JSON array of HTML-document strings. The only output file is
//! the JSON array of per-item results from a sweep's final configuration.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{BenchError, Result};

/// Load a line-oriented text file into one work item per line.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| BenchError::Input {
        path: path.to_path_buf(),
        source: e,
    })?;

    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|e| BenchError::Input {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!(path = %path.display(), lines = lines.len(), "loaded line input");
    Ok(lines)
}

/// Load a JSON file containing an array of HTML-document strings.
pub fn load_documents(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| BenchError::Input {
        path: path.to_path_buf(),
        source: e,
    })?;

    let documents: Vec<String> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| BenchError::MalformedInput {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!(path = %path.display(), documents = documents.len(), "loaded document input");
    Ok(documents)
}

/// Write per-item results as a JSON array.
pub fn write_results(path: &Path, results: &[Value]) -> Result<()> {
    let file = File::create(path).map_err(|e| BenchError::Output {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::to_writer(BufWriter::new(file), results).map_err(|e| BenchError::Output {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    info!(path = %path.display(), results = results.len(), "wrote result file");
    Ok(())
}

//! History file persistence (history.json).

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::paths;

use super::HistoryEntry;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct HistoryFile {
    #[serde(default)]
    pub(super) entries: Vec<HistoryEntry>,
}

fn history_path() -> io::Result<PathBuf> {
    paths::history_path().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No data directory"))
}

/// Load the history file. Returns an empty history when no data dir or file not found (first run).
/// Propagates IO errors (permission, disk) and JSON parse errors.
pub(super) fn load() -> io::Result<HistoryFile> {
    let path = match paths::history_path() {
        Some(p) => p,
        None => return Ok(HistoryFile::default()),
    };
    let data = match fs::read_to_string(&path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HistoryFile::default()),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub(super) fn save(file: &HistoryFile) -> io::Result<()> {
    let path = history_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(file)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

//! Bounded history of past conversions in ~/.local/share/glyphfix/history.json.
//!
//! Only conversions that substituted at least one character are recorded. Newest first.

mod storage;

use std::io;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source label for input read from stdin.
pub const STDIN_SOURCE: &str = "<stdin>";

/// One recorded conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    /// File path or `<stdin>`.
    pub source: String,
    /// Selector used; `None` for plain-text conversions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub count: usize,
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_else(|e| {
            log::warn!("System time before UNIX epoch: {}", e);
            0
        })
}

/// Keep at most `max` entries (newest first). `max == 0` keeps everything.
/// Returns the number of entries dropped.
pub fn trim(entries: &mut Vec<HistoryEntry>, max: usize) -> usize {
    if max == 0 || entries.len() <= max {
        return 0;
    }
    entries.drain(max..).count()
}

/// Record a conversion. Zero-count conversions are not recorded and return `None`.
pub fn record(
    source: &str,
    selector: Option<&str>,
    count: usize,
    max_history: usize,
) -> io::Result<Option<HistoryEntry>> {
    if count == 0 {
        log::debug!("Not recording {}: nothing converted", source);
        return Ok(None);
    }

    let entry = HistoryEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: now_secs(),
        source: source.to_string(),
        selector: selector.map(String::from),
        count,
    };

    let mut file = storage::load()?;
    file.entries.insert(0, entry.clone());
    let dropped = trim(&mut file.entries, max_history);
    if dropped > 0 {
        log::debug!("Dropped {} old history entr(ies)", dropped);
    }
    storage::save(&file)?;
    Ok(Some(entry))
}

/// List recorded conversions, newest first.
pub fn list() -> io::Result<Vec<HistoryEntry>> {
    let mut file = storage::load()?;
    file.entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(file.entries)
}

/// Remove all entries. Returns how many were removed.
pub fn clear() -> io::Result<usize> {
    let file = storage::load()?;
    let removed = file.entries.len();
    if removed > 0 {
        storage::save(&storage::HistoryFile::default())?;
    }
    Ok(removed)
}

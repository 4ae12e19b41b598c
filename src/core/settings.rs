//! Persisted user settings: character map, target selector, and history bound.
//!
//! Stored as `settings.json` in the config directory. A missing file means defaults.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::charmap::{ConversionMap, MapError};
use crate::core::document;
use crate::core::paths;

/// Selector used when none is configured.
pub const DEFAULT_SELECTOR: &str = "body";

/// Number of history entries kept by default.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Environment variable overriding the configured selector.
pub const SELECTOR_ENV: &str = "GLYPHFIX_SELECTOR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub map: ConversionMap,
    pub selector: String,
    /// Maximum history entries; 0 keeps everything.
    pub max_history: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            map: ConversionMap::defaults(),
            selector: DEFAULT_SELECTOR.to_string(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid JSON in settings file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid character map entry: {0}")]
    Map(#[from] MapError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("No config directory available")]
    NoConfigDir,
}

/// JSON structure on disk.
#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default = "default_map_entries")]
    map: BTreeMap<String, String>,
    #[serde(default = "default_selector")]
    selector: String,
    #[serde(default = "default_max_history")]
    max_history: usize,
}

fn default_map_entries() -> BTreeMap<String, String> {
    to_entries(&ConversionMap::defaults())
}

fn default_selector() -> String {
    DEFAULT_SELECTOR.to_string()
}

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

fn to_entries(map: &ConversionMap) -> BTreeMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Settings {
    /// Apply environment overrides (`GLYPHFIX_SELECTOR`). Blank values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(sel) = env::var(SELECTOR_ENV)
            && !sel.trim().is_empty()
        {
            log::debug!("Selector overridden by {}: {}", SELECTOR_ENV, sel);
            self.selector = sel;
        }
        self
    }

    fn validate(file: SettingsFile) -> Result<Settings, SettingsError> {
        let map = ConversionMap::from_strings(&file.map)?;
        document::parse_selector(&file.selector)
            .map_err(|e| SettingsError::Validation(e.to_string()))?;
        let chained = map.chained_replacements();
        if !chained.is_empty() {
            log::warn!(
                "Character map replacements {:?} are also sources; repeated conversions will keep changing text",
                chained
            );
        }
        Ok(Settings {
            map,
            selector: file.selector,
            max_history: file.max_history,
        })
    }
}

/// Load settings from the config directory. Returns defaults when the file is absent.
pub fn load() -> Result<Settings, SettingsError> {
    match paths::settings_path() {
        Some(path) => load_from(&path),
        None => Ok(Settings::default()),
    }
}

/// Load settings from `path`. Returns defaults when the file does not exist.
pub fn load_from(path: &Path) -> Result<Settings, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e.into()),
    };
    let file: SettingsFile = serde_json::from_str(&content)?;
    Settings::validate(file)
}

/// Save settings to the config directory. Creates the directory if needed.
pub fn save(settings: &Settings) -> Result<(), SettingsError> {
    let path = paths::settings_path().ok_or(SettingsError::NoConfigDir)?;
    save_to(&path, settings)
}

/// Save settings to `path` atomically (write temp file, then rename).
pub fn save_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = SettingsFile {
        map: to_entries(&settings.map),
        selector: settings.selector.clone(),
        max_history: settings.max_history,
    };
    let json = serde_json::to_string_pretty(&file)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let settings = load_from(&tmp.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.map.insert('\u{FF0E}', '.');
        settings.map.remove('\u{2044}');
        settings.selector = "article .content".to_string();
        settings.max_history = 5;

        save_to(&path, &settings).expect("save");
        assert!(!path.with_extension("tmp").exists());
        let loaded = load_from(&path).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, r#"{"selector": "main"}"#).unwrap();
        let settings = load_from(&path).unwrap();
        assert_eq!(settings.selector, "main");
        assert_eq!(settings.map, ConversionMap::defaults());
        assert_eq!(settings.max_history, DEFAULT_MAX_HISTORY);
    }

    #[test]
    fn empty_map_is_preserved() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, r#"{"map": {}}"#).unwrap();
        let settings = load_from(&path).unwrap();
        assert!(settings.map.is_empty());
    }

    #[test]
    fn multi_char_entry_is_rejected() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, r#"{"map": {"ab": ":"}}"#).unwrap();
        assert!(matches!(load_from(&path), Err(SettingsError::Map(_))));
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, r#"{"selector": "div >"}"#).unwrap();
        assert!(matches!(load_from(&path), Err(SettingsError::Validation(_))));
    }

    #[test]
    fn invalid_json_is_rejected() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, "not json {{").unwrap();
        assert!(matches!(load_from(&path), Err(SettingsError::Json(_))));
    }
}

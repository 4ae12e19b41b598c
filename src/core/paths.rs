//! Centralized path helpers for config and data directories.

use std::path::PathBuf;

use crate::core::app;

/// Project directories (config, data) from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Override directories for tests via env vars (`TEST_CONFIG_DIR`, `TEST_DATA_DIR`).
#[cfg(test)]
fn test_dir_override(var: &str) -> Option<PathBuf> {
    std::env::var(var).ok().map(PathBuf::from)
}

/// Config directory holding settings.json (~/.config/glyphfix/).
/// In tests, set `TEST_CONFIG_DIR` env var to override.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(test)]
    if let Some(p) = test_dir_override("TEST_CONFIG_DIR") {
        return Some(p);
    }
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Data directory holding history.json (~/.local/share/glyphfix/).
/// In tests, set `TEST_DATA_DIR` env var to override.
pub fn data_dir() -> Option<PathBuf> {
    #[cfg(test)]
    if let Some(p) = test_dir_override("TEST_DATA_DIR") {
        return Some(p);
    }
    project_dirs().map(|d| d.data_dir().to_path_buf())
}

/// Path to the persisted settings file.
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("settings.json"))
}

/// Path to the persisted conversion history.
pub fn history_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("history.json"))
}

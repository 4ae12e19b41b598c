//! CLI-only commands: config info, map editing, selector, history.
//!
//! These produce plain text output on stdout; errors are returned to `main`.

use std::error::Error;

use crate::core::app;
use crate::core::charmap::{self, ConversionMap};
use crate::core::document;
use crate::core::history;
use crate::core::paths;
use crate::core::settings::{self, SELECTOR_ENV};

type CmdResult = Result<(), Box<dyn Error>>;

fn display_path(path: Option<std::path::PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Run the `config` command: display paths and current settings.
pub fn run_config() -> CmdResult {
    let settings_file = paths::settings_path();
    let exists = settings_file.as_ref().is_some_and(|p| p.exists());
    let settings = settings::load()?.with_env_overrides();

    println!("Version:      {} {}", app::NAME, app::VERSION);
    println!("Settings:     {}", display_path(settings_file));
    println!("History:      {}", display_path(paths::history_path()));
    println!(
        "Source:       {}",
        if exists { "settings.json" } else { "defaults" }
    );
    println!(
        "Selector:     {}{}",
        settings.selector,
        if std::env::var(SELECTOR_ENV).is_ok_and(|s| !s.trim().is_empty()) {
            format!(" (from {})", SELECTOR_ENV)
        } else {
            String::new()
        }
    );
    println!("Map entries:  {}", settings.map.len());
    println!(
        "Max history:  {}",
        match settings.max_history {
            0 => "unbounded".to_string(),
            n => n.to_string(),
        }
    );
    Ok(())
}

/// Format map entries as aligned lines, e.g. `U+02F8 '˸'  ->  U+003A ':'`.
pub fn format_map(map: &ConversionMap) -> Vec<String> {
    let sources: Vec<String> = map.keys().map(charmap::describe).collect();
    let width = sources.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    sources
        .into_iter()
        .zip(map.iter())
        .map(|(src, (_, replacement))| {
            format!(
                "{:<width$}  ->  {}",
                src,
                charmap::describe(replacement),
                width = width
            )
        })
        .collect()
}

/// Run `map list`.
pub fn run_map_list() -> CmdResult {
    let settings = settings::load()?;
    if settings.map.is_empty() {
        println!("Character map is empty.");
        return Ok(());
    }
    for line in format_map(&settings.map) {
        println!("{}", line);
    }
    Ok(())
}

/// Run `map set SOURCE REPLACEMENT`.
pub fn run_map_set(source: &str, replacement: &str) -> CmdResult {
    let source = charmap::parse_char("source", source)?;
    let replacement = charmap::parse_char("replacement", replacement)?;
    if source == replacement {
        return Err(format!("{} maps to itself", charmap::describe(source)).into());
    }

    let mut settings = settings::load()?;
    let previous = settings.map.insert(source, replacement);
    if settings.map.get(replacement).is_some() {
        log::warn!(
            "{} is also a source character; converted text will change again on the next pass",
            charmap::describe(replacement)
        );
    }
    settings::save(&settings)?;
    match previous {
        Some(old) => println!(
            "Updated {}: {} -> {}",
            charmap::describe(source),
            charmap::describe(old),
            charmap::describe(replacement)
        ),
        None => println!(
            "Added {} -> {}",
            charmap::describe(source),
            charmap::describe(replacement)
        ),
    }
    Ok(())
}

/// Run `map remove SOURCE`.
pub fn run_map_remove(source: &str) -> CmdResult {
    let source = charmap::parse_char("source", source)?;
    let mut settings = settings::load()?;
    if settings.map.remove(source).is_none() {
        return Err(format!("{} is not in the character map", charmap::describe(source)).into());
    }
    settings::save(&settings)?;
    println!("Removed {}", charmap::describe(source));
    Ok(())
}

/// Run `map reset`: restore the built-in map, keeping other settings.
pub fn run_map_reset() -> CmdResult {
    let mut settings = settings::load()?;
    settings.map = ConversionMap::defaults();
    settings::save(&settings)?;
    println!("Character map reset ({} entries)", settings.map.len());
    Ok(())
}

/// Run `selector [NEW]`: print or validate and store the default selector.
pub fn run_selector(new: Option<&str>) -> CmdResult {
    let mut settings = settings::load()?;
    let Some(new) = new else {
        println!("{}", settings.selector);
        return Ok(());
    };
    document::parse_selector(new)?;
    settings.selector = new.trim().to_string();
    settings::save(&settings)?;
    println!("Selector set to {}", settings.selector);
    Ok(())
}

/// Run `history list`.
pub fn run_history_list(limit: Option<usize>) -> CmdResult {
    let entries = history::list()?;
    if entries.is_empty() {
        println!("No conversions recorded.");
        return Ok(());
    }
    let take = limit.unwrap_or(entries.len());
    for e in entries.into_iter().take(take) {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            format_timestamp(e.timestamp),
            e.count,
            e.source,
            e.selector.as_deref().unwrap_or("(text)"),
            e.id
        );
    }
    Ok(())
}

/// Run `history clear`.
pub fn run_history_clear() -> CmdResult {
    let removed = history::clear()?;
    println!("Removed {} history entr{}", removed, if removed == 1 { "y" } else { "ies" });
    Ok(())
}

fn format_timestamp(secs: u64) -> String {
    use chrono::{TimeZone, Utc};
    let dt = Utc.timestamp_opt(secs as i64, 0).single();
    dt.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_map_aligns_arrows() {
        let lines = format_map(&ConversionMap::defaults());
        assert_eq!(
            lines,
            vec![
                "U+02F8 '˸'  ->  U+003A ':'",
                "U+2024 '․'  ->  U+002E '.'",
                "U+2044 '⁄'  ->  U+002F '/'",
            ]
        );
    }

    #[test]
    fn format_map_empty() {
        assert!(format_map(&ConversionMap::new()).is_empty());
    }

    #[test]
    fn format_timestamp_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
    }
}

//! Character map: look-alike source characters and their replacements.

use std::collections::BTreeMap;

/// Look-alikes converted out of the box: modifier letter colon, one dot leader, fraction slash.
pub const DEFAULT_ENTRIES: &[(char, char)] = &[
    ('\u{02F8}', ':'),
    ('\u{2024}', '.'),
    ('\u{2044}', '/'),
];

/// Error building a map entry from user input.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("{field} must be exactly one character, got {value:?}")]
    NotSingleChar { field: &'static str, value: String },
    #[error("Invalid code point: {0}")]
    InvalidCodePoint(String),
}

/// Mapping from one source character to one replacement character.
/// Ordered by code point so listings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionMap {
    entries: BTreeMap<char, char>,
}

impl ConversionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in look-alike map.
    pub fn defaults() -> Self {
        DEFAULT_ENTRIES.iter().copied().collect()
    }

    /// Build a map from string pairs, rejecting anything that is not a single character.
    pub fn from_strings<I, K, V>(pairs: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::new();
        for (k, v) in pairs {
            let source = single_char("source", k.as_ref())?;
            let replacement = single_char("replacement", v.as_ref())?;
            map.insert(source, replacement);
        }
        Ok(map)
    }

    /// Insert or overwrite an entry. Returns the previous replacement, if any.
    pub fn insert(&mut self, source: char, replacement: char) -> Option<char> {
        self.entries.insert(source, replacement)
    }

    pub fn remove(&mut self, source: char) -> Option<char> {
        self.entries.remove(&source)
    }

    pub fn get(&self, source: char) -> Option<char> {
        self.entries.get(&source).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.keys().copied()
    }

    /// Replacements that are themselves keys. A second pass over converted text
    /// would convert these again.
    pub fn chained_replacements(&self) -> Vec<char> {
        self.entries
            .values()
            .copied()
            .filter(|v| self.entries.contains_key(v))
            .collect()
    }
}

impl FromIterator<(char, char)> for ConversionMap {
    fn from_iter<T: IntoIterator<Item = (char, char)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Require `value` to be exactly one character.
pub fn single_char(field: &'static str, value: &str) -> Result<char, MapError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(MapError::NotSingleChar {
            field,
            value: value.to_string(),
        }),
    }
}

/// Parse a character given either literally ("˸") or in `U+02F8` notation.
pub fn parse_char(field: &'static str, input: &str) -> Result<char, MapError> {
    let hex = input
        .strip_prefix("U+")
        .or_else(|| input.strip_prefix("u+"))
        .filter(|rest| !rest.is_empty());
    match hex {
        Some(hex) => u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| MapError::InvalidCodePoint(input.to_string())),
        None => single_char(field, input),
    }
}

/// Human-readable form, e.g. `U+02F8 '˸'`.
pub fn describe(c: char) -> String {
    if c.is_control() || c.is_whitespace() {
        format!("U+{:04X}", c as u32)
    } else {
        format!("U+{:04X} '{}'", c as u32, c)
    }
}

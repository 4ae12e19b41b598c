//! Compiled character-class matcher built from a map's source characters.

use regex::Regex;

use super::charmap::ConversionMap;

/// Recognizes any one of a set of source characters.
///
/// Holds no regex when the set is empty, so an empty map matches nothing
/// instead of producing an invalid `[]` class.
#[derive(Debug, Clone)]
pub struct Matcher {
    re: Option<Regex>,
}

impl Matcher {
    /// Build a matcher for the keys of `map`. Every key is escaped and treated literally.
    pub fn new(map: &ConversionMap) -> Result<Self, regex::Error> {
        if map.is_empty() {
            return Ok(Self { re: None });
        }
        let class: String = map
            .keys()
            .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
            .collect();
        let pattern = format!("[{}]", class);
        let re = Regex::new(&pattern)?;
        Ok(Self { re: Some(re) })
    }

    /// True when the matcher can never match.
    pub fn is_empty(&self) -> bool {
        self.re.is_none()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// All matches in `text`, left to right.
    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = regex::Match<'t>> + 't {
        self.re.iter().flat_map(move |re| re.find_iter(text))
    }

    /// The compiled pattern, if any.
    pub fn as_str(&self) -> Option<&str> {
        self.re.as_ref().map(|re| re.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_matches_nothing() {
        let m = Matcher::new(&ConversionMap::new()).unwrap();
        assert!(m.is_empty());
        assert!(!m.is_match(""));
        assert!(!m.is_match("anything at all"));
        assert_eq!(m.find_iter("abc").count(), 0);
    }

    #[test]
    fn matches_exactly_the_key_set() {
        let m = Matcher::new(&ConversionMap::defaults()).unwrap();
        assert!(m.is_match("a\u{02F8}b"));
        assert!(m.is_match("\u{2044}"));
        assert!(!m.is_match("a:b./"));
        let found: Vec<&str> = m
            .find_iter("x\u{02F8}y\u{2024}z\u{2044}")
            .map(|mt| mt.as_str())
            .collect();
        assert_eq!(found, vec!["\u{02F8}", "\u{2024}", "\u{2044}"]);
    }

    #[test]
    fn metacharacter_keys_are_literal() {
        let map: ConversionMap = [(']', ')'), ('^', 'v'), ('-', '_'), ('\\', '/'), ('[', '(')]
            .into_iter()
            .collect();
        let m = Matcher::new(&map).unwrap();
        assert!(!m.is_empty());
        for c in [']', '^', '-', '\\', '['] {
            assert!(m.is_match(&c.to_string()), "expected {:?} to match", c);
        }
        // A range like `[-^]` would match these if keys were not escaped.
        assert!(!m.is_match("ABCabc_"));
    }

    #[test]
    fn astral_and_whitespace_keys_compile() {
        let map: ConversionMap = [('\u{1D7CE}', '0'), ('\u{00A0}', ' '), ('#', 'h')]
            .into_iter()
            .collect();
        let m = Matcher::new(&map).expect("escaped class compiles");
        assert!(m.is_match("x\u{1D7CE}"));
        assert!(m.is_match("\u{00A0}"));
        assert!(m.is_match("#"));
        assert!(!m.is_match("0 h"));
    }

    #[test]
    fn dot_key_matches_only_dot() {
        let map: ConversionMap = [('.', '\u{2024}')].into_iter().collect();
        let m = Matcher::new(&map).unwrap();
        assert!(m.is_match("."));
        assert!(!m.is_match("x"));
    }
}

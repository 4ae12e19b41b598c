//! Conversion pass over an HTML document: resolve roots by selector, convert each, sum counts.

use std::borrow::Cow;

use ego_tree::NodeId;
use scraper::{Html, Selector};

use super::charmap::ConversionMap;
use super::convert;
use super::matcher::Matcher;

/// How the input HTML is parsed and serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlMode {
    /// Full document; `<html>`, `<head>` and `<body>` are implied when absent.
    #[default]
    Document,
    /// Body fragment; serialized without the implied wrapper elements.
    Fragment,
}

/// Outcome of one conversion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionResult {
    /// Characters substituted across all roots.
    pub count: usize,
    /// Whether the selector matched at least one element.
    pub matched: bool,
}

impl ConversionResult {
    /// Combine results from several inputs.
    pub fn merge(self, other: ConversionResult) -> ConversionResult {
        ConversionResult {
            count: self.count + other.count,
            matched: self.matched || other.matched,
        }
    }
}

/// A converted document. `html` is `None` when no character was substituted,
/// in which case the input should be used unchanged.
#[derive(Debug, Clone)]
pub struct DocumentConversion {
    pub result: ConversionResult,
    pub html: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("Failed to compile character class: {0}")]
    Pattern(#[from] regex::Error),
}

/// Parse a CSS selector, rejecting blank input.
pub fn parse_selector(selector: &str) -> Result<Selector, ConvertError> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(ConvertError::InvalidSelector {
            selector: selector.to_string(),
            reason: "selector is empty".to_string(),
        });
    }
    Selector::parse(trimmed).map_err(|e| ConvertError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// A fragment has no `<body>` element; `body` there means the fragment root.
fn targets_fragment_body(selector: &str) -> bool {
    selector.trim().eq_ignore_ascii_case("body")
}

/// Convert the subtrees rooted at `roots`. The matcher is built once per pass.
fn convert_roots(
    doc: &mut Html,
    roots: Vec<NodeId>,
    map: &ConversionMap,
) -> Result<ConversionResult, ConvertError> {
    if roots.is_empty() {
        return Ok(ConversionResult::default());
    }

    let matcher = Matcher::new(map)?;
    log::debug!("{} root(s), pattern {:?}", roots.len(), matcher.as_str());
    let mut count = 0;
    for root in roots {
        let n = convert::convert_element(doc, root, map, &matcher);
        log::trace!("Root {:?}: {} substitution(s)", root, n);
        count += n;
    }
    Ok(ConversionResult {
        count,
        matched: true,
    })
}

/// Convert every element of `doc` matched by `selector`.
pub fn convert_document(
    doc: &mut Html,
    selector: &Selector,
    map: &ConversionMap,
) -> Result<ConversionResult, ConvertError> {
    let roots: Vec<NodeId> = doc.select(selector).map(|el| el.id()).collect();
    convert_roots(doc, roots, map)
}

/// Parse `input`, convert the elements matched by `selector`, and serialize the result.
pub fn convert_html(
    input: &str,
    selector: &str,
    map: &ConversionMap,
    mode: HtmlMode,
) -> Result<DocumentConversion, ConvertError> {
    let parsed = parse_selector(selector)?;
    let mut doc = match mode {
        HtmlMode::Document => Html::parse_document(input),
        HtmlMode::Fragment => Html::parse_fragment(input),
    };
    for err in &doc.errors {
        log::debug!("HTML parse: {}", err);
    }

    let result = if mode == HtmlMode::Fragment && targets_fragment_body(selector) {
        let root = doc.root_element().id();
        convert_roots(&mut doc, vec![root], map)?
    } else {
        convert_document(&mut doc, &parsed, map)?
    };
    let html = (result.count > 0).then(|| match mode {
        HtmlMode::Document => doc.html(),
        HtmlMode::Fragment => doc.root_element().inner_html(),
    });
    Ok(DocumentConversion { result, html })
}

/// Convert raw text without any markup handling.
pub fn convert_text<'a>(
    input: &'a str,
    map: &ConversionMap,
) -> Result<(Cow<'a, str>, usize), ConvertError> {
    let matcher = Matcher::new(map)?;
    Ok(convert::replace_text(input, map, &matcher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::DEFAULT_SELECTOR;

    #[test]
    fn converts_selected_elements_only() {
        let input = "<main><p class=\"t\">a\u{02F8}b</p></main><p>c\u{02F8}d</p>";
        let conv =
            convert_html(input, "p.t", &ConversionMap::defaults(), HtmlMode::Fragment).unwrap();
        assert_eq!(conv.result, ConversionResult { count: 1, matched: true });
        let out = conv.html.as_deref().unwrap_or(input);
        assert!(out.contains("<p class=\"t\">a:b</p>"), "{}", out);
        assert!(out.contains("c\u{02F8}d"), "{}", out);
    }

    #[test]
    fn sums_counts_across_roots() {
        let input = "<ul><li>1\u{2024}</li><li>2\u{2024}<b>\u{2044}</b></li><li>3</li></ul>";
        let conv =
            convert_html(input, "li", &ConversionMap::defaults(), HtmlMode::Fragment).unwrap();
        assert_eq!(conv.result.count, 3);
        assert!(conv.result.matched);
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let err = convert_html("<p>x</p>", "p[", &ConversionMap::defaults(), HtmlMode::Document)
            .unwrap_err();
        match err {
            ConvertError::InvalidSelector { selector, .. } => assert_eq!(selector, "p["),
            other => panic!("expected InvalidSelector, got {:?}", other),
        }
    }

    #[test]
    fn blank_selector_is_an_error() {
        assert!(parse_selector("   ").is_err());
        assert!(parse_selector("body").is_ok());
    }

    #[test]
    fn no_match_is_distinct_from_zero_count() {
        let map = ConversionMap::defaults();
        let none = convert_html("<p>a\u{02F8}</p>", "article", &map, HtmlMode::Document).unwrap();
        assert_eq!(none.result, ConversionResult { count: 0, matched: false });
        assert!(none.html.is_none());

        let zero = convert_html("<p>plain</p>", "p", &map, HtmlMode::Document).unwrap();
        assert_eq!(zero.result, ConversionResult { count: 0, matched: true });
        assert!(zero.html.is_none());
    }

    #[test]
    fn document_mode_serializes_full_document() {
        let input = "<!DOCTYPE html><html><head><title>t</title></head><body><p>x\u{2044}y</p></body></html>";
        let conv =
            convert_html(input, "body", &ConversionMap::defaults(), HtmlMode::Document).unwrap();
        let html = conv.html.expect("changed");
        assert!(html.contains("<title>t</title>"));
        assert!(html.contains("<p>x/y</p>"));
    }

    #[test]
    fn empty_map_changes_nothing() {
        let input = "<p>case\u{02F8}study</p>";
        let conv = convert_html(input, "p", &ConversionMap::new(), HtmlMode::Fragment).unwrap();
        assert_eq!(conv.result, ConversionResult { count: 0, matched: true });
        assert!(conv.html.is_none());
    }

    #[test]
    fn convert_text_plain() {
        let (out, count) =
            convert_text("10\u{2044}20 at 12\u{02F8}30", &ConversionMap::defaults()).unwrap();
        assert_eq!(out, "10/20 at 12:30");
        assert_eq!(count, 2);
    }

    #[test]
    fn fragment_default_selector_targets_fragment_root() {
        let conv = convert_html(
            "<p>a\u{02F8}b</p>",
            DEFAULT_SELECTOR,
            &ConversionMap::defaults(),
            HtmlMode::Fragment,
        )
        .unwrap();
        assert_eq!(conv.result, ConversionResult { count: 1, matched: true });
        assert_eq!(conv.html.as_deref(), Some("<p>a:b</p>"));
    }

    #[test]
    fn fragment_body_selector_matches_text_only_input() {
        let conv = convert_html(
            " BODY ",
            "body",
            &ConversionMap::defaults(),
            HtmlMode::Fragment,
        )
        .unwrap();
        assert_eq!(conv.result, ConversionResult { count: 0, matched: true });
    }

    #[test]
    fn document_body_selector_still_uses_body_element() {
        let input = "<html><head><title>a\u{02F8}b</title></head><body>c\u{02F8}d</body></html>";
        let conv =
            convert_html(input, DEFAULT_SELECTOR, &ConversionMap::defaults(), HtmlMode::Document)
                .unwrap();
        assert_eq!(conv.result.count, 1);
        let html = conv.html.expect("changed");
        assert!(html.contains("<title>a\u{02F8}b</title>"), "{}", html);
        assert!(html.contains("c:d"), "{}", html);
    }

    #[test]
    fn overlapping_roots_count_each_character_once() {
        let input = "<div><p>x\u{02F8}</p></div>";
        let conv =
            convert_html(input, "div, p", &ConversionMap::defaults(), HtmlMode::Fragment).unwrap();
        assert_eq!(conv.result, ConversionResult { count: 1, matched: true });
        assert_eq!(conv.html.as_deref(), Some("<div><p>x:</p></div>"));
    }

    #[test]
    fn merge_results() {
        let a = ConversionResult { count: 2, matched: true };
        let b = ConversionResult { count: 0, matched: false };
        assert_eq!(a.merge(b), ConversionResult { count: 2, matched: true });
        assert_eq!(b.merge(b), ConversionResult::default());
    }
}

//! Text-node conversion: replace look-alike characters in place and count substitutions.

use std::borrow::Cow;

use ego_tree::NodeId;
use scraper::{Html, Node};

use super::charmap::ConversionMap;
use super::matcher::Matcher;

/// Replace every matched character in `text` with its mapped replacement.
/// Returns the borrowed input when nothing matched.
pub fn replace_text<'a>(
    text: &'a str,
    map: &ConversionMap,
    matcher: &Matcher,
) -> (Cow<'a, str>, usize) {
    if !matcher.is_match(text) {
        return (Cow::Borrowed(text), 0);
    }
    let mut out: Option<String> = None;
    let mut last = 0;
    let mut count = 0;

    for m in matcher.find_iter(text) {
        let Some(replacement) = m.as_str().chars().next().and_then(|c| map.get(c)) else {
            continue;
        };
        let buf = out.get_or_insert_with(|| String::with_capacity(text.len()));
        buf.push_str(&text[last..m.start()]);
        buf.push(replacement);
        last = m.end();
        count += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&text[last..]);
            (Cow::Owned(buf), count)
        }
        None => (Cow::Borrowed(text), 0),
    }
}

/// Convert every text node under `root` (the root included, nested elements included)
/// in document order. Nodes whose text ends up identical are not written back.
/// Returns the number of characters substituted.
pub fn convert_element(
    doc: &mut Html,
    root: NodeId,
    map: &ConversionMap,
    matcher: &Matcher,
) -> usize {
    if matcher.is_empty() {
        return 0;
    }
    let Some(root_ref) = doc.tree.get(root) else {
        return 0;
    };
    let text_ids: Vec<NodeId> = root_ref
        .descendants()
        .filter(|n| n.value().is_text())
        .map(|n| n.id())
        .collect();

    let mut total = 0;
    for id in text_ids {
        let Some(mut node) = doc.tree.get_mut(id) else {
            continue;
        };
        if let Node::Text(text) = node.value() {
            let (converted, count) = replace_text(&text.text, map, matcher);
            total += count;
            let changed = match converted {
                Cow::Owned(s) if s.as_str() != &*text.text => Some(s),
                _ => None,
            };
            if let Some(s) = changed {
                text.text = s.as_str().into();
            }
        }
    }
    total
}

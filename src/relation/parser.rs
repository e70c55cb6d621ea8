use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::relation::types::{Arity, StructuredItem};

static PAREN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\)\s*,\s*\(\s*").expect("valid separator regex"));

static BRACKET_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\]\s*,\s*\[\s*").expect("valid separator regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupStyle {
    Paren,
    Bracket,
    Single,
}

impl GroupStyle {
    fn is_delimiter(self, c: char) -> bool {
        match self {
            GroupStyle::Paren => matches!(c, '(' | ')'),
            GroupStyle::Bracket => matches!(c, '[' | ']'),
            GroupStyle::Single => matches!(c, '(' | ')' | '[' | ']'),
        }
    }
}

/// Parses `"(a,b),(c,d)"`-style text into fixed-arity items.
///
/// Never fails: malformed input (empty text, any group of the wrong arity) yields a
/// single [`StructuredItem::degraded`] item so aggregate scoring carries on.
pub fn parse_items(text: &str, arity: Arity) -> Vec<StructuredItem> {
    match try_parse_items(text, arity) {
        Ok(items) => items,
        Err(reason) => {
            debug!(
                reason,
                input_len = text.len(),
                "Unparseable relation output, degrading to empty item"
            );
            vec![StructuredItem::degraded(arity)]
        }
    }
}

/// Like [`parse_items`] but treats a missing response as malformed.
pub fn parse_optional_items(text: Option<&str>, arity: Arity) -> Vec<StructuredItem> {
    parse_items(text.unwrap_or_default(), arity)
}

fn normalize(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix('[').unwrap_or(text);
    let text = text.strip_suffix(']').unwrap_or(text);
    text.trim_matches('"').to_lowercase()
}

fn try_parse_items(text: &str, arity: Arity) -> Result<Vec<StructuredItem>, &'static str> {
    let normalized = normalize(text);
    if normalized.trim().is_empty() {
        return Err("empty input");
    }

    let (style, groups): (GroupStyle, Vec<&str>) = if PAREN_SEPARATOR.is_match(&normalized) {
        (GroupStyle::Paren, PAREN_SEPARATOR.split(&normalized).collect())
    } else if BRACKET_SEPARATOR.is_match(&normalized) {
        (
            GroupStyle::Bracket,
            BRACKET_SEPARATOR.split(&normalized).collect(),
        )
    } else {
        (GroupStyle::Single, vec![normalized.as_str()])
    };

    groups
        .into_iter()
        .map(|group| parse_group(group, style, arity))
        .collect()
}

fn parse_group(
    group: &str,
    style: GroupStyle,
    arity: Arity,
) -> Result<StructuredItem, &'static str> {
    let cleaned: String = group.chars().filter(|&c| !style.is_delimiter(c)).collect();
    let slots: Vec<&str> = cleaned.split(',').map(clean_slot).collect();

    if slots.len() != arity.slot_count() {
        return Err("group arity mismatch");
    }

    Ok(StructuredItem::new(slots))
}

fn clean_slot(slot: &str) -> &str {
    let slot = slot.trim();
    for quote in ['\'', '"'] {
        if slot.len() >= 2
            && let Some(inner) = slot
                .strip_prefix(quote)
                .and_then(|s| s.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    slot
}

//! Size and pack extraction from free-text product names.
//!
//! Patterns are tried in a fixed priority order and every pattern sees the
//! whole string, but text already claimed by an earlier pattern is never
//! matched again: `"4x415g"` yields one multipack, not a multipack plus a
//! bare `415g`.

use std::sync::LazyLock;

use basket_core::{SizeQuantity, SizeUnit};
use regex::{Captures, Regex};

#[derive(Debug, Clone, Copy)]
enum PatternKind {
    Multipack,
    Kilograms,
    Grams,
    Litres,
    Millilitres,
    Pack,
    Pint,
    Eggs,
    HalfDozen,
    Dozen,
}

static PATTERNS: LazyLock<Vec<(PatternKind, Regex)>> = LazyLock::new(|| {
    [
        (
            PatternKind::Multipack,
            r"\b(\d+)\s*x\s*(\d+(?:[.,]\d+)?)\s*(kg|kilos?|kilograms?|ml|g|grams?|litres?|liters?|ltr|l)\b",
        ),
        (
            PatternKind::Kilograms,
            r"\b(\d+(?:[.,]\d+)?)\s*(?:kg|kilos?|kilograms?)\b",
        ),
        (PatternKind::Grams, r"\b(\d+(?:[.,]\d+)?)\s*(?:g|grams?)\b"),
        (
            PatternKind::Litres,
            r"\b(\d+(?:[.,]\d+)?)\s*(?:l|litres?|liters?|ltr)\b",
        ),
        (PatternKind::Millilitres, r"\b(\d+(?:[.,]\d+)?)\s*ml\b"),
        (PatternKind::Pack, r"\b(\d+)\s*(?:packs?|pk)\b"),
        (PatternKind::Pint, r"\b(\d+(?:[.,]\d+)?)\s*pints?\b"),
        (
            PatternKind::Eggs,
            r"\b(\d+)\s*(?:(?:large|medium|small|very large|free range|barn|organic|mixed weight)\s+)*eggs?\b",
        ),
        (PatternKind::HalfDozen, r"\bhalf\s+(?:a\s+)?dozen\b"),
        (PatternKind::Dozen, r"\bdozen\b"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid size regex")))
    .collect()
});

/// Extracts every size mention from `text`.
///
/// The result is ordered by pattern priority (multipack, kg, g, l, ml, pack,
/// pint, egg counts), then by position. Callers treat the first entry as the
/// authoritative size. `kg` and `l` mentions are converted to `g` and `ml`;
/// multipacks keep their per-item unit.
///
/// Never fails: text that does not parse cleanly is skipped.
#[must_use]
pub fn extract_sizes(text: &str) -> Vec<SizeQuantity> {
    let lower = text.to_lowercase();
    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut sizes = Vec::new();

    for (kind, regex) in PATTERNS.iter() {
        for caps in regex.captures_iter(&lower) {
            let Some(whole) = caps.get(0) else { continue };
            let span = (whole.start(), whole.end());
            if claimed.iter().any(|&c| overlaps(c, span)) {
                continue;
            }
            // A malformed mention still claims its text so a weaker pattern
            // cannot reinterpret part of it.
            claimed.push(span);
            if let Some(size) = size_from_captures(*kind, &caps) {
                sizes.push(size);
            }
        }
    }

    sizes
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

fn size_from_captures(kind: PatternKind, caps: &Captures<'_>) -> Option<SizeQuantity> {
    match kind {
        PatternKind::Multipack => {
            let count = parse_count(caps.get(1)?.as_str())?;
            let value = parse_number(caps.get(2)?.as_str())?;
            let unit = unit_from_word(caps.get(3)?.as_str())?;
            Some(SizeQuantity::multipack(count, value, unit))
        }
        PatternKind::Kilograms => {
            let value = parse_number(caps.get(1)?.as_str())?;
            Some(SizeQuantity::single(value * 1000.0, SizeUnit::G))
        }
        PatternKind::Grams => {
            let value = parse_number(caps.get(1)?.as_str())?;
            Some(SizeQuantity::single(value, SizeUnit::G))
        }
        PatternKind::Litres => {
            let value = parse_number(caps.get(1)?.as_str())?;
            Some(SizeQuantity::single(value * 1000.0, SizeUnit::Ml))
        }
        PatternKind::Millilitres => {
            let value = parse_number(caps.get(1)?.as_str())?;
            Some(SizeQuantity::single(value, SizeUnit::Ml))
        }
        PatternKind::Pint => {
            let value = parse_number(caps.get(1)?.as_str())?;
            Some(SizeQuantity::single(value, SizeUnit::Pint))
        }
        PatternKind::Pack | PatternKind::Eggs => {
            let count = parse_count(caps.get(1)?.as_str())?;
            Some(SizeQuantity::single(f64::from(count), SizeUnit::Pack))
        }
        PatternKind::HalfDozen => Some(SizeQuantity::single(6.0, SizeUnit::Pack)),
        PatternKind::Dozen => Some(SizeQuantity::single(12.0, SizeUnit::Pack)),
    }
}

/// Maps a unit spelling to its [`SizeUnit`]. Shared with the normalizer's
/// multipack rewrite so both sides agree on vocabulary.
pub(crate) fn unit_from_word(word: &str) -> Option<SizeUnit> {
    match word {
        "kg" | "kilo" | "kilos" | "kilogram" | "kilograms" => Some(SizeUnit::Kg),
        "g" | "gram" | "grams" => Some(SizeUnit::G),
        "ml" => Some(SizeUnit::Ml),
        "l" | "ltr" | "litre" | "litres" | "liter" | "liters" => Some(SizeUnit::L),
        _ => None,
    }
}

/// Parses a decimal that may use a comma as the decimal separator.
fn parse_number(raw: &str) -> Option<f64> {
    let value = raw.replace(',', ".").parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|&n| n > 0)
}

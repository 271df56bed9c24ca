//! Deciding whether a catalog product is the thing a search term asks for.
//!
//! Text matching is deliberately loose (substring or token containment) and
//! size is strict: a `415g` search never matches a `4x415g` multipack, and a
//! search that names no size never surfaces a multipack.

use basket_core::{NormalizedProduct, SizeFilter, SizeQuantity};
use basket_normalize::{extract_sizes, Normalizer};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::exclusions::ExclusionList;
use crate::size_filter::filter_accepts;

/// Slack for comparing declared sizes, in base units.
const SIZE_EPSILON: f64 = 1e-6;

/// Default tolerance, in grams, for exact weight filters.
pub const DEFAULT_WEIGHT_TOLERANCE_G: f64 = 5.0;

/// Why a candidate was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    SubstringMatch,
    TokenMatch,
    SizeFilterMatch,
    RejectedMissingToken,
    RejectedPackSize,
    RejectedSizeFilter,
    RejectedExcluded,
    RejectedEmptyTarget,
}

impl MatchReason {
    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(
            self,
            MatchReason::SubstringMatch | MatchReason::TokenMatch | MatchReason::SizeFilterMatch
        )
    }
}

/// A normalized search term with its declared sizes and optional constraints.
#[derive(Debug, Clone)]
pub struct Target {
    term: String,
    tokens: Vec<String>,
    sizes: Vec<SizeQuantity>,
    filter: Option<SizeFilter>,
    exclusions: ExclusionList,
}

impl Target {
    /// Builds a target from an already-normalized term.
    #[must_use]
    pub fn new(normalized_term: &str) -> Self {
        let term = normalized_term.trim().to_lowercase();
        Self {
            tokens: term.split_whitespace().map(str::to_string).collect(),
            sizes: extract_sizes(&term),
            term,
            filter: None,
            exclusions: ExclusionList::default(),
        }
    }

    /// Normalizes `raw` with the same pipeline the catalog went through.
    #[must_use]
    pub fn from_raw(normalizer: &Normalizer, raw: &str) -> Self {
        Self::new(&normalizer.normalize(raw).normalized_name)
    }

    /// Replaces pack-size compatibility with `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: SizeFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Attaches a denylist. Patterns the term itself matches are dropped.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: &ExclusionList) -> Self {
        self.exclusions = exclusions.for_term(&self.term);
        self
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn sizes(&self) -> &[SizeQuantity] {
        &self.sizes
    }
}

/// Outcome of matching one catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidate<'a> {
    pub entry: &'a CatalogEntry,
    pub matched: bool,
    pub reason: MatchReason,
}

impl MatchCandidate<'_> {
    #[must_use]
    pub fn product(&self) -> &NormalizedProduct {
        &self.entry.product
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    weight_tolerance_g: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT_TOLERANCE_G)
    }
}

impl Matcher {
    #[must_use]
    pub fn new(weight_tolerance_g: f64) -> Self {
        Self { weight_tolerance_g }
    }

    #[must_use]
    pub fn matches(&self, target: &Target, candidate: &NormalizedProduct) -> bool {
        self.evaluate(target, candidate).is_match()
    }

    /// Runs every check in order and reports the first that decides.
    ///
    /// A substring hit skips token containment only; exclusions and the size
    /// check still run after it.
    #[must_use]
    pub fn evaluate(&self, target: &Target, candidate: &NormalizedProduct) -> MatchReason {
        if target.tokens.is_empty() {
            return MatchReason::RejectedEmptyTarget;
        }

        let name = candidate.normalized_name.as_str();
        let text_reason = if substring_either_way(&target.term, name) {
            MatchReason::SubstringMatch
        } else if target.tokens.iter().all(|t| name.contains(t.as_str())) {
            MatchReason::TokenMatch
        } else {
            return MatchReason::RejectedMissingToken;
        };

        if let Some(pattern) = target.exclusions.matching(name) {
            tracing::trace!(term = %target.term, candidate = name, pattern, "candidate excluded");
            return MatchReason::RejectedExcluded;
        }

        match &target.filter {
            Some(filter) => {
                if filter_accepts(filter, &candidate.extracted_sizes, self.weight_tolerance_g) {
                    MatchReason::SizeFilterMatch
                } else {
                    MatchReason::RejectedSizeFilter
                }
            }
            None => {
                if sizes_compatible(target.sizes.first(), candidate.primary_size()) {
                    text_reason
                } else {
                    MatchReason::RejectedPackSize
                }
            }
        }
    }

    /// Evaluates every entry, keeping rejected candidates with their reason.
    pub fn filter_catalog<'a, I>(&self, target: &Target, entries: I) -> Vec<MatchCandidate<'a>>
    where
        I: IntoIterator<Item = &'a CatalogEntry>,
    {
        entries
            .into_iter()
            .map(|entry| {
                let reason = self.evaluate(target, &entry.product);
                MatchCandidate {
                    entry,
                    matched: reason.is_match(),
                    reason,
                }
            })
            .collect()
    }

    /// Entries that match `target`, in input order.
    pub fn matching_entries<'a, I>(&self, target: &Target, entries: I) -> Vec<&'a CatalogEntry>
    where
        I: IntoIterator<Item = &'a CatalogEntry>,
    {
        entries
            .into_iter()
            .filter(|entry| self.matches(target, &entry.product))
            .collect()
    }
}

/// `true` when either string contains the other on word boundaries.
fn substring_either_way(term: &str, name: &str) -> bool {
    !name.is_empty() && (contains_phrase(name, term) || contains_phrase(term, name))
}

fn contains_phrase(haystack: &str, needle: &str) -> bool {
    let mut search_from = 0usize;
    while let Some(rel) = haystack[search_from..].find(needle) {
        let start = search_from + rel;
        let end = start + needle.len();
        let before_ok = !haystack[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        let after_ok = !haystack[end..]
            .chars()
            .next()
            .is_some_and(char::is_alphanumeric);
        if before_ok && after_ok {
            return true;
        }
        let Some(step) = haystack[start..].chars().next().map(char::len_utf8) else {
            return false;
        };
        search_from = start + step;
    }
    false
}

/// Pack-size compatibility on the authoritative (first) size of each side.
fn sizes_compatible(target: Option<&SizeQuantity>, candidate: Option<&SizeQuantity>) -> bool {
    match (target, candidate) {
        (Some(t), Some(c)) => {
            let (t_value, t_unit) = t.in_base_unit();
            let (c_value, c_unit) = c.in_base_unit();
            t.is_multipack == c.is_multipack
                && t.pack_count == c.pack_count
                && t_unit == c_unit
                && (t_value - c_value).abs() < SIZE_EPSILON
        }
        (None, Some(c)) => !c.is_multipack,
        _ => true,
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;

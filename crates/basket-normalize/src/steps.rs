//! The individual rewrites that make up name normalization.
//!
//! Each step is a pure `&str -> String` transformation. [`Step::PIPELINE`]
//! fixes their order; later steps rely on the output shape of earlier ones
//! (filler stripping must see placeholders, unit rewrites must see dot
//! decimals, and so on), so the order is part of the contract.

use std::collections::HashMap;
use std::sync::LazyLock;

use basket_core::{NormalizationRules, SizeUnit};
use regex::{Captures, NoExpand, Regex};

use crate::error::NormalizeError;
use crate::extract::unit_from_word;

const ARTICLES: &[&str] = &["a", "an", "the"];

/// Upper bound on repeated passes of self-reapplying steps.
const MAX_STEP_ITERATIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LowercaseTrim,
    StripBrands,
    ProtectPhrases,
    StripFiller,
    RestorePhrases,
    CleanOrphanConjunctions,
    SpellingVariants,
    Plurals,
    CommaDecimals,
    PackPhrasing,
    LiquidMeasures,
    WeightMeasures,
    Punctuation,
    DedupeWords,
    StripArticles,
}

impl Step {
    pub const PIPELINE: [Step; 15] = [
        Step::LowercaseTrim,
        Step::StripBrands,
        Step::ProtectPhrases,
        Step::StripFiller,
        Step::RestorePhrases,
        Step::CleanOrphanConjunctions,
        Step::SpellingVariants,
        Step::Plurals,
        Step::CommaDecimals,
        Step::PackPhrasing,
        Step::LiquidMeasures,
        Step::WeightMeasures,
        Step::Punctuation,
        Step::DedupeWords,
        Step::StripArticles,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Step::LowercaseTrim => "lowercase_trim",
            Step::StripBrands => "strip_brands",
            Step::ProtectPhrases => "protect_phrases",
            Step::StripFiller => "strip_filler",
            Step::RestorePhrases => "restore_phrases",
            Step::CleanOrphanConjunctions => "clean_orphan_conjunctions",
            Step::SpellingVariants => "spelling_variants",
            Step::Plurals => "plurals",
            Step::CommaDecimals => "comma_decimals",
            Step::PackPhrasing => "pack_phrasing",
            Step::LiquidMeasures => "liquid_measures",
            Step::WeightMeasures => "weight_measures",
            Step::Punctuation => "punctuation",
            Step::DedupeWords => "dedupe_words",
            Step::StripArticles => "strip_articles",
        }
    }

    pub(crate) fn apply(self, rules: &CompiledRules, input: &str) -> String {
        match self {
            Step::LowercaseTrim => input.to_lowercase().trim().to_string(),
            Step::StripBrands => remove_phrases(rules.brands.as_ref(), input),
            Step::ProtectPhrases => protect_phrases(rules, input),
            Step::StripFiller => remove_phrases(rules.filler.as_ref(), input),
            Step::RestorePhrases => restore_phrases(rules, input),
            Step::CleanOrphanConjunctions => clean_orphan_conjunctions(input),
            Step::SpellingVariants => {
                rewrite_phrases(rules.spelling.as_ref(), &rules.spelling_targets, input)
            }
            Step::Plurals => rewrite_phrases(rules.plurals.as_ref(), &rules.plural_targets, input),
            Step::CommaDecimals => comma_decimals(input),
            Step::PackPhrasing => pack_phrasing(input),
            Step::LiquidMeasures => liquid_measures(input),
            Step::WeightMeasures => weight_measures(input),
            Step::Punctuation => punctuation(input),
            Step::DedupeWords => dedupe_words(input),
            Step::StripArticles => strip_articles(input),
        }
    }
}

/// Rule tables compiled into regexes, built once per [`crate::Normalizer`].
#[derive(Debug)]
pub(crate) struct CompiledRules {
    brands: Option<Regex>,
    filler: Option<Regex>,
    /// `(pattern, placeholder, phrase)` for each protected phrase.
    protected: Vec<(Regex, String, String)>,
    spelling: Option<Regex>,
    spelling_targets: HashMap<String, String>,
    plurals: Option<Regex>,
    plural_targets: HashMap<String, String>,
}

impl CompiledRules {
    pub(crate) fn compile(rules: &NormalizationRules) -> Result<Self, NormalizeError> {
        let brands = whole_word_alternation("brands", &rules.brands, true)?;
        let filler = whole_word_alternation("filler_words", &rules.filler_words, true)?;

        let mut protected_sorted: Vec<&String> = rules.protected_phrases.iter().collect();
        protected_sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let protected = protected_sorted
            .into_iter()
            .enumerate()
            .map(|(idx, phrase)| {
                let regex = Regex::new(&format!(r"\b{}\b", phrase_pattern(phrase))).map_err(
                    |source| NormalizeError::InvalidPattern {
                        section: "protected_phrases",
                        source,
                    },
                )?;
                Ok((regex, placeholder(idx), phrase.clone()))
            })
            .collect::<Result<Vec<_>, NormalizeError>>()?;

        let spelling_from: Vec<String> =
            rules.spelling_variants.iter().map(|v| v.from.clone()).collect();
        let spelling = whole_word_alternation("spelling_variants", &spelling_from, false)?;
        let spelling_targets = rules
            .spelling_variants
            .iter()
            .map(|v| (v.from.clone(), v.to.clone()))
            .collect();

        let plural_from: Vec<String> = rules.plurals.iter().map(|p| p.from.clone()).collect();
        let plurals = whole_word_alternation("plurals", &plural_from, true)?;
        let plural_targets = rules
            .plurals
            .iter()
            .map(|p| (p.from.clone(), p.to.clone()))
            .collect();

        Ok(Self {
            brands,
            filler,
            protected,
            spelling,
            spelling_targets,
            plurals,
            plural_targets,
        })
    }
}

/// Placeholder tokens are a single alphanumeric word, so whole-word filler
/// patterns can never match inside them.
fn placeholder(idx: usize) -> String {
    format!("qxprotected{idx}xq")
}

/// Escapes a phrase and lets its internal spaces match any whitespace run.
fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Builds `\b(?:longest|...|shortest)\b`. With leftmost-first alternation the
/// longest phrase starting at a position wins, so multi-word entries are
/// consumed before any of their single-word parts.
fn whole_word_alternation(
    section: &'static str,
    phrases: &[String],
    trailing_boundary: bool,
) -> Result<Option<Regex>, NormalizeError> {
    if phrases.is_empty() {
        return Ok(None);
    }
    let mut sorted: Vec<&String> = phrases.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = sorted
        .into_iter()
        .map(|p| phrase_pattern(p))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = if trailing_boundary {
        format!(r"\b(?:{alternation})\b")
    } else {
        format!(r"\b(?:{alternation})")
    };
    Regex::new(&pattern)
        .map(Some)
        .map_err(|source| NormalizeError::InvalidPattern { section, source })
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn replace_until_stable(regex: &Regex, replacement: &str, input: &str) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_STEP_ITERATIONS {
        let next = regex.replace_all(&current, replacement).into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn remove_phrases(regex: Option<&Regex>, input: &str) -> String {
    match regex {
        Some(re) => re.replace_all(input, " ").into_owned(),
        None => input.to_string(),
    }
}

fn protect_phrases(rules: &CompiledRules, input: &str) -> String {
    rules
        .protected
        .iter()
        .fold(input.to_string(), |acc, (regex, token, _)| {
            regex.replace_all(&acc, NoExpand(token)).into_owned()
        })
}

fn restore_phrases(rules: &CompiledRules, input: &str) -> String {
    rules
        .protected
        .iter()
        .fold(input.to_string(), |acc, (_, token, phrase)| {
            acc.replace(token.as_str(), phrase)
        })
}

/// Rewrites each matched phrase through `targets`. The match is re-spaced
/// first so `"chicken   wings"` finds the `"chicken wings"` entry.
fn rewrite_phrases(regex: Option<&Regex>, targets: &HashMap<String, String>, input: &str) -> String {
    let Some(regex) = regex else {
        return input.to_string();
    };
    regex
        .replace_all(input, |caps: &Captures<'_>| {
            let matched = collapse_whitespace(&caps[0]);
            targets.get(&matched).cloned().unwrap_or(matched)
        })
        .into_owned()
}

static CONJ_AFTER_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)\s*(?:&|\b(?:and|by)\b)\s*").expect("valid regex"));
static CONJ_BEFORE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:&|\b(?:and|by)\b)\s*(\d)").expect("valid regex"));
static CONJ_LEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:&|(?:and|by)\b)\s*").expect("valid regex"));
static CONJ_TRAILING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(?:&|\b(?:and|by))$").expect("valid regex"));

/// Drops `&`/`and`/`by` left dangling by brand and filler removal: next to a
/// number (`"5 & peaches"` → `"5 peaches"`) or at either end of the name.
fn clean_orphan_conjunctions(input: &str) -> String {
    let mut current = collapse_whitespace(input);
    for _ in 0..MAX_STEP_ITERATIONS {
        let mut next = CONJ_AFTER_DIGIT.replace_all(&current, "${1} ").into_owned();
        next = CONJ_BEFORE_DIGIT.replace_all(&next, " ${1}").into_owned();
        next = CONJ_LEADING.replace(&next, "").into_owned();
        next = CONJ_TRAILING.replace(&next, "").into_owned();
        next = collapse_whitespace(&next);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

static COMMA_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d),(\d)").expect("valid regex"));

fn comma_decimals(input: &str) -> String {
    replace_until_stable(&COMMA_DECIMAL, "${1}.${2}", input)
}

static MULTIPACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\d+)\s*x\s*(\d+(?:\.\d+)?)\s*(kg|kilos?|kilograms?|ml|g|grams?|litres?|liters?|ltr|l)\b",
    )
    .expect("valid regex")
});
static PACK_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\s*(?:packs?|pk)\b").expect("valid regex"));
static MULTIPACK_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bmulti\s*-?\s*packs?\b").expect("valid regex"));

/// `4 x 415 g` → `4x415g`, `6 pack` → `6pk`, `multipack` → `mpk`.
fn pack_phrasing(input: &str) -> String {
    let multipacks = MULTIPACK.replace_all(input, |caps: &Captures<'_>| {
        let unit = unit_from_word(&caps[3]).map_or_else(|| caps[3].to_string(), |u| canonical_unit(u).to_string());
        format!("{}x{}{}", &caps[1], &caps[2], unit)
    });
    let packs = PACK_COUNT.replace_all(&multipacks, "${1}pk");
    MULTIPACK_WORD.replace_all(&packs, "mpk").into_owned()
}

fn canonical_unit(unit: SizeUnit) -> &'static str {
    match unit {
        SizeUnit::G => "g",
        SizeUnit::Kg => "kg",
        SizeUnit::Ml => "ml",
        SizeUnit::L => "l",
        SizeUnit::Pint => "pint",
        SizeUnit::Pack => "pk",
    }
}

static FOUR_PINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b2\.272\s*(?:l|litres?|liters?|ltr)\b").expect("valid regex")
});
static TWO_PINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b1\.136\s*(?:l|litres?|liters?|ltr)\b").expect("valid regex")
});
static ONE_PINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b568\s*ml\b").expect("valid regex"));
static PINTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*pints?\b").expect("valid regex"));
static LITRES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:\.\d+)?)\s*(?:litres?|liters?|ltr|l)\b").expect("valid regex")
});
static MILLILITRES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*ml\b").expect("valid regex"));

/// Fixes UK milk sizes to pints and spaces other volumes as `2l` / `500ml`.
fn liquid_measures(input: &str) -> String {
    let s = FOUR_PINTS.replace_all(input, "4pint");
    let s = TWO_PINTS.replace_all(&s, "2pint");
    let s = ONE_PINT.replace_all(&s, "1pint");
    let s = PINTS.replace_all(&s, "${1}pint");
    let s = LITRES.replace_all(&s, "${1}l");
    MILLILITRES.replace_all(&s, "${1}ml").into_owned()
}

static KILOGRAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:\.\d+)?)\s*(?:kg|kilos?|kilograms?)\b").expect("valid regex")
});
static GRAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*(?:g|grams?|gms?)\b").expect("valid regex"));

fn weight_measures(input: &str) -> String {
    let s = KILOGRAMS.replace_all(input, "${1}kg");
    GRAMS.replace_all(&s, "${1}g").into_owned()
}

/// Punctuation becomes whitespace, except a `.` between two digits (a
/// decimal point) and `%`. Apostrophes are dropped without a gap and `&`
/// is spelled out.
fn punctuation(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            c if c.is_alphanumeric() || c.is_whitespace() || c == '%' => out.push(c),
            '.' => {
                let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
                let next_digit = chars.get(i + 1).is_some_and(char::is_ascii_digit);
                out.push(if prev_digit && next_digit { '.' } else { ' ' });
            }
            '\'' | '\u{2019}' => {}
            '&' => out.push_str(" and "),
            _ => out.push(' '),
        }
    }
    collapse_whitespace(&out)
}

fn dedupe_words(input: &str) -> String {
    let mut words: Vec<&str> = input.split_whitespace().collect();
    words.dedup();
    words.join(" ")
}

/// Removes one leading and one trailing article, never emptying the name.
fn strip_articles(input: &str) -> String {
    let mut words: Vec<&str> = input.split_whitespace().collect();
    if words.len() > 1 && ARTICLES.contains(&words[0]) {
        words.remove(0);
    }
    if words.len() > 1 && words.last().is_some_and(|w| ARTICLES.contains(w)) {
        words.pop();
    }
    words.join(" ")
}

#[cfg(test)]
#[path = "steps_test.rs"]
mod tests;

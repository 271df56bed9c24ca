//! Text rewrite tables used by the name normalizer.
//!
//! The tables are plain data: a built-in copy of `config/normalization.yaml`
//! is embedded at compile time and an alternative file can be loaded with
//! [`load_rules`]. Both paths go through the same validation.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BUILTIN_RULES: &str = include_str!("../../../config/normalization.yaml");

/// A singular/plural rewrite applied as a whole-word replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralRule {
    pub from: String,
    pub to: String,
}

/// A spelling variant rewritten to its canonical spelling. Matches at the
/// start of a word so inflected forms (`yoghurts`) are covered too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellingVariant {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationRules {
    /// Retailer and own-label names, including multi-word sub-brand lines.
    pub brands: Vec<String>,
    /// Phrases shielded from filler stripping, e.g. `"new zealand"`.
    #[serde(default)]
    pub protected_phrases: Vec<String>,
    /// Marketing adjectives removed from names.
    #[serde(default)]
    pub filler_words: Vec<String>,
    #[serde(default)]
    pub spelling_variants: Vec<SpellingVariant>,
    #[serde(default)]
    pub plurals: Vec<PluralRule>,
}

impl NormalizationRules {
    /// The rule tables shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded YAML fails to parse or validate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUILTIN_RULES, "built-in normalization rules")
    }

    /// Parse and validate rules from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or fails validation.
    pub fn from_yaml_str(content: &str, context: &str) -> Result<Self, ConfigError> {
        let rules: NormalizationRules =
            serde_yaml::from_str(content).map_err(|e| ConfigError::FileParse {
                context: context.to_string(),
                source: e,
            })?;
        validate_rules(&rules)?;
        Ok(rules)
    }
}

/// Load and validate normalization rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<NormalizationRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    NormalizationRules::from_yaml_str(&content, &path.display().to_string())
}

fn validate_rules(rules: &NormalizationRules) -> Result<(), ConfigError> {
    validate_phrase_list("brands", &rules.brands)?;
    validate_phrase_list("protected_phrases", &rules.protected_phrases)?;
    validate_phrase_list("filler_words", &rules.filler_words)?;

    let spelling_from: Vec<String> = rules.spelling_variants.iter().map(|v| v.from.clone()).collect();
    validate_phrase_list("spelling_variants", &spelling_from)?;
    for variant in &rules.spelling_variants {
        validate_phrase("spelling_variants", &variant.to)?;
    }

    let plural_from: Vec<String> = rules.plurals.iter().map(|p| p.from.clone()).collect();
    validate_phrase_list("plurals", &plural_from)?;
    for rule in &rules.plurals {
        validate_phrase("plurals", &rule.to)?;
        if rules.plurals.iter().any(|other| other.from == rule.to) {
            return Err(ConfigError::Validation(format!(
                "plurals: '{}' is rewritten to '{}', which is itself rewritten again",
                rule.from, rule.to
            )));
        }
    }

    Ok(())
}

fn validate_phrase_list(section: &str, phrases: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for phrase in phrases {
        validate_phrase(section, phrase)?;
        if !seen.insert(phrase.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{section}: duplicate entry '{phrase}'"
            )));
        }
    }
    Ok(())
}

/// Entries are matched as whole words against lower-cased text, so they must
/// be lower-case, trimmed, and start and end on an alphanumeric character.
fn validate_phrase(section: &str, phrase: &str) -> Result<(), ConfigError> {
    if phrase.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{section}: entries must be non-empty"
        )));
    }
    if phrase != phrase.trim() || phrase != phrase.to_lowercase() {
        return Err(ConfigError::Validation(format!(
            "{section}: '{phrase}' must be lower-case without surrounding whitespace"
        )));
    }
    let starts_ok = phrase.chars().next().is_some_and(char::is_alphanumeric);
    let ends_ok = phrase.chars().last().is_some_and(char::is_alphanumeric);
    if !(starts_ok && ends_ok) {
        return Err(ConfigError::Validation(format!(
            "{section}: '{phrase}' must start and end with a letter or digit"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;

//! Product name normalization.
//!
//! A [`Normalizer`] owns the compiled rule tables and runs [`Step::PIPELINE`]
//! over a raw retailer title. The result is idempotent: normalizing an
//! already-normalized name returns it unchanged.

use std::collections::BTreeSet;

use basket_core::{NormalizationRules, NormalizedProduct, RawProduct};

use crate::error::NormalizeError;
use crate::extract::extract_sizes;
use crate::steps::{CompiledRules, Step};

/// Maximum pipeline passes before giving up on reaching a fixed point.
const MAX_PASSES: usize = 4;

/// Output of [`Normalizer::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub normalized_name: String,
    /// Reserved for categorical tags; currently always empty.
    pub tags: BTreeSet<String>,
}

#[derive(Debug)]
pub struct Normalizer {
    rules: CompiledRules,
}

impl Normalizer {
    /// Compiles `rules` into a reusable normalizer.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::InvalidPattern`] if a rule entry produces an
    /// invalid regex.
    pub fn new(rules: &NormalizationRules) -> Result<Self, NormalizeError> {
        Ok(Self {
            rules: CompiledRules::compile(rules)?,
        })
    }

    /// A normalizer over the rule tables embedded in `basket-core`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError`] if the built-in tables fail to load or compile.
    pub fn with_builtin_rules() -> Result<Self, NormalizeError> {
        let rules = NormalizationRules::builtin()?;
        Self::new(&rules)
    }

    /// Reduces a retailer title to its canonical comparable form.
    ///
    /// The pipeline is re-run on its own output until nothing changes, so a
    /// rewrite exposing work for an earlier step (an article strip leaving a
    /// dangling `and`, say) still converges on a stable name.
    #[must_use]
    pub fn normalize(&self, raw_name: &str) -> Normalized {
        let mut current = self.run_pipeline(raw_name);
        for pass in 1..MAX_PASSES {
            let next = self.run_pipeline(&current);
            if next == current {
                break;
            }
            tracing::trace!(raw_name, pass, from = %current, to = %next, "normalization not yet stable");
            current = next;
            if pass + 1 == MAX_PASSES {
                tracing::warn!(raw_name, normalized = %current, "normalization did not converge");
            }
        }

        Normalized {
            normalized_name: current,
            tags: BTreeSet::new(),
        }
    }

    /// Applies a single pipeline step, for inspecting one rewrite in isolation.
    #[must_use]
    pub fn apply_step(&self, step: Step, input: &str) -> String {
        step.apply(&self.rules, input)
    }

    /// Normalizes a scraped product and extracts the sizes declared in the
    /// normalized name.
    #[must_use]
    pub fn normalize_product(&self, raw: &RawProduct) -> NormalizedProduct {
        let Normalized {
            normalized_name,
            tags,
        } = self.normalize(&raw.name);
        let extracted_sizes = extract_sizes(&normalized_name);

        if normalized_name.is_empty() {
            tracing::debug!(name = %raw.name, url = %raw.url, "product name normalized to empty string");
        }

        NormalizedProduct {
            source_name: raw.name.clone(),
            normalized_name,
            tags,
            extracted_sizes,
        }
    }

    fn run_pipeline(&self, input: &str) -> String {
        Step::PIPELINE.iter().fold(input.to_string(), |acc, step| {
            let next = step.apply(&self.rules, &acc);
            if next != acc {
                tracing::trace!(step = step.name(), from = %acc, to = %next, "step rewrote name");
            }
            next
        })
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

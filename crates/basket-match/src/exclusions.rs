//! Denylist of derivative products that textually contain a search term
//! without being that product (`"egg fried rice"` for `"eggs"`).

use regex::{Regex, RegexBuilder};

use crate::error::MatchError;

#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    patterns: Vec<Regex>,
}

impl ExclusionList {
    /// Compiles case-insensitive patterns.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidExclusionPattern`] for the first pattern
    /// that is not a valid regex.
    pub fn new<I, S>(patterns: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let pattern = p.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| MatchError::InvalidExclusionPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The subset of patterns that apply when searching for `term`. A pattern
    /// the term itself matches is dropped, so `juice` never excludes results
    /// for `orange juice`.
    #[must_use]
    pub fn for_term(&self, term: &str) -> Self {
        Self {
            patterns: self
                .patterns
                .iter()
                .filter(|re| !re.is_match(term))
                .cloned()
                .collect(),
        }
    }

    /// The first pattern matching `name`, if any.
    #[must_use]
    pub fn matching(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(name))
            .map(Regex::as_str)
    }

    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.matching(name).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

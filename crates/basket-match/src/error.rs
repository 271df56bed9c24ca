use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid exclusion pattern '{pattern}': {source}")]
    InvalidExclusionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

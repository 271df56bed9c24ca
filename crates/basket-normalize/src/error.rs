use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("rule table error: {0}")]
    Config(#[from] basket_core::ConfigError),

    #[error("invalid {section} pattern built from rules: {source}")]
    InvalidPattern {
        section: &'static str,
        #[source]
        source: regex::Error,
    },
}

use std::path::PathBuf;

use rust_decimal::Decimal;

/// Runtime settings for the comparison pipeline.
///
/// Rule and popular-item paths are optional; when absent the tables embedded
/// in the binary are used.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub rules_path: Option<PathBuf>,
    pub popular_items_path: Option<PathBuf>,
    /// Allowed deviation, in grams, for exact weight size filters.
    pub weight_tolerance_g: f64,
    /// Savings at or below this amount are reported as zero.
    pub savings_threshold: Decimal,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            rules_path: None,
            popular_items_path: None,
            weight_tolerance_g: 5.0,
            savings_threshold: Decimal::new(1, 2),
        }
    }
}

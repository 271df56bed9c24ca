use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    };

    let log_level = lookup("BASKET_LOG_LEVEL").unwrap_or(defaults.log_level);

    let weight_tolerance_g = match lookup("BASKET_WEIGHT_TOLERANCE_G") {
        Ok(raw) => {
            let value = raw
                .parse::<f64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: "BASKET_WEIGHT_TOLERANCE_G".to_string(),
                    reason: e.to_string(),
                })?;
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidEnvVar {
                    var: "BASKET_WEIGHT_TOLERANCE_G".to_string(),
                    reason: format!("must be a non-negative number, got {raw}"),
                });
            }
            value
        }
        Err(_) => defaults.weight_tolerance_g,
    };

    let savings_threshold = match lookup("BASKET_SAVINGS_THRESHOLD") {
        Ok(raw) => {
            let value = Decimal::from_str(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar {
                var: "BASKET_SAVINGS_THRESHOLD".to_string(),
                reason: e.to_string(),
            })?;
            if value.is_sign_negative() {
                return Err(ConfigError::InvalidEnvVar {
                    var: "BASKET_SAVINGS_THRESHOLD".to_string(),
                    reason: format!("must not be negative, got {raw}"),
                });
            }
            value
        }
        Err(_) => defaults.savings_threshold,
    };

    Ok(AppConfig {
        log_level,
        rules_path: optional_path("BASKET_RULES_PATH"),
        popular_items_path: optional_path("BASKET_POPULAR_ITEMS_PATH"),
        weight_tolerance_g,
        savings_threshold,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

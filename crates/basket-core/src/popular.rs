//! Popular items: canonical products compared like-for-like across retailers.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::size::SizeFilter;
use crate::ConfigError;

const BUILTIN_POPULAR_ITEMS: &str = include_str!("../../../config/popular_items.yaml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularItem {
    /// Display name, e.g. `"Free range eggs (6)"`.
    pub name: String,
    /// Term matched against normalized catalog names.
    pub search_term: String,
    #[serde(default)]
    pub size_filter: Option<SizeFilter>,
    /// Case-insensitive regex patterns excluded for this item only.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularItemsFile {
    /// Case-insensitive regex patterns excluding derivative products for every item.
    #[serde(default)]
    pub exclusions: Vec<String>,
    pub items: Vec<PopularItem>,
}

impl PopularItemsFile {
    /// The popular items shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded YAML fails to parse or validate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUILTIN_POPULAR_ITEMS, "built-in popular items")
    }

    /// Parse and validate popular items from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or fails validation.
    pub fn from_yaml_str(content: &str, context: &str) -> Result<Self, ConfigError> {
        let file: PopularItemsFile =
            serde_yaml::from_str(content).map_err(|e| ConfigError::FileParse {
                context: context.to_string(),
                source: e,
            })?;
        validate_popular_items(&file)?;
        Ok(file)
    }
}

/// Load and validate popular items from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_popular_items(path: &Path) -> Result<PopularItemsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    PopularItemsFile::from_yaml_str(&content, &path.display().to_string())
}

fn validate_popular_items(file: &PopularItemsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for item in &file.items {
        if item.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "popular item name must be non-empty".to_string(),
            ));
        }
        if item.search_term.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "popular item '{}' has an empty search_term",
                item.name
            )));
        }
        if !seen_names.insert(item.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate popular item: '{}'",
                item.name
            )));
        }
        if let Some(filter) = &item.size_filter {
            validate_size_filter(&item.name, filter)?;
        }
    }

    Ok(())
}

/// Rejects ranges that can never match. An empty `complex` filter is allowed
/// and simply matches nothing.
fn validate_size_filter(item: &str, filter: &SizeFilter) -> Result<(), ConfigError> {
    match filter {
        SizeFilter::Exact { size, .. } if !size.is_finite() || *size < 0.0 => {
            Err(ConfigError::Validation(format!(
                "popular item '{item}' has an invalid exact size {size}"
            )))
        }
        SizeFilter::Range { min, max, .. } if !(min.is_finite() && max.is_finite()) || min > max => {
            Err(ConfigError::Validation(format!(
                "popular item '{item}' has an invalid range {min}..{max}"
            )))
        }
        SizeFilter::Complex { conditions } => conditions
            .iter()
            .try_for_each(|c| validate_size_filter(item, c)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::SizeUnit;

    fn item(name: &str, search_term: &str, size_filter: Option<SizeFilter>) -> PopularItem {
        PopularItem {
            name: name.to_string(),
            search_term: search_term.to_string(),
            size_filter,
            exclude: vec![],
        }
    }

    #[test]
    fn builtin_popular_items_parse_and_validate() {
        let file = PopularItemsFile::builtin().expect("built-in popular items should be valid");
        assert!(!file.items.is_empty());
        assert!(file.exclusions.iter().any(|p| p.contains("baby food")));
    }

    #[test]
    fn validate_rejects_duplicate_item_names() {
        let file = PopularItemsFile {
            exclusions: vec![],
            items: vec![item("Milk", "milk", None), item("milk", "whole milk", None)],
        };
        let err = validate_popular_items(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate popular item"), "got: {err}");
    }

    #[test]
    fn validate_rejects_empty_search_term() {
        let file = PopularItemsFile {
            exclusions: vec![],
            items: vec![item("Bread", " ", None)],
        };
        let err = validate_popular_items(&file).unwrap_err();
        assert!(err.to_string().contains("empty search_term"), "got: {err}");
    }

    #[test]
    fn validate_rejects_inverted_range_inside_complex() {
        let filter = SizeFilter::Complex {
            conditions: vec![SizeFilter::Range {
                min: 500.0,
                max: 200.0,
                unit: SizeUnit::G,
            }],
        };
        let file = PopularItemsFile {
            exclusions: vec![],
            items: vec![item("Cheddar", "cheddar", Some(filter))],
        };
        let err = validate_popular_items(&file).unwrap_err();
        assert!(err.to_string().contains("invalid range"), "got: {err}");
    }

    #[test]
    fn validate_allows_empty_complex_filter() {
        let file = PopularItemsFile {
            exclusions: vec![],
            items: vec![item(
                "Anything",
                "anything",
                Some(SizeFilter::Complex { conditions: vec![] }),
            )],
        };
        assert!(validate_popular_items(&file).is_ok());
    }
}

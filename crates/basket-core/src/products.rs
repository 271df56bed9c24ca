use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::size::SizeQuantity;

/// A product listing as delivered by a retailer scraper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProduct {
    /// Retailer title exactly as scraped, e.g. `"ASDA 4 Juicy & Sweet Nectarines"`.
    pub name: String,
    pub price: Decimal,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A product name reduced to its canonical comparable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub source_name: String,
    pub normalized_name: String,
    /// Reserved for categorical tags; currently always empty.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Sizes found in `normalized_name`, the first being authoritative.
    #[serde(default)]
    pub extracted_sizes: Vec<SizeQuantity>,
}

impl NormalizedProduct {
    /// The size used for pack-size comparisons, if the name declares one.
    #[must_use]
    pub fn primary_size(&self) -> Option<&SizeQuantity> {
        self.extracted_sizes.first()
    }

    /// Returns `true` when the primary size is a multipack.
    #[must_use]
    pub fn is_multipack(&self) -> bool {
        self.primary_size().is_some_and(|s| s.is_multipack)
    }

    /// Returns `true` if `new_source_name` differs from the name this product
    /// was normalized from. Price-only updates never require renormalization.
    #[must_use]
    pub fn needs_renormalization(&self, new_source_name: &str) -> bool {
        self.source_name != new_source_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::SizeUnit;

    fn make_product(sizes: Vec<SizeQuantity>) -> NormalizedProduct {
        NormalizedProduct {
            source_name: "Heinz Beanz In Tomato Sauce 4 x 415G".to_string(),
            normalized_name: "heinz beanz in tomato sauce 4x415g".to_string(),
            tags: BTreeSet::new(),
            extracted_sizes: sizes,
        }
    }

    #[test]
    fn primary_size_none_when_no_sizes() {
        assert!(make_product(vec![]).primary_size().is_none());
    }

    #[test]
    fn primary_size_is_first_extracted() {
        let product = make_product(vec![
            SizeQuantity::multipack(4, 415.0, SizeUnit::G),
            SizeQuantity::single(500.0, SizeUnit::G),
        ]);
        let primary = product.primary_size().expect("expected a primary size");
        assert_eq!(primary.pack_count, Some(4));
        assert!(product.is_multipack());
    }

    #[test]
    fn is_multipack_false_for_single_size() {
        let product = make_product(vec![SizeQuantity::single(415.0, SizeUnit::G)]);
        assert!(!product.is_multipack());
    }

    #[test]
    fn needs_renormalization_only_on_name_change() {
        let product = make_product(vec![]);
        assert!(!product.needs_renormalization("Heinz Beanz In Tomato Sauce 4 x 415G"));
        assert!(product.needs_renormalization("Heinz Beanz 4 x 415G"));
    }

    #[test]
    fn raw_product_image_url_defaults_to_none() {
        let json = r#"{"name":"ASDA Cheddar 400g","price":"2.50","url":"https://example.test/p/1"}"#;
        let raw: RawProduct = serde_json::from_str(json).expect("deserialization failed");
        assert!(raw.image_url.is_none());
        assert_eq!(raw.price, Decimal::new(250, 2));
    }

    #[test]
    fn normalized_product_tags_default_to_empty() {
        let json = r#"{"source_name":"Milk","normalized_name":"milk"}"#;
        let product: NormalizedProduct = serde_json::from_str(json).expect("deserialization failed");
        assert!(product.tags.is_empty());
        assert!(product.extracted_sizes.is_empty());
    }
}

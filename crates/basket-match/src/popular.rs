//! Like-for-like comparison of configured popular items across retailers.

use std::collections::BTreeMap;

use basket_core::{PopularItemsFile, RetailerId};
use basket_normalize::Normalizer;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::compare::{cheapest_offers, RetailerOffer};
use crate::error::MatchError;
use crate::exclusions::ExclusionList;
use crate::matcher::{Matcher, Target};

/// Cheapest offer per retailer for one popular item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularItemComparison {
    pub name: String,
    pub search_term: String,
    pub offers: BTreeMap<RetailerId, RetailerOffer>,
    /// Cheapest of `offers`; ties go to the lowest retailer id.
    pub cheapest: Option<RetailerOffer>,
}

/// Popular items compiled into match targets.
#[derive(Debug, Clone)]
pub struct PopularItems {
    items: Vec<(String, Target)>,
}

impl PopularItems {
    /// Normalizes each search term and attaches its size filter and the
    /// combined global and per-item exclusions.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidExclusionPattern`] if any exclusion
    /// pattern is not a valid regex.
    pub fn compile(file: &PopularItemsFile, normalizer: &Normalizer) -> Result<Self, MatchError> {
        let items = file
            .items
            .iter()
            .map(|item| {
                let exclusions =
                    ExclusionList::new(file.exclusions.iter().chain(item.exclude.iter()))?;
                let mut target =
                    Target::from_raw(normalizer, &item.search_term).with_exclusions(&exclusions);
                if let Some(filter) = &item.size_filter {
                    target = target.with_filter(filter.clone());
                }
                Ok((item.name.clone(), target))
            })
            .collect::<Result<Vec<_>, MatchError>>()?;
        Ok(Self { items })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds the cheapest qualifying offer per retailer for every item, in
    /// configuration order.
    #[must_use]
    pub fn compare(&self, matcher: &Matcher, catalog: &Catalog) -> Vec<PopularItemComparison> {
        self.items
            .iter()
            .map(|(name, target)| {
                let matches = matcher.matching_entries(target, catalog.available());
                let offers = cheapest_offers(matches);
                let cheapest = offers
                    .values()
                    .min_by(|a, b| {
                        a.price
                            .cmp(&b.price)
                            .then_with(|| a.retailer_id.cmp(&b.retailer_id))
                    })
                    .cloned();

                if offers.is_empty() {
                    tracing::debug!(item = %name, term = target.term(), "popular item not stocked anywhere");
                }

                PopularItemComparison {
                    name: name.clone(),
                    search_term: target.term().to_string(),
                    offers,
                    cheapest,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::CatalogRow;
    use rust_decimal::Decimal;

    fn row(id: i64, retailer: &str, normalized_name: &str, cents: i64) -> CatalogRow {
        CatalogRow {
            id,
            supermarket_id: retailer.to_string(),
            name: normalized_name.to_string(),
            normalized_name: normalized_name.to_string(),
            current_price: Decimal::new(cents, 2),
            is_available: true,
        }
    }

    fn builtin_items() -> PopularItems {
        let normalizer = Normalizer::with_builtin_rules().expect("built-in rules should compile");
        let file = PopularItemsFile::builtin().expect("built-in popular items should load");
        PopularItems::compile(&file, &normalizer).expect("popular items should compile")
    }

    fn find<'a>(results: &'a [PopularItemComparison], name: &str) -> &'a PopularItemComparison {
        results
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no result for {name}"))
    }

    #[test]
    fn builtin_items_compile() {
        let items = builtin_items();
        assert!(!items.is_empty());
        assert_eq!(items.len(), PopularItemsFile::builtin().unwrap().items.len());
    }

    #[test]
    fn egg_pack_sizes_are_compared_separately() {
        let catalog = Catalog::from_rows(vec![
            row(1, "tesco", "free range eggs 6pk", 150),
            row(2, "tesco", "12 free range eggs", 280),
            row(3, "asda", "6 free range large eggs", 140),
            row(4, "asda", "free range eggs fried rice 6pk", 100),
        ]);
        let results = builtin_items().compare(&Matcher::default(), &catalog);

        // Row 4 passes the text and size checks; only the fried rice exclusion drops it.
        let six = find(&results, "Free range eggs (6)");
        assert_eq!(six.offers.len(), 2);
        assert_eq!(six.offers["asda"].catalog_id, 3);
        assert_eq!(six.cheapest.as_ref().map(|o| o.catalog_id), Some(3));

        let twelve = find(&results, "Free range eggs (12)");
        assert_eq!(twelve.offers.len(), 1);
        assert_eq!(twelve.offers["tesco"].catalog_id, 2);
    }

    #[test]
    fn juice_exclusion_does_not_block_orange_juice() {
        let catalog = Catalog::from_rows(vec![
            row(1, "tesco", "orange juice 1l", 120),
            row(2, "tesco", "orange juice 2l", 200),
        ]);
        let results = builtin_items().compare(&Matcher::default(), &catalog);
        let juice = find(&results, "Orange juice (1 litre)");
        assert_eq!(juice.offers["tesco"].catalog_id, 1);
    }

    #[test]
    fn per_item_exclusions_apply() {
        let catalog = Catalog::from_rows(vec![
            row(1, "tesco", "peanut butter 250g", 120),
            row(2, "tesco", "all butter croissant 4pk", 100),
            row(3, "tesco", "salted butter 250g", 185),
            row(4, "asda", "butter 500g", 300),
        ]);
        let results = builtin_items().compare(&Matcher::default(), &catalog);
        let butter = find(&results, "Butter");
        assert_eq!(butter.offers.len(), 1);
        assert_eq!(butter.offers["tesco"].catalog_id, 3);
    }

    #[test]
    fn weight_tolerance_absorbs_packaging_variance() {
        let catalog = Catalog::from_rows(vec![row(1, "aldi", "butter 254g", 175)]);
        let results = builtin_items().compare(&Matcher::default(), &catalog);
        assert_eq!(find(&results, "Butter").offers.len(), 1);

        let strict = builtin_items().compare(&Matcher::new(0.0), &catalog);
        assert!(find(&strict, "Butter").offers.is_empty());
    }

    #[test]
    fn complex_filter_accepts_weight_or_twin_pack() {
        let catalog = Catalog::from_rows(vec![
            row(1, "tesco", "mature cheddar 400g", 300),
            row(2, "asda", "mature cheddar 2x200g", 320),
            row(3, "lidl", "mature cheddar 800g", 500),
        ]);
        let results = builtin_items().compare(&Matcher::default(), &catalog);
        let cheddar = find(&results, "Mature cheddar");
        let retailers: Vec<&str> = cheddar.offers.keys().map(String::as_str).collect();
        assert_eq!(retailers, vec!["asda", "tesco"]);
        assert_eq!(cheddar.cheapest.as_ref().map(|o| o.catalog_id), Some(1));
    }

    #[test]
    fn unstocked_item_has_no_cheapest() {
        let results = builtin_items().compare(&Matcher::default(), &Catalog::default());
        assert!(results.iter().all(|r| r.offers.is_empty() && r.cheapest.is_none()));
    }

    #[test]
    fn invalid_exclusion_is_an_error() {
        let normalizer = Normalizer::with_builtin_rules().expect("built-in rules should compile");
        let mut file = PopularItemsFile::builtin().expect("built-in popular items should load");
        file.exclusions.push("(broken".to_string());
        let err = PopularItems::compile(&file, &normalizer).expect_err("should fail");
        assert!(err.to_string().contains("(broken"), "unexpected error: {err}");
    }
}

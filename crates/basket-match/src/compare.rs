//! Cheapest-per-retailer selection and shopping-list comparison.

use std::collections::{BTreeMap, BTreeSet};

use basket_core::{RetailerId, ShoppingListItem};
use basket_normalize::Normalizer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry};
use crate::matcher::{Matcher, Target};

/// The cheapest matching product a retailer offers for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerOffer {
    pub retailer_id: RetailerId,
    pub catalog_id: i64,
    pub product_name: String,
    pub price: Decimal,
}

impl RetailerOffer {
    fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            retailer_id: entry.retailer_id.clone(),
            catalog_id: entry.id,
            product_name: entry.product.normalized_name.clone(),
            price: entry.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Shopping-list name as the user entered it.
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub catalog_id: i64,
    pub product_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerTotal {
    pub retailer_id: RetailerId,
    pub total: Decimal,
}

/// Result of pricing a shopping list at every retailer.
///
/// Only retailers that stock at least one list item appear. Decimals
/// serialize as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub per_retailer_total: BTreeMap<RetailerId, Decimal>,
    pub per_retailer_line_items: BTreeMap<RetailerId, Vec<LineItem>>,
    /// Items a listed retailer has no match for.
    pub missing_items: BTreeMap<RetailerId, BTreeSet<String>>,
    /// Items no retailer has a match for.
    pub not_found_anywhere: Vec<String>,
    /// Retailers ascending by total, ties broken by retailer id.
    pub ranking: Vec<RetailerTotal>,
    pub cheapest_retailer: Option<RetailerId>,
    /// Difference between the dearest and cheapest totals; zero unless it
    /// exceeds the savings threshold.
    pub savings_vs_most_expensive: Decimal,
}

/// Picks the cheapest entry per retailer. Ties go to the lowest catalog id,
/// then the alphabetically first name.
pub fn cheapest_offers<'a, I>(entries: I) -> BTreeMap<RetailerId, RetailerOffer>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let mut best: BTreeMap<&str, &CatalogEntry> = BTreeMap::new();
    for entry in entries {
        best.entry(entry.retailer_id.as_str())
            .and_modify(|current| {
                if offer_key(entry) < offer_key(current) {
                    *current = entry;
                }
            })
            .or_insert(entry);
    }
    best.into_iter()
        .map(|(retailer, entry)| (retailer.to_string(), RetailerOffer::from_entry(entry)))
        .collect()
}

fn offer_key(entry: &CatalogEntry) -> (Decimal, i64, &str) {
    (entry.price, entry.id, entry.name())
}

#[derive(Debug)]
pub struct Comparator<'a> {
    normalizer: &'a Normalizer,
    matcher: Matcher,
    savings_threshold: Decimal,
}

impl<'a> Comparator<'a> {
    #[must_use]
    pub fn new(normalizer: &'a Normalizer, matcher: Matcher, savings_threshold: Decimal) -> Self {
        Self {
            normalizer,
            matcher,
            savings_threshold,
        }
    }

    /// Prices `list` at every retailer in `catalog`.
    ///
    /// Each item is normalized, matched against the available entries and
    /// priced at its cheapest match per retailer. Items without any match
    /// are listed in `not_found_anywhere` and in every retailer's
    /// `missing_items`.
    #[must_use]
    pub fn compare(&self, list: &[ShoppingListItem], catalog: &Catalog) -> ComparisonResult {
        let mut line_items: BTreeMap<RetailerId, Vec<LineItem>> = BTreeMap::new();
        let mut stocked_by: Vec<(&str, BTreeSet<RetailerId>)> = Vec::with_capacity(list.len());
        let mut not_found_anywhere = Vec::new();

        for item in list {
            let target = Target::from_raw(self.normalizer, &item.name);
            let matches = self.matcher.matching_entries(&target, catalog.available());
            let offers = cheapest_offers(matches.iter().copied());

            tracing::debug!(
                item = %item.name,
                term = target.term(),
                matches = matches.len(),
                retailers = offers.len(),
                "matched shopping list item"
            );

            if offers.is_empty() {
                not_found_anywhere.push(item.name.clone());
            }

            let retailers = offers.keys().cloned().collect();
            for (retailer_id, offer) in offers {
                line_items.entry(retailer_id).or_default().push(LineItem {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: offer.price,
                    line_total: offer.price * Decimal::from(item.quantity),
                    catalog_id: offer.catalog_id,
                    product_name: offer.product_name,
                });
            }
            stocked_by.push((item.name.as_str(), retailers));
        }

        let per_retailer_total: BTreeMap<RetailerId, Decimal> = line_items
            .iter()
            .map(|(retailer, items)| (retailer.clone(), items.iter().map(|l| l.line_total).sum()))
            .collect();

        let mut missing_items: BTreeMap<RetailerId, BTreeSet<String>> = BTreeMap::new();
        for retailer in line_items.keys() {
            for (name, retailers) in &stocked_by {
                if !retailers.contains(retailer) {
                    missing_items
                        .entry(retailer.clone())
                        .or_default()
                        .insert((*name).to_string());
                }
            }
        }

        let mut ranking: Vec<RetailerTotal> = per_retailer_total
            .iter()
            .map(|(retailer_id, total)| RetailerTotal {
                retailer_id: retailer_id.clone(),
                total: *total,
            })
            .collect();
        ranking.sort_by(|a, b| {
            a.total
                .cmp(&b.total)
                .then_with(|| a.retailer_id.cmp(&b.retailer_id))
        });

        let savings_vs_most_expensive = match (ranking.first(), ranking.last()) {
            (Some(cheapest), Some(dearest)) => {
                let savings = dearest.total - cheapest.total;
                if savings > self.savings_threshold {
                    savings
                } else {
                    Decimal::ZERO
                }
            }
            _ => Decimal::ZERO,
        };

        ComparisonResult {
            cheapest_retailer: ranking.first().map(|r| r.retailer_id.clone()),
            per_retailer_total,
            per_retailer_line_items: line_items,
            missing_items,
            not_found_anywhere,
            ranking,
            savings_vs_most_expensive,
        }
    }
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;

use std::collections::{BTreeSet, HashSet};

use basket_core::{CatalogRow, NormalizedProduct, RetailerId};
use basket_normalize::extract_sizes;
use rust_decimal::Decimal;
use serde::Serialize;

/// A catalog row paired with the sizes declared in its normalized name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub retailer_id: RetailerId,
    pub product: NormalizedProduct,
    pub price: Decimal,
    pub is_available: bool,
}

impl CatalogEntry {
    /// Builds an entry from a storage row. The stored `normalized_name` is
    /// trusted as-is; only sizes are derived here.
    #[must_use]
    pub fn from_row(row: CatalogRow) -> Self {
        let extracted_sizes = extract_sizes(&row.normalized_name);
        Self {
            id: row.id,
            retailer_id: row.supermarket_id,
            product: NormalizedProduct {
                source_name: row.name,
                normalized_name: row.normalized_name,
                tags: BTreeSet::new(),
                extracted_sizes,
            },
            price: row.current_price,
            is_available: row.is_available,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.product.normalized_name
    }
}

/// Read-only snapshot of every retailer's products for one comparison.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = CatalogRow>) -> Self {
        let mut seen = HashSet::new();
        let entries = rows
            .into_iter()
            .filter(|row| {
                let fresh = seen.insert(row.id);
                if !fresh {
                    tracing::warn!(id = row.id, "duplicate catalog id; keeping first row");
                }
                fresh
            })
            .map(CatalogEntry::from_row)
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries that can currently be bought. Unavailable rows never take part
    /// in matching or comparison.
    pub fn available(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.is_available)
    }

    /// Distinct retailer ids present in the catalog, sorted.
    #[must_use]
    pub fn retailers(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.retailer_id.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

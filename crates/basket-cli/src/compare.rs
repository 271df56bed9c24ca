//! Handlers for `compare` and `popular`.

use std::path::Path;

use anyhow::Context;
use basket_core::{AppConfig, CatalogRow, PopularItemsFile, ShoppingListItem};
use basket_match::{Catalog, Comparator, Matcher, PopularItems};
use basket_normalize::Normalizer;

use crate::{print_json, read_json};

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let rows: Vec<CatalogRow> = read_json(path)?;
    let catalog = Catalog::from_rows(rows);
    tracing::info!(
        path = %path.display(),
        entries = catalog.len(),
        retailers = catalog.retailers().len(),
        "loaded catalog"
    );
    Ok(catalog)
}

pub(crate) fn run_compare(
    config: &AppConfig,
    normalizer: &Normalizer,
    catalog_path: &Path,
    list_path: &Path,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let list: Vec<ShoppingListItem> = read_json(list_path)?;
    if list.is_empty() {
        anyhow::bail!("shopping list {} is empty", list_path.display());
    }

    let comparator = Comparator::new(
        normalizer,
        Matcher::new(config.weight_tolerance_g),
        config.savings_threshold,
    );
    let result = comparator.compare(&list, &catalog);

    tracing::info!(
        items = list.len(),
        retailers = result.ranking.len(),
        not_found = result.not_found_anywhere.len(),
        cheapest = result.cheapest_retailer.as_deref().unwrap_or("none"),
        "comparison complete"
    );

    print_json(&result)
}

/// `--items` wins over `BASKET_POPULAR_ITEMS_PATH`; with neither the
/// built-in list is used.
pub(crate) fn run_popular(
    config: &AppConfig,
    normalizer: &Normalizer,
    catalog_path: &Path,
    items_path: Option<&Path>,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let file = match items_path.or(config.popular_items_path.as_deref()) {
        Some(path) => basket_core::load_popular_items(path)?,
        None => PopularItemsFile::builtin()?,
    };
    let popular = PopularItems::compile(&file, normalizer)
        .context("failed to compile popular item exclusions")?;

    let results = popular.compare(&Matcher::new(config.weight_tolerance_g), &catalog);
    print_json(&results)
}

//! Handlers for the name-level commands: `normalize`, `sizes` and
//! `normalize-products`.

use std::path::Path;

use basket_core::{NormalizedProduct, RawProduct, SizeQuantity};
use basket_normalize::{extract_sizes, Normalizer};
use serde::Serialize;

use crate::{print_json, read_json};

#[derive(Debug, Serialize)]
struct NormalizedName<'a> {
    input: &'a str,
    normalized_name: String,
    sizes: Vec<SizeQuantity>,
}

pub(crate) fn run_normalize(normalizer: &Normalizer, names: &[String]) -> anyhow::Result<()> {
    let output: Vec<NormalizedName<'_>> = names
        .iter()
        .map(|name| {
            let normalized_name = normalizer.normalize(name).normalized_name;
            NormalizedName {
                input: name,
                sizes: extract_sizes(&normalized_name),
                normalized_name,
            }
        })
        .collect();
    print_json(&output)
}

pub(crate) fn run_sizes(text: &str) -> anyhow::Result<()> {
    print_json(&extract_sizes(text))
}

pub(crate) fn run_normalize_products(normalizer: &Normalizer, input: &Path) -> anyhow::Result<()> {
    let raw: Vec<RawProduct> = read_json(input)?;
    let products: Vec<NormalizedProduct> =
        raw.iter().map(|p| normalizer.normalize_product(p)).collect();

    let empty = products
        .iter()
        .filter(|p| p.normalized_name.is_empty())
        .count();
    tracing::info!(
        path = %input.display(),
        products = products.len(),
        empty,
        "normalized products"
    );

    print_json(&products)
}

//! Normalization over a batch of realistic retailer titles.
//!
//! Checks properties that must hold for every title rather than exact
//! outputs: idempotence, character set, brand removal, and that multipack
//! sizes survive normalization.

use basket_core::{NormalizationRules, SizeUnit};
use basket_normalize::{extract_sizes, Normalizer};

const TITLES: &[&str] = &[
    "ASDA Extra Special 6 Free Range Large Eggs",
    "Tesco Finest Mature Cheddar 400G",
    "Sainsbury's Taste the Difference Sweet Chilli Sauce 250ml",
    "Morrisons The Best Deliciously Juicy Oranges 5 Pack",
    "M&S Chicken Breasts 2 x 300g",
    "Co-op Semi Skimmed Milk 4 Pints",
    "Heinz Baked Beans in Tomato Sauce 4 x 415g",
    "Coca-Cola Original Taste 24 x 330ml",
    "Waitrose Duchy Organic Bananas",
    "Just Essentials by ASDA Baked Beans 420g",
    "Lidl Plump & Juicy Raisins 500 g",
    "Aldi Greek Style Yoghurt 1kg",
    "Iceland 2 Pack Garlic Baguettes",
    "Hearty Food Co. Beef Lasagne 400g",
    "Stockwell & Co. Strawberry Jam 454g",
    "The Best Ever Crumpets x6",
    "Everyday Value Sweet Potatoes 1,5 Kg",
    "Smart Price Orange Juice 1 Litre",
    "Tesco Whole Milk 1.136L, 2 Pints",
    "Walkers Ready Salted Crisps Multipack 6 x 25g",
];

fn normalizer() -> Normalizer {
    Normalizer::with_builtin_rules().expect("built-in rules should compile")
}

#[test]
fn every_title_is_idempotent() {
    let n = normalizer();
    for title in TITLES {
        let once = n.normalize(title).normalized_name;
        let twice = n.normalize(&once).normalized_name;
        assert_eq!(once, twice, "not idempotent for {title:?}");
    }
}

#[test]
fn output_is_lowercase_words_separated_by_single_spaces() {
    let n = normalizer();
    for title in TITLES {
        let out = n.normalize(title).normalized_name;
        assert_eq!(out, out.to_lowercase(), "uppercase left in {out:?}");
        assert_eq!(out, out.trim(), "untrimmed output {out:?}");
        assert!(!out.contains("  "), "double space in {out:?}");
        assert!(
            out.chars()
                .all(|c| c.is_alphanumeric() || c == ' ' || c == '.' || c == '%'),
            "unexpected character in {out:?}"
        );
    }
}

#[test]
fn brand_words_do_not_survive() {
    let rules = NormalizationRules::builtin().expect("built-in rules should load");
    let n = normalizer();
    for title in TITLES {
        let out = format!(" {} ", n.normalize(title).normalized_name);
        for brand in &rules.brands {
            let brand_word = format!(" {brand} ");
            assert!(
                !out.contains(&brand_word),
                "brand {brand:?} survived in {out:?} (from {title:?})"
            );
        }
    }
}

#[test]
fn multipack_sizes_survive_normalization() {
    let n = normalizer();
    for title in TITLES {
        let raw_sizes = extract_sizes(title);
        let Some(raw_primary) = raw_sizes.first().filter(|s| s.is_multipack) else {
            continue;
        };
        let product_sizes = extract_sizes(&n.normalize(title).normalized_name);
        let primary = product_sizes
            .first()
            .unwrap_or_else(|| panic!("size lost for {title:?}"));
        assert!(primary.is_multipack, "multipack lost for {title:?}");
        assert_eq!(primary.pack_count, raw_primary.pack_count);
        assert!((primary.total_value() - raw_primary.total_value()).abs() < 1e-6);
    }
}

#[test]
fn milk_sizes_read_as_pints() {
    let n = normalizer();
    for title in ["Co-op Semi Skimmed Milk 4 Pints", "Tesco Whole Milk 1.136L, 2 Pints"] {
        let sizes = extract_sizes(&n.normalize(title).normalized_name);
        assert_eq!(sizes.len(), 1, "expected one size for {title:?}, got {sizes:?}");
        assert_eq!(sizes[0].unit, SizeUnit::Pint);
    }
}

//! Evaluation of [`SizeFilter`] predicates against extracted product sizes.

use basket_core::{SizeFilter, SizeQuantity, SizeUnit};

/// Slack applied to every numeric comparison to absorb float noise.
const EPSILON: f64 = 1e-6;

/// Returns `true` if the product's primary size satisfies `filter`.
///
/// A product without any declared size counts as a single item (`1 pack`).
/// Exact weight filters accept `±weight_tolerance_g`; every other exact
/// filter must match to within float noise. Ranges are inclusive and a
/// complex filter accepts when any of its conditions does.
#[must_use]
pub fn filter_accepts(filter: &SizeFilter, sizes: &[SizeQuantity], weight_tolerance_g: f64) -> bool {
    let single_item = SizeQuantity::single(1.0, SizeUnit::Pack);
    let size = sizes.first().unwrap_or(&single_item);
    accepts(filter, size, weight_tolerance_g)
}

fn accepts(filter: &SizeFilter, size: &SizeQuantity, weight_tolerance_g: f64) -> bool {
    match filter {
        SizeFilter::Exact { size: wanted, unit } => {
            let Some(measured) = measure(size, *unit) else {
                return false;
            };
            let (base, factor) = unit.base();
            let tolerance = if base.is_weight() {
                weight_tolerance_g.max(EPSILON)
            } else {
                EPSILON
            };
            (measured - wanted * factor).abs() <= tolerance
        }
        SizeFilter::Range { min, max, unit } => {
            let Some(measured) = measure(size, *unit) else {
                return false;
            };
            let (_, factor) = unit.base();
            measured >= min * factor - EPSILON && measured <= max * factor + EPSILON
        }
        SizeFilter::Complex { conditions } => conditions
            .iter()
            .any(|c| accepts(c, size, weight_tolerance_g)),
    }
}

/// Expresses `size` in the base unit of `unit`, or `None` if the two are not
/// comparable (grams against millilitres, say).
///
/// Pack filters count items: a multipack contributes its pack count and any
/// non-pack single size counts as one. Weight and volume filters see the
/// multipack total.
fn measure(size: &SizeQuantity, unit: SizeUnit) -> Option<f64> {
    if unit == SizeUnit::Pack {
        return Some(match (size.is_multipack, size.pack_count) {
            (true, Some(count)) => f64::from(count),
            _ if size.unit == SizeUnit::Pack => size.value,
            _ => 1.0,
        });
    }
    let (wanted_base, _) = unit.base();
    let (_, size_base) = size.in_base_unit();
    (wanted_base == size_base).then(|| size.total_value())
}

use serde::{Deserialize, Serialize};

/// Units a product size can be declared in.
///
/// `Kg` and `L` never take part in a comparison directly: they are scaled to
/// `G` and `Ml` first (see [`SizeQuantity::in_base_unit`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    G,
    Kg,
    Ml,
    L,
    Pint,
    Pack,
}

impl SizeUnit {
    /// The unit this one is compared in, and the factor to get there.
    #[must_use]
    pub fn base(self) -> (SizeUnit, f64) {
        match self {
            SizeUnit::Kg => (SizeUnit::G, 1000.0),
            SizeUnit::L => (SizeUnit::Ml, 1000.0),
            other => (other, 1.0),
        }
    }

    /// `true` for units measuring mass.
    #[must_use]
    pub fn is_weight(self) -> bool {
        matches!(self, SizeUnit::G | SizeUnit::Kg)
    }
}

/// One size mention parsed out of a product name, e.g. `"415g"` or `"4x415g"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeQuantity {
    /// Per-item value, expressed in `unit`.
    pub value: f64,
    pub unit: SizeUnit,
    pub is_multipack: bool,
    /// Number of items in a multipack (`4` in `"4x415g"`).
    pub pack_count: Option<u32>,
}

impl SizeQuantity {
    #[must_use]
    pub fn single(value: f64, unit: SizeUnit) -> Self {
        Self {
            value,
            unit,
            is_multipack: false,
            pack_count: None,
        }
    }

    #[must_use]
    pub fn multipack(pack_count: u32, value: f64, unit: SizeUnit) -> Self {
        Self {
            value,
            unit,
            is_multipack: true,
            pack_count: Some(pack_count),
        }
    }

    /// Per-item value scaled to the base unit (`kg` → `g`, `l` → `ml`).
    #[must_use]
    pub fn in_base_unit(&self) -> (f64, SizeUnit) {
        let (unit, factor) = self.unit.base();
        (self.value * factor, unit)
    }

    /// `pack_count * value` for multipacks, `value` otherwise, in the base unit.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        let (value, _) = self.in_base_unit();
        match self.pack_count {
            Some(count) if self.is_multipack => value * f64::from(count),
            _ => value,
        }
    }
}

/// Declarative size constraint attached to a popular item or search target.
///
/// Serialized with an internal `type` tag:
///
/// ```yaml
/// type: complex
/// conditions:
///   - { type: range, min: 200, max: 350, unit: g }
///   - { type: exact, size: 2, unit: pack }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SizeFilter {
    Exact {
        size: f64,
        unit: SizeUnit,
    },
    Range {
        min: f64,
        max: f64,
        unit: SizeUnit,
    },
    /// Matches when any condition matches. Empty `conditions` match nothing.
    Complex { conditions: Vec<SizeFilter> },
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Retailer identifier as used by the storage layer, e.g. `"asda"`.
pub type RetailerId = String;

/// A catalog row as supplied by the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRow {
    pub id: i64,
    pub supermarket_id: RetailerId,
    /// Retailer title the normalized name was derived from.
    #[serde(default)]
    pub name: String,
    pub normalized_name: String,
    pub current_price: Decimal,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// One line of a user's shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ShoppingListItem {
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

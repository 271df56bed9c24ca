pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod popular;
pub mod products;
pub mod rules;
pub mod size;

pub use app_config::AppConfig;
pub use catalog::{CatalogRow, RetailerId, ShoppingListItem};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use popular::{load_popular_items, PopularItem, PopularItemsFile};
pub use products::{NormalizedProduct, RawProduct};
pub use rules::{load_rules, NormalizationRules, PluralRule, SpellingVariant};
pub use size::{SizeFilter, SizeQuantity, SizeUnit};

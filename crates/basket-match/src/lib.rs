//! Pack-size-aware product matching and cheapest-per-retailer comparison.

pub mod catalog;
pub mod compare;
pub mod error;
pub mod exclusions;
pub mod matcher;
pub mod popular;
pub mod size_filter;

pub use catalog::{Catalog, CatalogEntry};
pub use compare::{
    cheapest_offers, Comparator, ComparisonResult, LineItem, RetailerOffer, RetailerTotal,
};
pub use error::MatchError;
pub use exclusions::ExclusionList;
pub use matcher::{MatchCandidate, MatchReason, Matcher, Target};
pub use popular::{PopularItemComparison, PopularItems};
pub use size_filter::filter_accepts;

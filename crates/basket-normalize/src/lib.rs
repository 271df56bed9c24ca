pub mod error;
pub mod extract;
pub mod normalize;
pub mod steps;

pub use error::NormalizeError;
pub use extract::extract_sizes;
pub use normalize::{Normalized, Normalizer};
pub use steps::Step;

pub mod filter;
pub mod metrics;
pub mod normalize;

pub use normalize::{normalize, practice_target};

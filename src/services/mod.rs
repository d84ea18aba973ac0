pub mod assembler;
pub mod providers;
pub mod recommendations;
pub mod similarity;
pub mod title_search;

pub use recommendations::{recommend_for_title, RecommendationService, DEFAULT_TOP_K};

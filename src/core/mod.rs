// Core algorithm exports
pub mod categorize;
pub mod detector;
pub mod filters;
pub mod lodging;
pub mod recommender;
pub mod scoring;

pub use categorize::{categorize, materialize, CategorizedViews};
pub use detector::identify_bad_options;
pub use filters::{apply_criteria, filter_route, matches_criteria};
pub use lodging::{recommend_lodging, DEFAULT_LODGING_COUNT};
pub use recommender::{Recommender, SearchError};
pub use scoring::{base_score, rank_order, recommend_guest, recommend_login, HistoryInsights, ScoringPolicy};

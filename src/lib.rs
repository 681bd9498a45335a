//! Flight Rank - flight offer ranking and recommendation service
//!
//! Filters a flight catalog by route, flags poor-value offers, scores the
//! rest (optionally personalized from a user's history) and returns
//! cheapest, fastest and recommended views with short explanations.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Recommender, SearchError};
pub use models::{FlightOffer, LodgingOffer, ScoredOffer, SearchCriteria, SearchResults, UserProfile};
pub use services::{Catalog, LanguageBridge};

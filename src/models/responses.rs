use serde::{Deserialize, Serialize};
use crate::models::domain::{LodgingOffer, MarketSnapshot, ScoredOffer, SearchCriteria};

/// Route metadata of a search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
    pub origin: String,
    pub destination: String,
    pub total_found: usize,
    pub user_type: UserType,
    pub market_stats: MarketSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<SearchCriteria>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    LoggedIn,
    Guest,
}

/// Categorized result of a successful search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub metadata: SearchMetadata,
    pub recommended: Vec<ScoredOffer>,
    pub cheapest: Vec<ScoredOffer>,
    pub fastest: Vec<ScoredOffer>,
    pub bad_options_sample: Vec<ScoredOffer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lodging: Option<Vec<LodgingOffer>>,
}

/// Known airports of the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub flights_loaded: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

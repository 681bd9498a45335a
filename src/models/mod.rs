// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AccountKind, DerivedFields, ExplanationStatus, FlightOffer, HistoryRecord, InteractionKind,
    LodgingOffer, MarketSnapshot, MaxStops, PreferredTime, Preferences, PriceSensitivity,
    ScoredOffer, SearchCriteria, SortBy, TimeOfDay, UserProfile, ViewLimits,
};
pub use requests::{LodgingRequest, SearchRequest};
pub use responses::{ErrorResponse, HealthResponse, RoutesResponse, SearchMetadata, SearchResults, UserType};

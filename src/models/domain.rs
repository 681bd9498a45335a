use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flight offer as loaded from the catalog
///
/// Identity fields only. Anything computed during a search lives in
/// [`DerivedFields`] on a per-request [`ScoredOffer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub flight_id: String,
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub duration_minutes: u32,
    pub stops: u32,
    pub price: f64,
    #[serde(default)]
    pub reliability_score: f64,
}

impl FlightOffer {
    /// Whether this offer flies `origin` -> `destination` (case-insensitive)
    pub fn serves_route(&self, origin: &str, destination: &str) -> bool {
        self.origin.eq_ignore_ascii_case(origin) && self.destination.eq_ignore_ascii_case(destination)
    }

    pub fn departure_hour(&self) -> u32 {
        self.departure_time.hour()
    }

    pub fn is_direct(&self) -> bool {
        self.stops == 0
    }
}

/// Fields attached to an offer while a single search is processed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
    pub is_bad_option: bool,
    pub bad_option_reason: Option<String>,
    pub score: f64,
    pub boost_reason: Option<String>,
    pub explanation: Option<String>,
}

/// Per-request view of an offer: immutable identity plus derived fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOffer {
    #[serde(flatten)]
    pub offer: FlightOffer,
    #[serde(flatten)]
    pub derived: DerivedFields,
}

impl ScoredOffer {
    pub fn new(offer: FlightOffer) -> Self {
        Self {
            offer,
            derived: DerivedFields::default(),
        }
    }

    pub fn score(&self) -> f64 {
        self.derived.score
    }

    /// Append a boost note, comma-separated after any note already present
    pub fn add_boost_reason(&mut self, note: &str) {
        match self.derived.boost_reason.as_mut() {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(note);
            }
            None => self.derived.boost_reason = Some(note.to_string()),
        }
    }
}

/// Account kind of a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    #[serde(rename = "guest", alias = "anonymous")]
    Anonymous,
    #[serde(rename = "logged_in", alias = "registered")]
    Registered,
}

/// User profile with preferences and interaction history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(rename = "user_type")]
    pub kind: AccountKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
}

impl UserProfile {
    pub fn anonymous(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            kind: AccountKind::Anonymous,
            name: None,
            preferences: Preferences::default(),
            history: Vec::new(),
        }
    }

    pub fn registered(
        user_id: impl Into<String>,
        preferences: Preferences,
        history: Vec<HistoryRecord>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind: AccountKind::Registered,
            name: None,
            preferences,
            history,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.kind == AccountKind::Registered
    }

    /// Preferences, or `None` for anonymous accounts
    pub fn active_preferences(&self) -> Option<&Preferences> {
        self.is_registered().then_some(&self.preferences)
    }

    /// Interaction history; always empty for anonymous accounts
    pub fn active_history(&self) -> &[HistoryRecord] {
        if self.is_registered() {
            &self.history
        } else {
            &[]
        }
    }
}

/// Stated preferences of a registered user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub preferred_airlines: Vec<String>,
    #[serde(default)]
    pub max_stops: MaxStops,
    #[serde(default)]
    pub price_sensitivity: Option<PriceSensitivity>,
    #[serde(default)]
    pub preferred_time: PreferredTime,
}

/// Maximum stop count a user accepts; serialized as a number or `"any"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "MaxStopsRepr", into = "MaxStopsRepr")]
pub enum MaxStops {
    Limit(u32),
    #[default]
    NoLimit,
}

#[doc(hidden)]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxStopsRepr {
    Limit(u32),
    Label(String),
}

impl TryFrom<MaxStopsRepr> for MaxStops {
    type Error = String;

    fn try_from(value: MaxStopsRepr) -> Result<Self, Self::Error> {
        match value {
            MaxStopsRepr::Limit(n) => Ok(MaxStops::Limit(n)),
            MaxStopsRepr::Label(label) => match label.to_lowercase().as_str() {
                "any" | "no_limit" | "none" => Ok(MaxStops::NoLimit),
                other => Err(format!("invalid max_stops value: {}", other)),
            },
        }
    }
}

impl From<MaxStops> for MaxStopsRepr {
    fn from(value: MaxStops) -> Self {
        match value {
            MaxStops::Limit(n) => MaxStopsRepr::Limit(n),
            MaxStops::NoLimit => MaxStopsRepr::Label("any".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSensitivity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredTime {
    Morning,
    Afternoon,
    Evening,
    Night,
    #[default]
    Any,
}

/// Past interaction of a user with a flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub flight_id: Option<String>,
    pub action: InteractionKind,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub stops: u32,
    pub price: f64,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Booked,
    Searched,
    #[serde(alias = "clicked")]
    Viewed,
}

/// Lodging offer, related to flights only through the city code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LodgingOffer {
    pub hotel_id: String,
    pub city: String,
    pub name: String,
    pub room_type: String,
    pub price_per_night: f64,
    pub rating: f64,
}

/// Mean price and duration over the offers of one search
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub avg_price: f64,
    pub avg_duration: f64,
}

impl MarketSnapshot {
    /// Returns `None` for an empty offer set
    pub fn from_offers(offers: &[ScoredOffer]) -> Option<Self> {
        if offers.is_empty() {
            return None;
        }

        let count = offers.len() as f64;
        let total_price: f64 = offers.iter().map(|o| o.offer.price).sum();
        let total_duration: f64 = offers.iter().map(|o| o.offer.duration_minutes as f64).sum();

        Some(Self {
            avg_price: total_price / count,
            avg_duration: total_duration / count,
        })
    }
}

/// Departure time-of-day bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// [05:00, 12:00)
    Morning,
    /// [12:00, 17:00)
    Afternoon,
    /// [17:00, 21:00)
    Evening,
    /// [21:00, 24:00) and [00:00, 05:00)
    Night,
}

impl TimeOfDay {
    pub fn contains_hour(self, hour: u32) -> bool {
        match self {
            TimeOfDay::Morning => (5..12).contains(&hour),
            TimeOfDay::Afternoon => (12..17).contains(&hour),
            TimeOfDay::Evening => (17..21).contains(&hour),
            TimeOfDay::Night => hour >= 21 || hour < 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Price,
    Duration,
}

/// Structured filter criteria derived from a free-text query
///
/// Unset fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stops: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.max_price.is_none()
            && self.max_stops.is_none()
            && self.time_of_day.is_none()
            && self.sort_by.is_none()
    }
}

/// Framing of a generated justification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplanationStatus {
    Recommended,
    Avoid,
}

impl fmt::Display for ExplanationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplanationStatus::Recommended => write!(f, "Recommended"),
            ExplanationStatus::Avoid => write!(f, "Avoid"),
        }
    }
}

/// Sizes of the categorized result views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLimits {
    pub view_limit: usize,
    pub bad_sample_limit: usize,
    pub explained_bad_limit: usize,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            view_limit: 20,
            bad_sample_limit: 5,
            explained_bad_limit: 3,
        }
    }
}

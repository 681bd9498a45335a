//! Local stand-ins for the text-generation service
//!
//! Used whenever the remote service is disabled, unreachable, or answers
//! with something unusable.

use crate::models::{ExplanationStatus, FlightOffer, MarketSnapshot, Preferences, SearchCriteria, SortBy, TimeOfDay};
use regex::Regex;
use std::sync::LazyLock;

static UNDER_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"under \$?(\d[\d,]*(?:\.\d+)?)").expect("price pattern is valid")
});

/// Derive search criteria from literal keywords in a query
pub fn parse_keywords(query: &str) -> SearchCriteria {
    let q = query.to_lowercase();
    let mut criteria = SearchCriteria::default();

    if q.contains("direct") || q.contains("non-stop") || q.contains("nonstop") {
        criteria.max_stops = Some(0);
    }

    criteria.time_of_day = if q.contains("morning") {
        Some(TimeOfDay::Morning)
    } else if q.contains("afternoon") {
        Some(TimeOfDay::Afternoon)
    } else if q.contains("evening") {
        Some(TimeOfDay::Evening)
    } else if q.contains("night") {
        Some(TimeOfDay::Night)
    } else {
        None
    };

    criteria.sort_by = if q.contains("cheap") || q.contains("budget") {
        Some(SortBy::Price)
    } else if q.contains("fast") || q.contains("short") {
        Some(SortBy::Duration)
    } else {
        None
    };

    criteria.max_price = UNDER_PRICE
        .captures(&q)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok());

    criteria
}

/// Rule-based justification for an offer
pub fn explain_locally(
    offer: &FlightOffer,
    market: &MarketSnapshot,
    preferences: Option<&Preferences>,
    status: ExplanationStatus,
) -> String {
    let price_diff_pct = if market.avg_price > 0.0 {
        (offer.price - market.avg_price) / market.avg_price * 100.0
    } else {
        0.0
    };
    let duration_diff_mins = offer.duration_minutes as f64 - market.avg_duration;

    let mut reasons: Vec<String> = Vec::new();

    match status {
        ExplanationStatus::Recommended => {
            if price_diff_pct <= -10.0 {
                reasons.push(format!("{}% cheaper than average", price_diff_pct.abs().trunc()));
            }
            if duration_diff_mins <= -30.0 {
                reasons.push(format!("{}h faster", whole_hours(duration_diff_mins).abs()));
            }
            if offer.is_direct() {
                reasons.push("non-stop".to_string());
            }
            if let Some(prefs) = preferences {
                if prefs.preferred_airlines.contains(&offer.airline) {
                    reasons.push(format!("matches your preference for {}", offer.airline));
                }
            }

            if reasons.is_empty() {
                "Balanced option with good value.".to_string()
            } else {
                format!("Recommended because it is {}.", reasons.join(", "))
            }
        }
        ExplanationStatus::Avoid => {
            if price_diff_pct > 20.0 {
                reasons.push(format!("price is {}% higher than average", price_diff_pct.trunc()));
            }
            if duration_diff_mins > 60.0 {
                reasons.push(format!("duration is {}h longer", whole_hours(duration_diff_mins)));
            }
            if offer.stops > 1 {
                reasons.push("multiple layovers".to_string());
            }

            if reasons.is_empty() {
                "Not the best value compared to other options.".to_string()
            } else {
                format!("Note: {}.", reasons.join(", "))
            }
        }
    }
}

/// Whole hours in a minute difference, truncated toward zero
fn whole_hours(minutes: f64) -> i64 {
    (minutes / 60.0).trunc() as i64
}

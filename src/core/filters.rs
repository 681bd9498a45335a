use crate::models::{FlightOffer, ScoredOffer, SearchCriteria};

/// Select every offer serving `origin` -> `destination`
///
/// Stage 1 of the search pipeline. Matching is case-insensitive and the
/// returned offers are owned copies in catalog order, so derived fields
/// written later never reach the shared catalog.
pub fn filter_route(catalog: &[FlightOffer], origin: &str, destination: &str) -> Vec<ScoredOffer> {
    catalog
        .iter()
        .filter(|offer| offer.serves_route(origin, destination))
        .cloned()
        .map(ScoredOffer::new)
        .collect()
}

/// Check an offer against structured query criteria
#[inline]
pub fn matches_criteria(offer: &FlightOffer, criteria: &SearchCriteria) -> bool {
    if let Some(max_price) = criteria.max_price {
        if offer.price > max_price {
            return false;
        }
    }

    if let Some(max_stops) = criteria.max_stops {
        if offer.stops > max_stops {
            return false;
        }
    }

    if let Some(bucket) = criteria.time_of_day {
        if !bucket.contains_hour(offer.departure_hour()) {
            return false;
        }
    }

    true
}

/// Keep the offers satisfying `criteria`, noting the query they matched
///
/// Stage 2 of the search pipeline, only run for a non-empty query.
pub fn apply_criteria(
    offers: Vec<ScoredOffer>,
    criteria: &SearchCriteria,
    query: &str,
) -> Vec<ScoredOffer> {
    let note = format!("Matches '{}'", query);

    offers
        .into_iter()
        .filter(|offer| matches_criteria(&offer.offer, criteria))
        .map(|mut offer| {
            offer.add_boost_reason(&note);
            offer
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeOfDay;
    use chrono::NaiveDate;

    fn create_offer(id: &str, origin: &str, destination: &str, hour: u32, stops: u32, price: f64) -> FlightOffer {
        let departure = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap();

        FlightOffer {
            flight_id: id.to_string(),
            airline: "Emirates".to_string(),
            flight_number: "EM101".to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time: departure,
            arrival_time: departure + chrono::Duration::minutes(420),
            duration_minutes: 420,
            stops,
            price,
            reliability_score: 0.95,
        }
    }

    #[test]
    fn test_route_filter_is_case_insensitive() {
        let catalog = vec![
            create_offer("1", "DXB", "LHR", 9, 0, 500.0),
            create_offer("2", "dxb", "lhr", 9, 0, 500.0),
            create_offer("3", "DXB", "JFK", 9, 0, 500.0),
            create_offer("4", "LHR", "DXB", 9, 0, 500.0),
        ];

        let matched = filter_route(&catalog, "Dxb", "LHR");
        let ids: Vec<&str> = matched.iter().map(|o| o.offer.flight_id.as_str()).collect();

        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_route_filter_starts_with_clean_derived_fields() {
        let catalog = vec![create_offer("1", "DXB", "LHR", 9, 0, 500.0)];

        let mut first = filter_route(&catalog, "DXB", "LHR");
        first[0].derived.score = 42.0;
        first[0].derived.is_bad_option = true;

        let second = filter_route(&catalog, "DXB", "LHR");
        assert_eq!(second[0].derived.score, 0.0);
        assert!(!second[0].derived.is_bad_option);
    }

    #[test]
    fn test_criteria_price_and_stops() {
        let criteria = SearchCriteria {
            max_price: Some(400.0),
            max_stops: Some(0),
            ..Default::default()
        };

        assert!(matches_criteria(&create_offer("1", "DXB", "LHR", 9, 0, 400.0), &criteria));
        assert!(!matches_criteria(&create_offer("2", "DXB", "LHR", 9, 0, 400.01), &criteria));
        assert!(!matches_criteria(&create_offer("3", "DXB", "LHR", 9, 1, 300.0), &criteria));
    }

    #[test]
    fn test_criteria_night_wraps_midnight() {
        let criteria = SearchCriteria {
            time_of_day: Some(TimeOfDay::Night),
            ..Default::default()
        };

        assert!(matches_criteria(&create_offer("1", "DXB", "LHR", 23, 0, 1.0), &criteria));
        assert!(matches_criteria(&create_offer("2", "DXB", "LHR", 2, 0, 1.0), &criteria));
        assert!(!matches_criteria(&create_offer("3", "DXB", "LHR", 5, 0, 1.0), &criteria));
        assert!(!matches_criteria(&create_offer("4", "DXB", "LHR", 20, 0, 1.0), &criteria));
    }

    #[test]
    fn test_empty_criteria_keeps_everything() {
        let criteria = SearchCriteria::default();
        assert!(matches_criteria(&create_offer("1", "DXB", "LHR", 3, 2, 9999.0), &criteria));
    }

    #[test]
    fn test_apply_criteria_adds_match_note() {
        let offers = filter_route(
            &[
                create_offer("1", "DXB", "LHR", 9, 0, 300.0),
                create_offer("2", "DXB", "LHR", 9, 2, 300.0),
            ],
            "DXB",
            "LHR",
        );
        let criteria = SearchCriteria {
            max_stops: Some(0),
            ..Default::default()
        };

        let kept = apply_criteria(offers, &criteria, "direct");

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].derived.boost_reason.as_deref(), Some("Matches 'direct'"));
    }
}

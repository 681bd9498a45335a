// Unit tests for Flight Rank

use flight_rank::core::{
    base_score, filters::matches_criteria, identify_bad_options, rank_order, recommend_guest,
    recommend_login, HistoryInsights, ScoringPolicy,
};
use flight_rank::models::{
    FlightOffer, HistoryRecord, InteractionKind, MaxStops, Preferences, ScoredOffer,
    SearchCriteria, TimeOfDay, UserProfile,
};
use chrono::NaiveDate;

fn create_offer(id: usize, airline: &str, price: f64, duration_minutes: u32, stops: u32) -> FlightOffer {
    let departure = NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt((id % 24) as u32, 30, 0)
        .unwrap();

    FlightOffer {
        flight_id: id.to_string(),
        airline: airline.to_string(),
        flight_number: format!("FR{}", 100 + id),
        origin: "DXB".to_string(),
        destination: "LHR".to_string(),
        departure_time: departure,
        arrival_time: departure + chrono::Duration::minutes(duration_minutes as i64),
        duration_minutes,
        stops,
        price,
        reliability_score: 0.9,
    }
}

fn create_history(airline: &str, stops: u32) -> HistoryRecord {
    HistoryRecord {
        flight_id: None,
        action: InteractionKind::Booked,
        timestamp: None,
        airline: airline.to_string(),
        origin: "DXB".to_string(),
        destination: "LHR".to_string(),
        stops,
        price: 600.0,
        duration_minutes: 450,
    }
}

/// Deterministic pseudo-random spread of offers
fn create_offer_set(count: usize) -> Vec<ScoredOffer> {
    let airlines = ["Emirates", "Delta", "Lufthansa", "Air India", "Qatar Airways"];
    (0..count)
        .map(|i| {
            let price = 300.0 + ((i * 37) % 500) as f64;
            let duration = 360 + ((i * 53) % 300) as u32;
            let stops = (i % 3) as u32;
            ScoredOffer::new(create_offer(i, airlines[i % airlines.len()], price, duration, stops))
        })
        .collect()
}

#[test]
fn test_detector_flags_only_threshold_breaches() {
    for size in [1, 2, 7, 40, 150] {
        let mut offers = create_offer_set(size);
        offers.push(ScoredOffer::new(create_offer(size, "Delta", 9000.0, 3000, 2)));

        let market = identify_bad_options(&mut offers).unwrap();

        for scored in &offers {
            let price_breach = scored.offer.price > market.avg_price * 1.5;
            let duration_breach = scored.offer.duration_minutes as f64 > market.avg_duration * 2.0;

            assert_eq!(scored.derived.is_bad_option, price_breach || duration_breach);
            assert_eq!(scored.derived.bad_option_reason.is_some(), scored.derived.is_bad_option);
        }
    }
}

#[test]
fn test_detector_order_independent() {
    let mut forward = create_offer_set(30);
    forward.push(ScoredOffer::new(create_offer(30, "Delta", 5000.0, 400, 0)));
    let mut reversed: Vec<ScoredOffer> = forward.iter().rev().cloned().collect();

    identify_bad_options(&mut forward);
    identify_bad_options(&mut reversed);

    for scored in &forward {
        let twin = reversed
            .iter()
            .find(|o| o.offer.flight_id == scored.offer.flight_id)
            .unwrap();
        assert_eq!(scored.derived.is_bad_option, twin.derived.is_bad_option);
    }
}

#[test]
fn test_detector_clears_stale_flags() {
    let mut offers = create_offer_set(5);
    offers[0].derived.is_bad_option = true;
    offers[0].derived.bad_option_reason = Some("stale".to_string());

    identify_bad_options(&mut offers);

    assert!(!offers[0].derived.is_bad_option);
    assert!(offers[0].derived.bad_option_reason.is_none());
}

#[test]
fn test_anonymous_score_depends_only_on_fare_fields() {
    let a = create_offer(1, "Emirates", 420.0, 480, 1);
    let mut b = create_offer(2, "Delta", 420.0, 480, 1);
    b.departure_time = b.departure_time + chrono::Duration::hours(9);
    b.reliability_score = 0.5;

    assert_eq!(base_score(&a), base_score(&b));
}

#[test]
fn test_personalized_never_exceeds_anonymous() {
    let history: Vec<HistoryRecord> = std::iter::repeat_with(|| create_history("Emirates", 0))
        .take(4)
        .collect();
    let profile = UserProfile::registered("u1", Preferences::default(), history);

    let mut anonymous = create_offer_set(50);
    let mut personalized = anonymous.clone();

    ScoringPolicy::Anonymous.apply(&mut anonymous);
    ScoringPolicy::for_profile(Some(&profile)).apply(&mut personalized);

    for (plain, boosted) in anonymous.iter().zip(&personalized) {
        assert!(boosted.score() <= plain.score());
    }
}

#[test]
fn test_recommendations_are_sorted_permutations() {
    let profile = UserProfile::registered(
        "u2",
        Preferences::default(),
        vec![create_history("Delta", 1), create_history("Delta", 0), create_history("Delta", 0)],
    );

    let input = create_offer_set(60);
    let mut input_ids: Vec<String> = input.iter().map(|o| o.offer.flight_id.clone()).collect();
    input_ids.sort();

    let outputs = [
        recommend_guest(input.clone()),
        recommend_login(Some(&profile), input.clone()),
        recommend_login(None, input.clone()),
    ];

    for output in outputs {
        assert_eq!(output.len(), input.len());
        assert!(output.windows(2).all(|w| w[0].score() <= w[1].score()));

        let mut ids: Vec<String> = output.iter().map(|o| o.offer.flight_id.clone()).collect();
        ids.sort();
        assert_eq!(ids, input_ids);
    }
}

#[test]
fn test_rank_order_keeps_catalog_order_on_ties() {
    let mut offers: Vec<ScoredOffer> = (0..6)
        .map(|i| ScoredOffer::new(create_offer(i, "Delta", 500.0, 400, 0)))
        .collect();
    ScoringPolicy::Anonymous.apply(&mut offers);

    assert_eq!(rank_order(&offers), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_history_insights_thresholds() {
    let two_hits = HistoryInsights::from_history(&[
        create_history("Emirates", 1),
        create_history("Emirates", 1),
    ]);
    assert!(two_hits.preferred_airlines.is_empty());
    assert!(!two_hits.prefers_direct);

    // Exactly half direct is not enough
    let half_direct = HistoryInsights::from_history(&[
        create_history("Delta", 0),
        create_history("Lufthansa", 1),
    ]);
    assert!(!half_direct.prefers_direct);

    assert!(HistoryInsights::from_history(&[]).is_empty());
}

#[test]
fn test_anonymous_profile_is_never_boosted() {
    let mut profile = UserProfile::anonymous("g1");
    profile.history = vec![create_history("Emirates", 0); 5];
    profile.preferences.max_stops = MaxStops::Limit(0);

    let mut offers = vec![ScoredOffer::new(create_offer(1, "Emirates", 500.0, 400, 0))];
    ScoringPolicy::for_profile(Some(&profile)).apply(&mut offers);

    assert_eq!(offers[0].score(), base_score(&offers[0].offer));
    assert!(offers[0].derived.boost_reason.is_none());
}

#[test]
fn test_criteria_constraints() {
    // departs 05:30
    let offer = create_offer(5, "Emirates", 399.0, 420, 0);

    assert!(matches_criteria(&offer, &SearchCriteria::default()));
    assert!(matches_criteria(
        &offer,
        &SearchCriteria {
            max_price: Some(399.0),
            max_stops: Some(0),
            time_of_day: Some(TimeOfDay::Morning),
            sort_by: None,
        }
    ));
    assert!(!matches_criteria(
        &offer,
        &SearchCriteria {
            max_price: Some(398.99),
            ..Default::default()
        }
    ));
    assert!(!matches_criteria(
        &offer,
        &SearchCriteria {
            time_of_day: Some(TimeOfDay::Night),
            ..Default::default()
        }
    ));
}

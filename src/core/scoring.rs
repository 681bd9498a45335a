use crate::models::{FlightOffer, HistoryRecord, ScoredOffer, UserProfile};
use std::collections::{BTreeMap, BTreeSet};

/// Score contribution per unit of price
pub const PRICE_WEIGHT: f64 = 0.4;
/// Score contribution per minute of travel
pub const DURATION_WEIGHT: f64 = 4.0;
/// Score contribution per stop
pub const STOP_PENALTY: f64 = 50.0;

/// Multiplier applied once per matched personal preference
pub const BOOST_MULTIPLIER: f64 = 0.8;
/// History hits needed before an airline counts as preferred
pub const PREFERRED_AIRLINE_MIN_HITS: usize = 3;
/// Share of direct flights in history above which direct flights are preferred
pub const DIRECT_PREFERENCE_RATIO: f64 = 0.5;

/// Calculate the base desirability score of an offer (lower is better)
///
/// Scoring formula:
/// score = price * 0.4 + duration_minutes * 4.0 + stops * 50
#[inline]
pub fn base_score(offer: &FlightOffer) -> f64 {
    offer.price * PRICE_WEIGHT
        + offer.duration_minutes as f64 * DURATION_WEIGHT
        + offer.stops as f64 * STOP_PENALTY
}

/// Preferences inferred from a user's interaction history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryInsights {
    pub preferred_airlines: BTreeSet<String>,
    pub prefers_direct: bool,
}

impl HistoryInsights {
    pub fn from_history(history: &[HistoryRecord]) -> Self {
        let mut airline_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut direct_count = 0usize;

        for record in history {
            *airline_counts.entry(record.airline.as_str()).or_default() += 1;
            if record.stops == 0 {
                direct_count += 1;
            }
        }

        let preferred_airlines = airline_counts
            .into_iter()
            .filter(|(_, count)| *count >= PREFERRED_AIRLINE_MIN_HITS)
            .map(|(airline, _)| airline.to_string())
            .collect();

        let prefers_direct = !history.is_empty()
            && (direct_count as f64 / history.len() as f64) > DIRECT_PREFERENCE_RATIO;

        Self {
            preferred_airlines,
            prefers_direct,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.preferred_airlines.is_empty() && !self.prefers_direct
    }

    /// Score the offer, applying each matching boost and noting why
    fn score(&self, scored: &mut ScoredOffer) {
        let mut multiplier = 1.0;

        if self.preferred_airlines.contains(&scored.offer.airline) {
            multiplier *= BOOST_MULTIPLIER;
            let note = format!("Preferred Airline: {}", scored.offer.airline);
            scored.add_boost_reason(&note);
        }

        if self.prefers_direct && scored.offer.is_direct() {
            multiplier *= BOOST_MULTIPLIER;
            scored.add_boost_reason("Preferred Direct Flight");
        }

        scored.derived.score = base_score(&scored.offer) * multiplier;
    }
}

/// How a search scores its offers
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringPolicy {
    /// Price, duration and stops only
    Anonymous,
    /// Base score with history-derived boosts
    Personalized(HistoryInsights),
}

impl ScoringPolicy {
    /// Pick the policy for a resolved profile
    ///
    /// A missing profile, or one whose history yields no insight (anonymous
    /// accounts included), scores anonymously.
    pub fn for_profile(profile: Option<&UserProfile>) -> Self {
        let insights = match profile {
            Some(profile) => HistoryInsights::from_history(profile.active_history()),
            None => return ScoringPolicy::Anonymous,
        };

        if insights.is_empty() {
            ScoringPolicy::Anonymous
        } else {
            ScoringPolicy::Personalized(insights)
        }
    }

    /// Write a score into every offer
    pub fn apply(&self, offers: &mut [ScoredOffer]) {
        match self {
            ScoringPolicy::Anonymous => {
                for scored in offers.iter_mut() {
                    scored.derived.score = base_score(&scored.offer);
                }
            }
            ScoringPolicy::Personalized(insights) => {
                for scored in offers.iter_mut() {
                    insights.score(scored);
                }
            }
        }
    }
}

/// Indices of `offers` in ascending score order, ties kept in input order
pub fn rank_order(offers: &[ScoredOffer]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..offers.len()).collect();
    order.sort_by(|&a, &b| offers[a].score().total_cmp(&offers[b].score()));
    order
}

fn sort_by_score(mut offers: Vec<ScoredOffer>) -> Vec<ScoredOffer> {
    offers.sort_by(|a, b| a.score().total_cmp(&b.score()));
    offers
}

/// Rank offers for a guest: base score, ascending
pub fn recommend_guest(mut offers: Vec<ScoredOffer>) -> Vec<ScoredOffer> {
    ScoringPolicy::Anonymous.apply(&mut offers);
    sort_by_score(offers)
}

/// Rank offers for a known user: boosted score, ascending
///
/// `None` degrades to [`recommend_guest`].
pub fn recommend_login(profile: Option<&UserProfile>, mut offers: Vec<ScoredOffer>) -> Vec<ScoredOffer> {
    ScoringPolicy::for_profile(profile).apply(&mut offers);
    sort_by_score(offers)
}

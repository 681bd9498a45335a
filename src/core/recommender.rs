use crate::core::{
    categorize::{categorize, materialize},
    detector::identify_bad_options,
    filters::{apply_criteria, filter_route},
    lodging::recommend_lodging,
    scoring::{rank_order, ScoringPolicy},
};
use crate::models::{
    ExplanationStatus, LodgingOffer, MarketSnapshot, Preferences, ScoredOffer, SearchMetadata,
    SearchResults, UserProfile, UserType, ViewLimits,
};
use crate::services::{fallback::explain_locally, Catalog, LanguageBridge};
use std::sync::Arc;
use thiserror::Error;

/// Search outcomes that end a search without results
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("No flights found for this route.")]
    NoOffersForRoute { origin: String, destination: String },

    #[error("No flights match your smart search: {query}")]
    NoSmartSearchMatch { query: String },
}

/// Main search orchestrator
///
/// # Pipeline Stages
/// 1. Route filter
/// 2. Query criteria filter (only with a non-empty query)
/// 3. Bad-option detection
/// 4. Scoring and ranking (anonymous or personalized)
/// 5. Categorization
/// 6. Explanations for the recommended view and the first bad options
///
/// All derived fields live on per-search copies of the catalog offers.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    bridge: LanguageBridge,
    limits: ViewLimits,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, bridge: LanguageBridge) -> Self {
        Self {
            catalog,
            bridge,
            limits: ViewLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ViewLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Filter, score and categorize the offers of one route
    ///
    /// # Arguments
    /// * `origin` / `destination` - Airport codes, matched case-insensitively
    /// * `user_id` - Profile to personalize for; unknown ids score anonymously
    /// * `query` - Optional free-text narrowing of the results
    pub async fn search(
        &self,
        origin: &str,
        destination: &str,
        user_id: Option<&str>,
        query: Option<&str>,
    ) -> Result<SearchResults, SearchError> {
        let mut offers = filter_route(self.catalog.flights(), origin, destination);

        if offers.is_empty() {
            tracing::info!("No offers for route {} -> {}", origin, destination);
            return Err(SearchError::NoOffersForRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
            });
        }

        tracing::debug!("{} offers on route {} -> {}", offers.len(), origin, destination);

        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let criteria = match query {
            Some(query) => {
                let criteria = self.bridge.interpret_query(query).await;
                if criteria.is_empty() {
                    tracing::debug!("Query '{}' imposes no constraints", query);
                } else {
                    tracing::debug!("Query '{}' interpreted as {:?}", query, criteria);
                }

                offers = apply_criteria(offers, &criteria, query);
                if offers.is_empty() {
                    return Err(SearchError::NoSmartSearchMatch {
                        query: query.to_string(),
                    });
                }
                Some(criteria)
            }
            None => None,
        };

        let market = identify_bad_options(&mut offers).unwrap_or_default();

        let profile = user_id.and_then(|id| self.resolve_user(id));
        ScoringPolicy::for_profile(profile).apply(&mut offers);
        let ranked = rank_order(&offers);

        let views = categorize(&offers, &ranked, &self.limits);

        let preferences = profile.and_then(UserProfile::active_preferences);
        let mut remote = !self.bridge.is_local();

        self.attach_explanations(
            &mut offers,
            &views.recommended,
            &market,
            preferences,
            ExplanationStatus::Recommended,
            &mut remote,
        )
        .await;

        let explained_bad = views.bad_options.len().min(self.limits.explained_bad_limit);
        self.attach_explanations(
            &mut offers,
            &views.bad_options[..explained_bad],
            &market,
            preferences,
            ExplanationStatus::Avoid,
            &mut remote,
        )
        .await;

        let user_type = if profile.is_some_and(UserProfile::is_registered) {
            UserType::LoggedIn
        } else {
            UserType::Guest
        };

        tracing::info!(
            "Search {} -> {} returned {} offers ({} flagged bad, user: {:?})",
            origin,
            destination,
            offers.len(),
            views.bad_options.len(),
            user_type
        );

        Ok(SearchResults {
            metadata: SearchMetadata {
                origin: origin.to_string(),
                destination: destination.to_string(),
                total_found: offers.len(),
                user_type,
                market_stats: market,
                criteria,
            },
            recommended: materialize(&offers, &views.recommended),
            cheapest: materialize(&offers, &views.cheapest),
            fastest: materialize(&offers, &views.fastest),
            bad_options_sample: materialize(&offers, &views.bad_options),
            lodging: None,
        })
    }

    /// Top `k` rated lodging offers in `city`
    pub fn recommend_lodging(&self, city: &str, k: usize) -> Vec<LodgingOffer> {
        if self.catalog.lodging().is_empty() {
            tracing::debug!("No lodging catalog loaded");
        }
        recommend_lodging(self.catalog.lodging(), city, k)
    }

    fn resolve_user(&self, user_id: &str) -> Option<&UserProfile> {
        let profile = self.catalog.user(user_id);
        if profile.is_none() {
            tracing::info!("User {} not found, defaulting to guest ranking", user_id);
        }
        profile
    }

    /// Write explanations onto the given offers
    ///
    /// After the first remote failure the rest of this search uses the
    /// rule-based text, so one slow service costs at most one timeout.
    async fn attach_explanations(
        &self,
        offers: &mut [ScoredOffer],
        indices: &[usize],
        market: &MarketSnapshot,
        preferences: Option<&Preferences>,
        status: ExplanationStatus,
        remote: &mut bool,
    ) {
        for &i in indices {
            let text = if *remote {
                match self.bridge.try_explain(&offers[i], market, preferences, status).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("Explanation service unavailable ({}), using rule-based text", e);
                        *remote = false;
                        explain_locally(&offers[i].offer, market, preferences, status)
                    }
                }
            } else {
                explain_locally(&offers[i].offer, market, preferences, status)
            };

            offers[i].derived.explanation = Some(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlightOffer, HistoryRecord, InteractionKind};
    use chrono::NaiveDate;

    fn create_offer(id: &str, airline: &str, hour: u32, price: f64, duration_minutes: u32, stops: u32) -> FlightOffer {
        let departure = NaiveDate::from_ymd_opt(2025, 2, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();

        FlightOffer {
            flight_id: id.to_string(),
            airline: airline.to_string(),
            flight_number: format!("{}1", &airline[..2].to_uppercase()),
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

    fn create_recommender() -> Recommender {
        let flights = vec![
            create_offer("1", "Emirates", 8, 500.0, 420, 0),
            create_offer("2", "Delta", 13, 350.0, 540, 1),
            create_offer("3", "Air India", 22, 2000.0, 700, 2),
            create_offer("4", "Emirates", 18, 450.0, 450, 1),
        ];
        let history = vec![
            HistoryRecord {
                flight_id: None,
                action: InteractionKind::Booked,
                timestamp: None,
                airline: "Emirates".to_string(),
                origin: "DXB".to_string(),
                destination: "LHR".to_string(),
                stops: 0,
                price: 500.0,
                duration_minutes: 420,
            };
            3
        ];
        let users = vec![UserProfile::registered("u1", Default::default(), history)];

        Recommender::new(Arc::new(Catalog::new(flights, users, vec![])), LanguageBridge::local())
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let recommender = create_recommender();

        let err = recommender.search("SIN", "HND", None, None).await.unwrap_err();

        assert!(matches!(err, SearchError::NoOffersForRoute { .. }));
        assert_eq!(err.to_string(), "No flights found for this route.");
    }

    #[tokio::test]
    async fn test_guest_search() {
        let recommender = create_recommender();

        let results = recommender.search("dxb", "lhr", None, None).await.unwrap();

        assert_eq!(results.metadata.total_found, 4);
        assert_eq!(results.metadata.user_type, UserType::Guest);
        assert_eq!(results.recommended.len(), 4);
        assert_eq!(results.bad_options_sample.len(), 1);
        assert_eq!(results.bad_options_sample[0].offer.flight_id, "3");
        assert!(results.recommended.iter().all(|o| o.derived.explanation.is_some()));
        assert!(results.bad_options_sample[0]
            .derived
            .explanation
            .as_deref()
            .unwrap()
            .starts_with("Note:"));
    }

    #[tokio::test]
    async fn test_query_without_matches() {
        let recommender = create_recommender();

        let err = recommender
            .search("DXB", "LHR", None, Some("direct flights under $100"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SearchError::NoSmartSearchMatch {
                query: "direct flights under $100".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_query_with_grouped_price() {
        let recommender = create_recommender();

        let results = recommender
            .search("DXB", "LHR", None, Some("anything under $1,000"))
            .await
            .unwrap();

        assert_eq!(results.metadata.criteria.as_ref().and_then(|c| c.max_price), Some(1000.0));
        assert_eq!(results.metadata.total_found, 3);
        assert!(results.recommended.iter().all(|o| o.offer.flight_id != "3"));
    }

    #[tokio::test]
    async fn test_blank_query_is_no_query() {
        let recommender = create_recommender();

        let results = recommender.search("DXB", "LHR", None, Some("   ")).await.unwrap();

        assert!(results.metadata.criteria.is_none());
        assert_eq!(results.metadata.total_found, 4);
    }

    #[tokio::test]
    async fn test_personalized_search() {
        let recommender = create_recommender();

        let results = recommender.search("DXB", "LHR", Some("u1"), None).await.unwrap();

        assert_eq!(results.metadata.user_type, UserType::LoggedIn);
        let emirates = results
            .recommended
            .iter()
            .find(|o| o.offer.flight_id == "4")
            .unwrap();
        assert_eq!(emirates.derived.boost_reason.as_deref(), Some("Preferred Airline: Emirates"));
    }

    #[tokio::test]
    async fn test_unknown_user_scores_as_guest() {
        let recommender = create_recommender();

        let guest = recommender.search("DXB", "LHR", None, None).await.unwrap();
        let unknown = recommender.search("DXB", "LHR", Some("nobody"), None).await.unwrap();

        assert_eq!(guest, unknown);
    }

    #[test]
    fn test_lodging_without_catalog() {
        let recommender = create_recommender();
        assert!(recommender.recommend_lodging("LHR", 3).is_empty());
    }
}

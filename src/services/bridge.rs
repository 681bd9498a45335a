use crate::models::{ExplanationStatus, MarketSnapshot, Preferences, ScoredOffer, SearchCriteria};
use crate::services::fallback::parse_keywords;
use crate::services::llm::{LlmError, TextGenerator};
use std::sync::Arc;
use std::time::Duration;

/// Default upper bound on a single text-generation call
pub const DEFAULT_BRIDGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Adapter between the search core and the text-generation service
///
/// Backs both the query interpreter and the explanation generator. Query
/// interpretation always produces criteria, degrading to the keyword parser
/// in [`crate::services::fallback`]. Explanations surface the failure so the
/// caller can switch the rest of its search to rule-based text.
#[derive(Clone)]
pub struct LanguageBridge {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl LanguageBridge {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            timeout,
        }
    }

    /// Bridge that never leaves the process
    pub fn local() -> Self {
        Self {
            generator: None,
            timeout: DEFAULT_BRIDGE_TIMEOUT,
        }
    }

    pub fn is_local(&self) -> bool {
        self.generator.is_none()
    }

    async fn call(&self, prompt: &str) -> Result<String, LlmError> {
        let generator = self.generator.as_ref().ok_or(LlmError::Disabled)?;

        match tokio::time::timeout(self.timeout, generator.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        }
    }

    /// Turn free text into structured criteria
    ///
    /// An empty query yields empty criteria without any remote call.
    pub async fn interpret_query(&self, query: &str) -> SearchCriteria {
        let query = query.trim();
        if query.is_empty() {
            return SearchCriteria::default();
        }

        let remote = match self.call(&query_prompt(query)).await {
            Ok(text) => parse_criteria(&text),
            Err(e) => Err(e),
        };

        match remote {
            Ok(criteria) => criteria,
            Err(LlmError::Disabled) => parse_keywords(query),
            Err(e) => {
                tracing::warn!("Query interpretation failed ({}), falling back to keywords", e);
                parse_keywords(query)
            }
        }
    }

    /// Ask the remote service for a justification, without fallback
    pub async fn try_explain(
        &self,
        offer: &ScoredOffer,
        market: &MarketSnapshot,
        preferences: Option<&Preferences>,
        status: ExplanationStatus,
    ) -> Result<String, LlmError> {
        let text = self
            .call(&explanation_prompt(offer, market, preferences, status))
            .await?;

        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse("Empty explanation".into()));
        }

        Ok(text.to_string())
    }
}

/// Parse model output into criteria, unwrapping markdown code fences
pub fn parse_criteria(text: &str) -> Result<SearchCriteria, LlmError> {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    serde_json::from_str(body.trim())
        .map_err(|e| LlmError::InvalidResponse(format!("Unusable criteria: {}", e)))
}

fn query_prompt(query: &str) -> String {
    format!(
        r#"Extract search filters from this user query for flight search.
Return ONLY a raw JSON object (no markdown). Omit fields the query does not mention.
Fields:
- max_price (number): if mentioned (e.g. "under 500")
- max_stops (integer): if mentioned ("direct" is 0, "1 stop" is 1)
- time_of_day (string): "morning" (5-12), "afternoon" (12-17), "evening" (17-21), "night" (21-5)
- sort_by (string): "price" or "duration"

User Query: "{}""#,
        query
    )
}

fn explanation_prompt(
    scored: &ScoredOffer,
    market: &MarketSnapshot,
    preferences: Option<&Preferences>,
    status: ExplanationStatus,
) -> String {
    let offer = &scored.offer;
    let prefs = preferences
        .and_then(|p| serde_json::to_string(p).ok())
        .unwrap_or_else(|| "None".to_string());

    format!(
        r#"You are an AI travel assistant.

Context:
- Flight: {} to {}, ${:.2}, {}m, {} stops.
- Market Average: ${:.2}, {:.0}m.
- User Preferences: {}
- Status: {}

Task: Explain why this flight is {} in 1 short sentence (max 20 words).
- If Recommended: highlight savings or time benefits explicitly (e.g. "20% cheaper", "3h faster").
- If Avoid: highlight downsides explicitly (e.g. "Price is 50% above average", "2x longer duration")."#,
        offer.airline,
        offer.destination,
        offer.price,
        offer.duration_minutes,
        offer.stops,
        market.avg_price,
        market.avg_duration,
        prefs,
        status,
        status
    )
}

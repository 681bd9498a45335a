use crate::models::{MarketSnapshot, ScoredOffer};

/// Price above `mean * PRICE_FACTOR` marks an offer as a bad option
pub const PRICE_FACTOR: f64 = 1.5;
/// Duration above `mean * DURATION_FACTOR` marks an offer as a bad option
pub const DURATION_FACTOR: f64 = 2.0;

/// Flag offers that sit far above the route's price or duration norms
///
/// Every offer ends up with an explicit flag; breached thresholds are
/// described in `bad_option_reason`, space-joined when both apply.
/// Returns the snapshot the thresholds were derived from, or `None` for an
/// empty set (nothing is touched).
pub fn identify_bad_options(offers: &mut [ScoredOffer]) -> Option<MarketSnapshot> {
    let market = MarketSnapshot::from_offers(offers)?;

    let price_threshold = market.avg_price * PRICE_FACTOR;
    let duration_threshold = market.avg_duration * DURATION_FACTOR;

    for scored in offers.iter_mut() {
        let offer = &scored.offer;
        let mut reasons = Vec::new();

        if offer.price > price_threshold {
            reasons.push(format!(
                "Price (${:.2}) is significantly higher than average (${:.2}).",
                offer.price, market.avg_price
            ));
        }

        if offer.duration_minutes as f64 > duration_threshold {
            reasons.push(format!(
                "Duration ({}m) is significantly longer than average ({:.0}m).",
                offer.duration_minutes, market.avg_duration
            ));
        }

        scored.derived.is_bad_option = !reasons.is_empty();
        scored.derived.bad_option_reason = if reasons.is_empty() {
            None
        } else {
            Some(reasons.join(" "))
        };
    }

    Some(market)
}

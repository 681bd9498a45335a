use crate::models::{ScoredOffer, ViewLimits};

/// Index-based result views over a per-request offer arena
///
/// Indices point into the filtered offer set, which is kept in catalog
/// order. Materialising happens after explanations are attached, so every
/// view sees the same derived fields for the same offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedViews {
    pub recommended: Vec<usize>,
    pub cheapest: Vec<usize>,
    pub fastest: Vec<usize>,
    pub bad_options: Vec<usize>,
}

/// Derive the four result views from a scored, flagged offer set
///
/// Bad options are not removed from any view.
pub fn categorize(offers: &[ScoredOffer], ranked: &[usize], limits: &ViewLimits) -> CategorizedViews {
    let mut fastest: Vec<usize> = (0..offers.len()).collect();
    fastest.sort_by_key(|&i| offers[i].offer.duration_minutes);
    fastest.truncate(limits.view_limit);

    let mut cheapest: Vec<usize> = (0..offers.len()).collect();
    cheapest.sort_by(|&a, &b| offers[a].offer.price.total_cmp(&offers[b].offer.price));
    cheapest.truncate(limits.view_limit);

    let recommended: Vec<usize> = ranked.iter().copied().take(limits.view_limit).collect();

    let bad_options: Vec<usize> = (0..offers.len())
        .filter(|&i| offers[i].derived.is_bad_option)
        .take(limits.bad_sample_limit)
        .collect();

    CategorizedViews {
        recommended,
        cheapest,
        fastest,
        bad_options,
    }
}

/// Clone the offers a view points at, in view order
pub fn materialize(offers: &[ScoredOffer], view: &[usize]) -> Vec<ScoredOffer> {
    view.iter().map(|&i| offers[i].clone()).collect()
}

use crate::models::LodgingOffer;

/// Default number of lodging offers returned per city
pub const DEFAULT_LODGING_COUNT: usize = 3;

/// Top `k` lodging offers in `city` by rating, highest first
///
/// City matching is case-insensitive; equal ratings keep catalog order.
/// No catalog or no matching city yields an empty list.
pub fn recommend_lodging(catalog: &[LodgingOffer], city: &str, k: usize) -> Vec<LodgingOffer> {
    let mut relevant: Vec<&LodgingOffer> = catalog
        .iter()
        .filter(|lodging| lodging.city.eq_ignore_ascii_case(city))
        .collect();

    relevant.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    relevant.into_iter().take(k).cloned().collect()
}

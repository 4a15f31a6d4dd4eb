use crate::tariff::RateBracket;
use itertools::Itertools;

/// Tiered cost of `volume` over `brackets`, like a progressive tax.
///
/// Brackets are walked in ascending `from` order whatever order they are
/// stored in. Each bracket absorbs at most its inclusive width; the open-ended
/// tier absorbs everything left. Overlaps and gaps are not detected here.
pub fn progressive_cost(volume: f64, brackets: &[RateBracket]) -> f64 {
    let mut cost = 0.0;
    let mut remaining = volume;

    for bracket in brackets
        .iter()
        .sorted_by(|a, b| a.from.total_cmp(&b.from))
    {
        if remaining <= 0.0 {
            break;
        }
        let consumed = match bracket.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        cost += consumed * bracket.rate;
        remaining -= consumed;
    }

    cost
}

/// Linear blend between a subsidised and a full-market rate.
///
/// `multiplier` 1.0 gives the subsidised rate, 0.0 the full rate; fractions
/// interpolate.
pub fn blended_rate(subsidy_rate: f64, full_rate: f64, multiplier: f64) -> f64 {
    subsidy_rate * multiplier + full_rate * (1.0 - multiplier)
}

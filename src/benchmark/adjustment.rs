use super::settings::{AdjustmentKind, HouseCoefficients};
use crate::evaluator::CostBreakdown;
use ahash::AHashMap;

/// Turns scenario costs into the "average neighbor" estimate.
///
/// Every service is scaled by the house coefficient of its adjustment kind
/// (1 for services without one) and by the realism uplift. The total is
/// rounded from the exact adjusted sum; each service is rounded to cents
/// only for presentation.
pub fn apply_neighbor_adjustment(
    costs: &CostBreakdown,
    kinds: &AHashMap<String, AdjustmentKind>,
    coefficients: HouseCoefficients,
    realism_uplift: f64,
) -> CostBreakdown {
    let adjusted = costs
        .iter()
        .map(|(service, cost)| {
            let house = kinds
                .get(service)
                .map_or(1.0, |kind| coefficients.for_kind(*kind));
            (service.to_string(), cost * house * realism_uplift)
        })
        .collect();
    CostBreakdown::from_unrounded(adjusted)
}

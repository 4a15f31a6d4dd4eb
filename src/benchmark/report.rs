use super::adjustment::apply_neighbor_adjustment;
use super::settings::{BenchmarkSettings, HouseCategory, Scenario};
use crate::data::Household;
use crate::error::BenchmarkError;
use crate::evaluator::{CostBreakdown, Evaluator, round_currency};
use crate::tariff::TariffRegistry;
use crate::volume::estimate_volumes;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Spending above the ideal by more than this many currency units counts as overspend.
pub const OVERSPEND_TOLERANCE: f64 = 1.0;

/// One line of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRow {
    pub service: String,
    pub ideal: f64,
    pub actual: f64,
    pub neighbor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub ideal: f64,
    pub actual: f64,
    pub neighbor: f64,
}

/// Verdict for one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Advice {
    WithinNorm,
    /// `percent` is the overspend relative to the ideal cost.
    Overspend { percent: f64, tip: String },
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advice::WithinNorm => write!(f, "spending within norm"),
            Advice::Overspend { percent, tip } => {
                write!(f, "overspend {:.0}%: {}", percent, tip)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationCard {
    pub service: String,
    pub icon: String,
    pub advice: Advice,
}

/// Ideal, self-reported and neighbor costs for one household, side by side.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub city: String,
    pub currency: String,
    pub scenario: Scenario,
    pub house_category: HouseCategory,
    pub rows: Vec<ServiceRow>,
    /// Self-reported categories outside the tariffs (e.g. rent); not in any total.
    pub extras: Vec<(String, f64)>,
    pub totals: Totals,
    pub recommendations: Vec<RecommendationCard>,
    pub ideal: CostBreakdown,
    pub neighbor: CostBreakdown,
}

/// Compares a household's reported costs against the normative and the
/// neighbor estimate for its city.
///
/// The ideal estimate uses a behaviour factor of 1.0; the neighbor estimate
/// uses the household's scenario and is then adjusted for the house category.
pub fn run_benchmark(
    registry: &TariffRegistry,
    household: &Household,
    settings: &BenchmarkSettings,
) -> Result<BenchmarkReport, BenchmarkError> {
    let city = registry
        .city(&household.city)
        .ok_or_else(|| BenchmarkError::UnknownCity(household.city.clone()))?;
    let evaluator = Evaluator::new(registry);
    let context = household.context();

    let ideal_volumes = estimate_volumes(city, &household.volume_input(1.0));
    let ideal = evaluator.evaluate(&household.city, &ideal_volumes, &context);

    let behavior = settings.behavior_factor(household.scenario);
    let neighbor_volumes = estimate_volumes(city, &household.volume_input(behavior));
    let neighbor_base = evaluator.evaluate(&household.city, &neighbor_volumes, &context);
    let neighbor = apply_neighbor_adjustment(
        &neighbor_base,
        &city.adjustment_kinds,
        settings.coefficients(household.house_category),
        settings.realism_uplift,
    );
    debug!(
        city = %household.city,
        ideal = ideal.total(),
        neighbor = neighbor.total(),
        "benchmark evaluated"
    );

    let rows: Vec<ServiceRow> = city
        .tariffs
        .services()
        .map(|service| ServiceRow {
            service: service.to_string(),
            ideal: ideal.get(service).unwrap_or(0.0),
            actual: household.actual(service),
            neighbor: neighbor.get(service).unwrap_or(0.0),
        })
        .collect();

    let extras = city
        .extra_categories
        .iter()
        .map(|category| (category.clone(), household.actual(category)))
        .collect();

    let totals = Totals {
        ideal: ideal.total(),
        actual: round_currency(rows.iter().map(|row| row.actual).sum()),
        neighbor: neighbor.total(),
    };

    let recommendations = city
        .recommendations
        .iter()
        .map(|(service, recommendation)| {
            let ideal_cost = ideal.get(service).unwrap_or(0.0);
            RecommendationCard {
                service: service.clone(),
                icon: recommendation.icon.clone(),
                advice: advise(
                    household.actual(service),
                    ideal_cost,
                    &recommendation.tip,
                ),
            }
        })
        .collect();

    Ok(BenchmarkReport {
        city: household.city.clone(),
        currency: city.currency.clone(),
        scenario: household.scenario,
        house_category: household.house_category,
        rows,
        extras,
        totals,
        recommendations,
        ideal,
        neighbor,
    })
}

/// Overspend when the actual cost exceeds a positive ideal by more than the tolerance.
pub fn advise(actual: f64, ideal: f64, tip: &str) -> Advice {
    let difference = actual - ideal;
    if difference > OVERSPEND_TOLERANCE && ideal > 0.0 {
        Advice::Overspend {
            percent: difference / ideal * 100.0,
            tip: tip.to_string(),
        }
    } else {
        Advice::WithinNorm
    }
}

//! Common test utilities for building tariff rules, registries and households.
use utility_bench::prelude::*;

/// The bundled sample configuration (Minsk and Limassol).
#[allow(dead_code)]
pub const UTILITIES_JSON: &str = include_str!("../data/utilities.json");

#[allow(dead_code)]
pub const MINSK: &str = "Минск";
#[allow(dead_code)]
pub const LIMASSOL: &str = "Лимасол";

/// Loads the bundled sample configuration.
#[allow(dead_code)]
pub fn sample_registry() -> TariffRegistry {
    TariffRegistry::from_json(UTILITIES_JSON).expect("bundled configuration must load")
}

/// Wraps a single rule into a one-city, one-service registry.
#[allow(dead_code)]
pub fn single_rule_registry(service: &str, rule: TariffRule) -> TariffRegistry {
    let city = City::new("EUR", "").with_tariffs(TariffSet::empty().with(service, rule));
    TariffRegistry::new(vec![("Testville".to_string(), city)]).expect("valid registry")
}

/// Evaluates one rule on its own and returns the rounded cost.
#[allow(dead_code)]
pub fn cost_of(rule: TariffRule, volumes: &VolumeTable, context: &CalculationContext) -> f64 {
    let registry = single_rule_registry("Service", rule);
    Evaluator::new(&registry)
        .evaluate("Testville", volumes, context)
        .get("Service")
        .expect("service must be present")
}

/// `get_volume(source) -> multiply_by_param(rate)`.
#[allow(dead_code)]
pub fn flat_rate_rule(source: &str, rate: f64) -> TariffRule {
    TariffRule::new(vec![
        Step::GetVolume {
            source: source.to_string(),
        },
        Step::MultiplyByParam {
            key: "rate".to_string(),
        },
    ])
    .with_param("rate", rate)
}

/// Limassol's water tiers: 1-40 at 0.9, 41-80 at 1.43.
#[allow(dead_code)]
pub fn water_brackets() -> Vec<RateBracket> {
    vec![
        RateBracket::new(1.0, Some(40.0), 0.9),
        RateBracket::new(41.0, Some(80.0), 1.43),
    ]
}

/// `get_volume(Вода) -> apply_progressive_rate(brackets)`.
#[allow(dead_code)]
pub fn progressive_rule(brackets: Vec<RateBracket>) -> TariffRule {
    TariffRule::new(vec![
        Step::GetVolume {
            source: "Вода".to_string(),
        },
        Step::ApplyProgressiveRate {
            brackets_key: "brackets".to_string(),
        },
    ])
    .with_param("brackets", brackets)
}

/// A 90 m², three-person flat on the fifth floor in Minsk, in January.
#[allow(dead_code)]
pub fn minsk_household() -> Household {
    let mut household = Household::new(MINSK, 90.0, 3);
    household.month = 1;
    household.floor = 5;
    household
}

/// An 80 m² flat for two in Limassol.
#[allow(dead_code)]
pub fn limassol_household() -> Household {
    Household::new(LIMASSOL, 80.0, 2)
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

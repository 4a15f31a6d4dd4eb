//! Unit tests for volume models, neighbor adjustment, tracing and lint.
mod common;
use ahash::AHashMap;
use common::*;
use utility_bench::benchmark::{AdjustmentKind, HouseCoefficients, apply_neighbor_adjustment};
use utility_bench::context::{AREA_M2, FLOOR, OCCUPANTS, SUBSIDY_MULTIPLIER};
use utility_bench::evaluator::CostBreakdown;
use utility_bench::lint::{Issue, lint, lint_rule};
use utility_bench::prelude::*;
use utility_bench::volume::{ELECTRICITY, HEATING, SEWERAGE, VolumeModel, WATER};

fn input(area_m2: f64, occupants: f64, month: u32, behavior_factor: f64) -> VolumeInput {
    VolumeInput {
        area_m2,
        occupants,
        month,
        behavior_factor,
    }
}

#[test]
fn test_minsk_volume_model() {
    let months = [1, 2, 3, 4, 10, 11, 12];
    let volumes = VolumeModel::StandardMinsk.estimate(&input(90.0, 3.0, 1, 1.0), &months);
    assert_eq!(volumes.get(ELECTRICITY), Some(330.0));
    assert_eq!(volumes.get(WATER), Some(13.5));
    assert_eq!(volumes.get(SEWERAGE), Some(13.5));
    assert_close(volumes.get(HEATING).unwrap(), 0.15 * 90.0 / 7.0);

    let summer = VolumeModel::StandardMinsk.estimate(&input(90.0, 3.0, 6, 1.0), &months);
    assert_eq!(summer.get(HEATING), Some(0.0));

    let no_season = VolumeModel::StandardMinsk.estimate(&input(90.0, 3.0, 1, 1.0), &[]);
    assert_eq!(no_season.get(HEATING), Some(0.0));
}

#[test]
fn test_behaviour_factor_scales_only_behavioural_volumes() {
    let months = [1, 2, 3, 4, 10, 11, 12];
    let normal = VolumeModel::StandardMinsk.estimate(&input(90.0, 3.0, 1, 1.0), &months);
    let wasteful = VolumeModel::StandardMinsk.estimate(&input(90.0, 3.0, 1, 1.25), &months);

    assert_eq!(wasteful.get(ELECTRICITY), Some(412.5));
    assert_eq!(wasteful.get(WATER), Some(16.875));
    assert_eq!(wasteful.get(HEATING), normal.get(HEATING));
}

#[test]
fn test_limassol_volume_model() {
    let volumes = VolumeModel::StandardLimassol.estimate(&input(80.0, 2.0, 7, 1.0), &[]);
    assert_eq!(volumes.len(), 2);
    assert_eq!(volumes.get(ELECTRICITY), Some(540.0));
    assert_eq!(volumes.get(WATER), Some(8.0));
}

#[test]
fn test_volume_model_names() {
    for model in [VolumeModel::StandardMinsk, VolumeModel::StandardLimassol] {
        assert_eq!(VolumeModel::from_name(model.name()), Some(model));
    }
    assert_eq!(VolumeModel::from_name("standard_paris"), None);
}

#[test]
fn test_unknown_volume_model_estimates_nothing() {
    let city = City::new("EUR", "standard_paris");
    let volumes = estimate_volumes(&city, &input(50.0, 1.0, 1, 1.0));
    assert!(volumes.is_empty());
}

#[test]
fn test_neighbor_adjustment() {
    let costs = CostBreakdown::from_costs(vec![
        ("Электроэнергия".to_string(), 100.0),
        ("Вода".to_string(), 10.0),
    ]);
    let kinds = AHashMap::from_iter([("Электроэнергия".to_string(), AdjustmentKind::Electricity)]);
    let coefficients = HouseCoefficients {
        heating: 1.1,
        electricity: 1.05,
    };

    let adjusted = apply_neighbor_adjustment(&costs, &kinds, coefficients, 1.07);
    assert_eq!(adjusted.get("Электроэнергия"), Some(112.35));
    assert_eq!(adjusted.get("Вода"), Some(10.7));
    assert_eq!(adjusted.total(), 123.05);
}

#[test]
fn test_neighbor_total_uses_unrounded_services() {
    let costs = CostBreakdown::from_costs(vec![
        ("Интернет".to_string(), 1.05),
        ("Телефон".to_string(), 1.05),
    ]);
    let adjusted =
        apply_neighbor_adjustment(&costs, &AHashMap::new(), HouseCoefficients::NEUTRAL, 1.07);

    // 1.1235 each: the rows show 1.12 but the total is round(2.247).
    assert_eq!(adjusted.get("Интернет"), Some(1.12));
    assert_eq!(adjusted.get("Телефон"), Some(1.12));
    assert_eq!(adjusted.total(), 2.25);
}

#[test]
fn test_from_unrounded_breakdown() {
    let costs = CostBreakdown::from_unrounded(vec![
        ("A".to_string(), 0.004),
        ("B".to_string(), 0.004),
    ]);
    assert_eq!(costs.get("A"), Some(0.0));
    assert_eq!(costs.total(), 0.01);
}

#[test]
fn test_neutral_adjustment_keeps_costs() {
    let costs = CostBreakdown::from_costs(vec![("Вода".to_string(), 24.11)]);
    let adjusted =
        apply_neighbor_adjustment(&costs, &AHashMap::new(), HouseCoefficients::NEUTRAL, 1.0);
    assert_eq!(adjusted, costs);
}

#[test]
fn test_default_benchmark_settings() {
    let settings = BenchmarkSettings::default();
    assert_eq!(settings.behavior_factor(Scenario::Economical), 0.85);
    assert_eq!(settings.behavior_factor(Scenario::Average), 1.0);
    assert_eq!(settings.behavior_factor(Scenario::Wasteful), 1.25);
    assert_eq!(settings.coefficients(HouseCategory::New), HouseCoefficients::NEUTRAL);
    assert_eq!(
        settings.coefficients(HouseCategory::Old).for_kind(AdjustmentKind::Heating),
        1.1
    );
    assert_eq!(
        settings.coefficients(HouseCategory::Old).for_kind(AdjustmentKind::Electricity),
        1.05
    );
}

#[test]
fn test_household_json_defaults() {
    let household = Household::from_json(r#"{"city": "Минск", "area_m2": 50, "occupants": 2}"#)
        .expect("minimal household should parse");
    assert_eq!(household.month, 1);
    assert_eq!(household.floor, 1);
    assert_eq!(household.scenario, Scenario::Average);
    assert_eq!(household.house_category, HouseCategory::Average);
    assert!(household.subsidized);
    assert_eq!(household.actual("Вода"), 0.0);

    let context = household.context();
    assert_eq!(context.get(AREA_M2), Some(50.0));
    assert_eq!(context.get(OCCUPANTS), Some(2.0));
    assert_eq!(context.get(FLOOR), Some(1.0));
    assert_eq!(context.get(SUBSIDY_MULTIPLIER), Some(1.0));
}

#[test]
fn test_household_json_overrides() {
    let household = Household::from_json(
        r#"{"city": "Минск", "area_m2": 50, "occupants": 2,
            "scenario": "wasteful", "house_category": "old", "subsidized": false}"#,
    )
    .unwrap();
    assert_eq!(household.scenario, Scenario::Wasteful);
    assert_eq!(household.house_category, HouseCategory::Old);
    assert_eq!(household.context().get(SUBSIDY_MULTIPLIER), Some(0.0));

    assert!(Household::from_json(r#"{"city": "Минск"}"#).is_err());
    assert!(Household::from_file("does/not/exist.json").is_err());
}

#[test]
fn test_household_rejects_unusable_fields() {
    let month = Household::from_json(r#"{"city": "Минск", "area_m2": 50, "occupants": 2, "month": 13}"#);
    assert!(matches!(
        month,
        Err(DataError::InvalidField { field: "month", .. })
    ));

    let area = Household::from_json(r#"{"city": "Минск", "area_m2": -5, "occupants": 2}"#);
    assert!(matches!(
        area,
        Err(DataError::InvalidField { field: "area_m2", .. })
    ));

    // Fractional occupants are not silently truncated.
    assert!(Household::from_json(r#"{"city": "Минск", "area_m2": 50, "occupants": 2.5}"#).is_err());

    let mut household = minsk_household();
    household.month = 0;
    assert!(household.validate().is_err());
    household.month = 12;
    assert!(household.validate().is_ok());
}

#[test]
fn test_context_from_json() {
    let context: CalculationContext =
        serde_json::from_str(r#"{"area_m2": 72.5, "has_elevator": true}"#).unwrap();
    assert_eq!(context.get("area_m2"), Some(72.5));
    assert_eq!(context.get("has_elevator"), Some(1.0));
    assert_eq!(context.get("missing"), None);
    assert_eq!(ContextValue::Bool(false).as_f64(), 0.0);
}

#[test]
fn test_trace_formatter() {
    let registry = single_rule_registry("Вода", flat_rate_rule("Вода", 1.7858));
    let volumes = VolumeTable::new().with("Вода", 13.5);
    let trace = Evaluator::new(&registry)
        .explain("Testville", "Вода", &volumes, &CalculationContext::new())
        .unwrap();

    assert_eq!(
        TraceFormatter::format_trace(&trace),
        "Вода\n  get_volume(Вода): 0 -> 13.5\n  multiply_by_param(rate): 13.5 -> 24.1083\n  = 24.11"
    );
}

#[test]
fn test_trace_formatter_indents_branches() {
    let rule = TariffRule::new(vec![Step::SumOfSteps {
        pipelines: vec![
            vec![Step::GetFixedAmount {
                key: "min".to_string(),
            }],
            vec![Step::GetFixedAmount {
                key: "max".to_string(),
            }],
        ],
    }])
    .with_param("min", 45.0)
    .with_param("max", 125.0);
    let registry = single_rule_registry("Обслуживание", rule);
    let trace = Evaluator::new(&registry)
        .explain(
            "Testville",
            "Обслуживание",
            &VolumeTable::new(),
            &CalculationContext::new(),
        )
        .unwrap();

    let text = TraceFormatter::format_trace(&trace);
    assert!(text.contains("  sum_of_steps(2 pipelines): 0 -> 170\n"), "{}", text);
    assert!(text.contains("    [1]\n      get_fixed_amount(min): 0 -> 45\n"), "{}", text);
    assert!(text.contains("    [2]\n      get_fixed_amount(max): 0 -> 125\n"), "{}", text);
    assert!(text.ends_with("  = 170.00"));
}

#[test]
fn test_bundled_configuration_is_lint_clean() {
    let diagnostics = lint(&sample_registry());
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
}

#[test]
fn test_lint_flags_bracket_problems() {
    let gap = progressive_rule(vec![
        RateBracket::new(1.0, Some(40.0), 0.9),
        RateBracket::new(45.0, Some(80.0), 1.43),
    ]);
    assert_eq!(
        lint_rule(&gap),
        vec![Issue::BracketGap {
            key: "brackets".to_string(),
            from: 41.0,
            to: 44.0,
        }]
    );

    let overlap = progressive_rule(vec![
        RateBracket::new(1.0, Some(40.0), 0.9),
        RateBracket::new(30.0, Some(80.0), 1.43),
    ]);
    assert_eq!(
        lint_rule(&overlap),
        vec![Issue::OverlappingBrackets {
            key: "brackets".to_string(),
            at: 30.0,
        }]
    );

    let unsorted = progressive_rule(vec![
        RateBracket::new(41.0, Some(80.0), 1.43),
        RateBracket::new(1.0, Some(40.0), 0.9),
    ]);
    assert_eq!(
        lint_rule(&unsorted),
        vec![Issue::UnsortedBrackets("brackets".to_string())]
    );

    let open_first = progressive_rule(vec![
        RateBracket::new(1.0, None, 0.9),
        RateBracket::new(41.0, Some(80.0), 1.43),
    ]);
    assert_eq!(
        lint_rule(&open_first),
        vec![Issue::OpenBracketNotLast("brackets".to_string())]
    );

    let inverted = progressive_rule(vec![RateBracket::new(40.0, Some(1.0), 0.9)]);
    assert_eq!(
        lint_rule(&inverted),
        vec![Issue::InvertedBracket {
            key: "brackets".to_string(),
            from: 40.0,
            to: 1.0,
        }]
    );
}

#[test]
fn test_lint_flags_parameter_problems() {
    let rule = TariffRule::new(vec![
        Step::GetVolume {
            source: "Вода".to_string(),
        },
        Step::MultiplyByParam {
            key: "rate".to_string(),
        },
        Step::ApplyProgressiveRate {
            brackets_key: "tiers".to_string(),
        },
        Step::unknown("apply_discount"),
        Step::ApplyVat,
    ])
    .with_param("tiers", 2.0)
    .with_vat(19.0);

    let issues = lint_rule(&rule);
    assert_eq!(
        issues,
        vec![
            Issue::VatOutOfRange(19.0),
            Issue::MissingParam("rate".to_string()),
            Issue::ParamTypeMismatch {
                key: "tiers".to_string(),
                expected: "bracket list",
                found: "number",
            },
            Issue::UnknownOperator("apply_discount".to_string()),
        ]
    );
}

#[test]
fn test_lint_reports_city_and_service() {
    let rule = TariffRule::new(vec![Step::GetFixedAmount {
        key: "amount".to_string(),
    }]);
    let registry = single_rule_registry("Интернет", rule);
    let diagnostics = lint(&registry);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].city, "Testville");
    assert_eq!(diagnostics[0].service, "Интернет");
    assert_eq!(
        diagnostics[0].to_string(),
        "Testville / Интернет: parameter 'amount' is referenced but not defined"
    );
}

//! Integration tests for Utility Bench
//!
//! End-to-end tests that load the bundled configuration, estimate volumes and
//! benchmark households against the ideal and neighbor estimates.
//!
mod common;
use common::*;
use utility_bench::benchmark::{Advice, advise};
use utility_bench::prelude::*;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_minsk_benchmark_report() {
        let registry = sample_registry();
        let mut household = minsk_household();
        household.scenario = Scenario::Wasteful;
        household.house_category = HouseCategory::Old;
        household
            .actual_costs
            .insert("Электроэнергия".to_string(), 95.0);
        household.actual_costs.insert("Вода".to_string(), 24.5);
        household.actual_costs.insert("Отопление".to_string(), 40.0);

        let report = run_benchmark(&registry, &household, registry.benchmark_settings())
            .expect("benchmark should succeed");

        assert_eq!(report.city, MINSK);
        assert_eq!(report.currency, "BYN");
        assert_eq!(report.rows.len(), 5);
        assert!(report.extras.is_empty());

        assert_eq!(report.totals.ideal, 177.82);
        assert_eq!(report.totals.actual, 159.5);

        let electricity = &report.rows[0];
        assert_eq!(electricity.service, "Электроэнергия");
        assert_eq!(electricity.ideal, 79.6);
        assert_eq!(electricity.actual, 95.0);
        assert_eq!(electricity.neighbor, 111.79);

        assert_eq!(report.neighbor.get("Вода"), Some(32.25));
        assert_eq!(report.neighbor.get("Канализация"), Some(17.31));
        assert_eq!(report.neighbor.get("Отопление"), Some(56.11));
        // 13.5 * 1.07 = 14.445 rounds half to even.
        assert_eq!(report.neighbor.get("Фикс. платежи"), Some(14.44));
        assert_eq!(report.totals.neighbor, 231.9);

        println!("Minsk report: {:?}", report.totals);
    }

    #[test]
    fn test_minsk_recommendations() {
        let registry = sample_registry();
        let mut household = minsk_household();
        household
            .actual_costs
            .insert("Электроэнергия".to_string(), 95.0);
        household.actual_costs.insert("Вода".to_string(), 24.5);

        let report = run_benchmark(&registry, &household, registry.benchmark_settings()).unwrap();
        assert_eq!(report.recommendations.len(), 5);

        let electricity = &report.recommendations[0];
        assert_eq!(electricity.service, "Электроэнергия");
        assert_eq!(electricity.icon, "💡");
        match &electricity.advice {
            Advice::Overspend { percent, tip } => {
                assert_close(*percent, (95.0 - 79.6) / 79.6 * 100.0);
                assert!(tip.contains("энергосберегающие"));
            }
            other => panic!("expected overspend, got {:?}", other),
        }
        assert!(electricity.advice.to_string().starts_with("overspend 19%"));

        // Within the one-unit tolerance.
        assert_eq!(report.recommendations[1].advice, Advice::WithinNorm);
        // Nothing reported at all.
        assert_eq!(report.recommendations[3].advice, Advice::WithinNorm);
    }

    #[test]
    fn test_limassol_benchmark_excludes_extras_from_totals() {
        let registry = sample_registry();
        let mut household = limassol_household();
        household.scenario = Scenario::Economical;
        household.house_category = HouseCategory::New;
        household.actual_costs.insert("Электроэнергия".to_string(), 171.5);
        household.actual_costs.insert("Интернет".to_string(), 30.0);
        household.actual_costs.insert("Аренда".to_string(), 900.0);

        let report = run_benchmark(&registry, &household, registry.benchmark_settings()).unwrap();

        assert_eq!(report.currency, "€");
        assert_eq!(report.extras, vec![("Аренда".to_string(), 900.0)]);
        assert_eq!(report.totals.actual, 201.5);
        assert_eq!(report.totals.ideal, 350.41);

        assert_eq!(report.neighbor.get("Электроэнергия"), Some(155.52));
        assert_eq!(report.neighbor.get("Вода"), Some(31.6));
        assert_eq!(report.neighbor.get("Интернет"), Some(25.47));
        assert_eq!(report.neighbor.get("Обслуживание"), Some(108.23));
        // Rounded from the exact adjusted sum, not from the rounded rows.
        assert_eq!(report.totals.neighbor, 346.28);

        let internet = report
            .recommendations
            .iter()
            .find(|card| card.service == "Интернет")
            .unwrap();
        assert!(matches!(internet.advice, Advice::Overspend { .. }));

        let electricity = &report.recommendations[0];
        assert_eq!(electricity.advice, Advice::WithinNorm);
    }

    #[test]
    fn test_neighbor_scenario_only_changes_behavioural_volumes() {
        let registry = sample_registry();
        let settings = registry.benchmark_settings();
        let mut household = minsk_household();
        household.house_category = HouseCategory::New;

        household.scenario = Scenario::Economical;
        let economical = run_benchmark(&registry, &household, settings).unwrap();
        household.scenario = Scenario::Wasteful;
        let wasteful = run_benchmark(&registry, &household, settings).unwrap();

        assert_eq!(economical.ideal, wasteful.ideal);
        assert!(economical.totals.neighbor < wasteful.totals.neighbor);
        assert_eq!(
            economical.neighbor.get("Отопление"),
            wasteful.neighbor.get("Отопление")
        );
    }

    #[test]
    fn test_custom_benchmark_settings() {
        let registry = sample_registry();
        let household = limassol_household();
        let settings = BenchmarkSettings {
            realism_uplift: 1.0,
            ..BenchmarkSettings::default()
        };

        let report = run_benchmark(&registry, &household, &settings).unwrap();
        // Average scenario and neutral uplift: only electricity is scaled by 1.05.
        assert_eq!(report.neighbor.get("Вода"), report.ideal.get("Вода"));
        assert_eq!(report.neighbor.get("Электроэнергия"), Some(179.55));
    }

    #[test]
    fn test_unknown_city_is_an_error() {
        let registry = sample_registry();
        let household = Household::new("Atlantis", 50.0, 1);
        let result = run_benchmark(&registry, &household, registry.benchmark_settings());
        assert!(matches!(
            result,
            Err(BenchmarkError::UnknownCity(ref city)) if city == "Atlantis"
        ));
    }

    #[test]
    fn test_advise_ignores_zero_ideal() {
        assert_eq!(advise(50.0, 0.0, "tip"), Advice::WithinNorm);
        assert_eq!(advise(11.0, 10.0, "tip"), Advice::WithinNorm);
        assert!(matches!(advise(11.5, 10.0, "tip"), Advice::Overspend { .. }));
    }

    #[test]
    fn test_report_json_output() {
        let registry = sample_registry();
        let mut household = minsk_household();
        household
            .actual_costs
            .insert("Электроэнергия".to_string(), 95.0);

        let report = run_benchmark(&registry, &household, registry.benchmark_settings()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["totals"]["ideal"], serde_json::json!(177.82));
        assert_eq!(json["ideal"]["total"], serde_json::json!(177.82));
        assert_eq!(json["scenario"], "average");
        assert_eq!(json["house_category"], "average");
        assert_eq!(json["recommendations"][0]["advice"]["status"], "overspend");
        assert_eq!(json["recommendations"][1]["advice"]["status"], "within_norm");
    }

    #[test]
    fn test_household_json_round_trip_through_file() {
        let json = r#"{
            "city": "Минск",
            "area_m2": 90,
            "occupants": 3,
            "floor": 5,
            "actual_costs": {"Вода": 24.5}
        }"#;
        let path = std::env::temp_dir().join("utility_bench_household_test.json");
        std::fs::write(&path, json).unwrap();

        let household = Household::from_file(&path).expect("household should load");
        std::fs::remove_file(&path).ok();

        let registry = sample_registry();
        let report = run_benchmark(&registry, &household, registry.benchmark_settings()).unwrap();
        assert_eq!(report.totals.ideal, 177.82);
        assert_eq!(report.totals.actual, 24.5);
    }
}

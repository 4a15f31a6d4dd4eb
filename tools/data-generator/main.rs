use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use std::fs;
use utility_bench::benchmark::{HouseCategory, Scenario};
use utility_bench::data::Household;
use utility_bench::tariff::{City, TariffRegistry};

/// A CLI tool to generate sample households for the utility benchmark
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_household.json")]
    output: String,

    /// Tariff configuration to pick the city and its services from
    #[arg(short, long, default_value = "data/utilities.json")]
    config: String,

    /// Use this city instead of a random one
    #[arg(long)]
    city: Option<String>,

    /// Upper bound for each generated actual cost
    #[arg(long, default_value_t = 150.0)]
    max_cost: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.max_cost <= 0.0 {
        eprintln!("Error: --max-cost ({}) must be positive", cli.max_cost);
        std::process::exit(1);
    }

    let registry = TariffRegistry::from_file(&cli.config)?;
    let cities: Vec<(&str, &City)> = registry.cities().collect();
    let (city_name, city) = match &cli.city {
        Some(name) => match registry.city(name) {
            Some(city) => (name.as_str(), city),
            None => {
                eprintln!("Error: city '{}' is not in '{}'", name, cli.config);
                std::process::exit(1);
            }
        },
        None => *cities.choose(&mut rng).ok_or("configuration contains no cities")?,
    };

    println!("Generating a household for '{}'...", city_name);

    let mut household = generate_household(&mut rng, city_name);
    generate_actual_costs(&mut rng, &mut household, city, cli.max_cost);

    let json_output = serde_json::to_string_pretty(&household)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved household data to '{}'",
        cli.output
    );

    Ok(())
}

/// Generates the household description.
fn generate_household(rng: &mut ThreadRng, city: &str) -> Household {
    let mut household = Household::new(
        city,
        (rng.random_range(10.0..500.0_f64) * 10.0).round() / 10.0,
        rng.random_range(1..=20),
    );
    household.month = rng.random_range(1..=12);
    household.floor = rng.random_range(1..=25);
    household.subsidized = rng.random_bool(0.7);
    household.scenario = *Scenario::ALL.choose(rng).unwrap_or(&Scenario::Average);
    household.house_category = *HouseCategory::ALL
        .choose(rng)
        .unwrap_or(&HouseCategory::Average);
    println!("-> Generated household profile.");
    household
}

/// Generates self-reported costs for every tariff service and extra category.
fn generate_actual_costs(rng: &mut ThreadRng, household: &mut Household, city: &City, max: f64) {
    let categories = city
        .tariffs
        .services()
        .chain(city.extra_categories.iter().map(String::as_str));
    for category in categories {
        let amount = (rng.random_range(0.0..max) * 100.0).round() / 100.0;
        household.actual_costs.insert(category.to_string(), amount);
    }
    println!(
        "-> Generated {} actual cost entries.",
        household.actual_costs.len()
    );
}

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Instant;
use utility_bench::lint::lint;
use utility_bench::prelude::*;

mod logging;

/// Estimate, explain and benchmark household utility costs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the tariff configuration JSON file
    #[arg(short, long, global = true, default_value = "data/utilities.json")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured cities and their services
    Cities,
    /// Compare a household's costs with the ideal and neighbor estimates
    Estimate {
        /// Path to the household JSON file
        household: Option<String>,
        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Run in interactive mode to be prompted for the household
        #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
        human: bool,
    },
    /// Show how one service's ideal cost is computed, step by step
    Explain {
        /// Path to the household JSON file
        household: String,
        /// Service name as written in the configuration
        service: String,
    },
    /// Report suspicious tariff data without evaluating anything
    Check,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let load_start = Instant::now();
    let registry = TariffRegistry::from_file(&cli.config).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load tariff configuration '{}': {}",
            cli.config, e
        ))
    });
    tracing::debug!(elapsed = ?load_start.elapsed(), cities = registry.len(), "configuration loaded");

    match cli.command {
        Command::Cities => list_cities(&registry),
        Command::Estimate { household, json, human } => {
            let household = if human {
                prompt_household(&registry)
            } else {
                let path = household.unwrap_or_else(|| {
                    exit_with_error("Household path is required in non-interactive mode.")
                });
                load_household(&path)
            };
            run_estimate(&registry, &household, json);
        }
        Command::Explain { household, service } => {
            run_explain(&registry, &load_household(&household), &service)
        }
        Command::Check => run_check(&registry),
    }
}

fn list_cities(registry: &TariffRegistry) {
    for (name, city) in registry.cities() {
        println!("{} ({}, model '{}')", name, city.currency, city.volume_model);
        for service in city.tariffs.services() {
            println!("  - {}", service);
        }
    }
}

fn load_household(path: &str) -> Household {
    Household::from_file(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load household from '{}': {}", path, e))
    })
}

fn run_estimate(registry: &TariffRegistry, household: &Household, json: bool) {
    let eval_start = Instant::now();
    let report = run_benchmark(registry, household, registry.benchmark_settings())
        .unwrap_or_else(|e| exit_with_error(&format!("Benchmark failed: {}", e)));
    let eval_duration = eval_start.elapsed();

    if json {
        let output = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize report: {}", e)));
        println!("{}", output);
        return;
    }

    let currency = &report.currency;
    println!(
        "\n{} | scenario: {} | house: {}",
        report.city, report.scenario, report.house_category
    );
    println!(
        "\n{:<20} {:>12} {:>12} {:>12}",
        "Service",
        format!("Ideal, {}", currency),
        format!("Yours, {}", currency),
        format!("Neighbor, {}", currency)
    );
    for row in &report.rows {
        println!(
            "{:<20} {:>12.2} {:>12.2} {:>12.2}",
            row.service, row.ideal, row.actual, row.neighbor
        );
    }
    println!(
        "{:<20} {:>12.2} {:>12.2} {:>12.2}",
        "Total", report.totals.ideal, report.totals.actual, report.totals.neighbor
    );
    for (category, amount) in &report.extras {
        println!("{:<20} {:>12} {:>12.2} {:>12}", category, "-", amount, "-");
    }

    println!("\nRecommendations:");
    for card in &report.recommendations {
        println!("  {} {}: {}", card.icon, card.service, card.advice);
    }
    println!("\nEvaluated in {:?}", eval_duration);
}

fn run_explain(registry: &TariffRegistry, household: &Household, service: &str) {
    let city = registry.city(&household.city).unwrap_or_else(|| {
        exit_with_error(&format!("City '{}' is not configured", household.city))
    });
    let volumes = estimate_volumes(city, &household.volume_input(1.0));
    let trace = Evaluator::new(registry)
        .explain(&household.city, service, &volumes, &household.context())
        .unwrap_or_else(|| {
            exit_with_error(&format!(
                "City '{}' has no service named '{}'",
                household.city, service
            ))
        });
    println!("{}", TraceFormatter::format_trace(&trace));
}

fn run_check(registry: &TariffRegistry) {
    let diagnostics = lint(registry);
    if diagnostics.is_empty() {
        println!("No issues found in {} cities.", registry.len());
        return;
    }
    for diagnostic in &diagnostics {
        println!("warning: {}", diagnostic);
    }
    println!("\n{} issue(s) found.", diagnostics.len());
}

/// Builds a household from answers typed at the terminal.
fn prompt_household(registry: &TariffRegistry) -> Household {
    println!("--- Utility Bench Interactive Mode ---");

    let cities: Vec<&str> = registry.cities().map(|(name, _)| name).collect();
    let default_city = cities.first().copied();
    let city = loop {
        println!("\nAvailable cities: {}", cities.join(", "));
        let choice = prompt_for_input("Enter city", default_city);
        if registry.city(&choice).is_some() {
            break choice;
        }
        println!("Unknown city '{}'.", choice);
    };

    let area_m2 = prompt_number("Enter living area, m²", "90");
    let occupants = prompt_parsed(
        "Enter number of occupants",
        "3",
        |n: &u32| *n >= 1,
        "Please enter a whole number of at least 1.",
    );
    let month = prompt_parsed(
        "Enter month (1-12)",
        "1",
        |m: &u32| (1..=12).contains(m),
        "Please enter a month between 1 and 12.",
    );
    let floor = prompt_parsed(
        "Enter floor",
        "5",
        |_: &i32| true,
        "Please enter a whole floor number.",
    );

    let mut household = Household::new(&city, area_m2, occupants);
    household.month = month;
    household.floor = floor;
    household.subsidized = prompt_for_input("Use subsidised rates? (y/n)", Some("y"))
        .eq_ignore_ascii_case("y");

    if let Some(profile) = registry.city(&city) {
        println!("\nEnter your actual monthly costs (empty for 0):");
        for category in profile
            .tariffs
            .services()
            .chain(profile.extra_categories.iter().map(String::as_str))
        {
            let amount = prompt_number(category, "0");
            household.actual_costs.insert(category.to_string(), amount);
        }
    }
    household
}

fn prompt_number(prompt_text: &str, default: &str) -> f64 {
    prompt_parsed(
        prompt_text,
        default,
        |value: &f64| value.is_finite() && *value >= 0.0,
        "Please enter a non-negative number.",
    )
}

/// Re-prompts until the answer parses as `T` and passes `accept`.
fn prompt_parsed<T: FromStr>(
    prompt_text: &str,
    default: &str,
    accept: impl Fn(&T) -> bool,
    hint: &str,
) -> T {
    loop {
        let answer = prompt_for_input(prompt_text, Some(default));
        match parse_answer::<T>(&answer) {
            Some(value) if accept(&value) => return value,
            _ => println!("{}", hint),
        }
    }
}

/// Parses a typed answer, accepting a decimal comma. Integer targets reject
/// fractions instead of truncating them.
fn parse_answer<T: FromStr>(answer: &str) -> Option<T> {
    answer.trim().replace(',', ".").parse().ok()
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to flush stdout: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read input: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

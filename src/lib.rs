//! # Utility Bench - Tariff Pipeline Evaluator
//!
//! **Utility Bench** estimates household utility costs (electricity, water,
//! heating, fixed fees, ...) for cities with very different tariff structures,
//! and benchmarks a household's self-reported bill against a normative "ideal"
//! and a synthetic "average neighbor".
//!
//! Its core is a small interpreter: every (city, service) pair carries a
//! declarative pipeline of arithmetic steps that is executed against named
//! parameters, consumption volumes and a per-request context. Flat rates,
//! progressive brackets, subsidised/full-rate blending, fixed fees, averaged
//! ranges, conditional surcharges, nested sums and VAT are all expressed with
//! the same closed set of operators.
//!
//! ## Core Workflow
//!
//! 1.  **Load Tariffs**: Build a `TariffRegistry` once, from the bundled JSON format
//!     (`TariffRegistry::from_file`) or from any other source via `IntoRegistry`.
//! 2.  **Estimate Volumes**: Turn a household description into a `VolumeTable`
//!     with the city's consumption model (`volume::estimate_volumes`), or supply your own.
//! 3.  **Evaluate**: Run `Evaluator::evaluate` for a city. Each call is a stateless,
//!     full pass that yields a `CostBreakdown` of service costs and their total.
//! 4.  **Benchmark** (optional): `benchmark::run_benchmark` combines the ideal
//!     and neighbor evaluations with the household's actual costs.
//!
//! ## Quick Start
//!
//! ```rust
//! use utility_bench::prelude::*;
//!
//! let water = TariffRule::new(vec![
//!     Step::GetVolume { source: "Вода".to_string() },
//!     Step::MultiplyByParam { key: "rate".to_string() },
//! ])
//! .with_param("rate", 1.7858);
//!
//! let minsk = City::new("BYN", "standard_minsk")
//!     .with_tariffs(TariffSet::empty().with("Вода", water));
//! let registry = TariffRegistry::new(vec![("Минск".to_string(), minsk)]).unwrap();
//!
//! let volumes = VolumeTable::new().with("Вода", 13.5);
//! let context = CalculationContext::new();
//!
//! let costs = Evaluator::new(&registry).evaluate("Минск", &volumes, &context);
//! assert_eq!(costs.get("Вода"), Some(24.11));
//! assert_eq!(costs.total(), 24.11);
//! ```

pub mod benchmark;
pub mod context;
pub mod data;
pub mod error;
pub mod evaluator;
pub mod lint;
pub mod prelude;
pub mod tariff;
pub mod trace;
pub mod volume;

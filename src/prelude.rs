//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! crate. Import it to get the core functionality without naming every module.
//!
//! # Example
//!
//! ```rust,no_run
//! use utility_bench::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let registry = TariffRegistry::from_file("data/utilities.json")?;
//! let household = Household::from_file("path/to/household.json")?;
//!
//! let report = run_benchmark(&registry, &household, registry.benchmark_settings())?;
//! println!("Ideal total: {:.2} {}", report.totals.ideal, report.currency);
//! # Ok(())
//! # }
//! ```

// Registry and rule model
pub use crate::tariff::{
    City, Comparison, IntoRegistry, ParamValue, RateBracket, Step, TariffRegistry, TariffRule,
    TariffSet,
};

// Evaluation
pub use crate::context::{CalculationContext, ContextValue, VolumeTable};
pub use crate::evaluator::{CostBreakdown, Evaluator, TOTAL_KEY, evaluate_costs};
pub use crate::trace::{ServiceTrace, TraceFormatter};

// Volumes and benchmarking
pub use crate::benchmark::{BenchmarkReport, BenchmarkSettings, HouseCategory, Scenario, run_benchmark};
pub use crate::data::Household;
pub use crate::volume::{VolumeInput, estimate_volumes};

// Error types
pub use crate::error::{BenchmarkError, DataError, RegistryError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

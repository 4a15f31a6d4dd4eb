use serde::Serialize;

mod formatter;

pub use formatter::TraceFormatter;

/// What one pipeline step did to the accumulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepTrace {
    /// The step as written, e.g. `multiply_by_param(rate)`.
    pub step: String,
    pub before: f64,
    pub after: f64,
    /// Sub-pipeline traces for `sum_of_steps`, one per summed pipeline.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Vec<StepTrace>>,
}

/// Full record of how one service's cost was computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceTrace {
    pub service: String,
    pub steps: Vec<StepTrace>,
    /// Final accumulator before rounding.
    pub raw_cost: f64,
    pub cost: f64,
}

use super::progressive::{blended_rate, progressive_cost};
use crate::context::{CalculationContext, SUBSIDY_MULTIPLIER, VolumeTable};
use crate::tariff::{ParamValue, Step, TariffRule};
use crate::trace::StepTrace;
use tracing::{debug, warn};

/// Default for reads that seed or add to the accumulator.
const ADDITIVE_DEFAULT: f64 = 0.0;
/// Default for reads that scale the accumulator.
const MULTIPLICATIVE_DEFAULT: f64 = 1.0;

/// The recursive interpreter for one service's pipeline.
///
/// Holds only borrowed, read-only inputs; every `run` starts a fresh
/// accumulator, so one engine can execute nested sub-pipelines.
pub(super) struct PipelineEngine<'a> {
    service: &'a str,
    rule: &'a TariffRule,
    volumes: &'a VolumeTable,
    context: &'a CalculationContext,
}

impl<'a> PipelineEngine<'a> {
    pub(super) fn new(
        service: &'a str,
        rule: &'a TariffRule,
        volumes: &'a VolumeTable,
        context: &'a CalculationContext,
    ) -> Self {
        Self {
            service,
            rule,
            volumes,
            context,
        }
    }

    /// Executes the rule's top-level pipeline and returns the unrounded cost.
    pub(super) fn evaluate(&self, trace: Option<&mut Vec<StepTrace>>) -> f64 {
        self.run(&self.rule.pipeline, trace)
    }

    fn run(&self, pipeline: &[Step], mut trace: Option<&mut Vec<StepTrace>>) -> f64 {
        let mut accumulator = 0.0;
        for step in pipeline {
            let before = accumulator;
            match trace.as_deref_mut() {
                Some(steps) => {
                    let mut branches = Vec::new();
                    accumulator = self.apply(step, accumulator, Some(&mut branches));
                    steps.push(StepTrace {
                        step: step.to_string(),
                        before,
                        after: accumulator,
                        branches,
                    });
                }
                None => accumulator = self.apply(step, accumulator, None),
            }
        }
        accumulator
    }

    fn apply(
        &self,
        step: &Step,
        accumulator: f64,
        branches: Option<&mut Vec<Vec<StepTrace>>>,
    ) -> f64 {
        match step {
            Step::GetVolume { source } => self.volume(source),
            Step::GetParam { key } => self.context_value(key, ADDITIVE_DEFAULT),
            Step::GetFixedAmount { key } => self.param(key, ADDITIVE_DEFAULT),
            Step::MultiplyByParam { key } => accumulator * self.param(key, MULTIPLICATIVE_DEFAULT),
            Step::AddParam { key } => accumulator + self.param(key, ADDITIVE_DEFAULT),
            Step::MultiplyByContext { key } => {
                accumulator * self.context_value(key, MULTIPLICATIVE_DEFAULT)
            }
            Step::ApplyProgressiveRate { brackets_key } => match self.rule.params.get(brackets_key)
            {
                Some(ParamValue::Brackets(brackets)) => progressive_cost(accumulator, brackets),
                other => {
                    warn!(
                        service = self.service,
                        key = %brackets_key,
                        found = other.map_or("nothing", ParamValue::kind),
                        "progressive rate needs a bracket list; billing 0"
                    );
                    0.0
                }
            },
            Step::ApplySubsidy {
                subsidy_key,
                full_key,
            } => {
                let subsidy_rate = self.param(subsidy_key, MULTIPLICATIVE_DEFAULT);
                let full_rate = self.param(full_key, MULTIPLICATIVE_DEFAULT);
                let multiplier = self.subsidy_multiplier();
                accumulator * blended_rate(subsidy_rate, full_rate, multiplier)
            }
            Step::ApplyVat => accumulator * (1.0 + self.rule.vat),
            Step::ApplyConditionalValue {
                check_param,
                condition,
                threshold,
                if_true,
                if_false,
            } => {
                let checked = self.context_value(check_param, ADDITIVE_DEFAULT);
                let selected = if condition.holds(checked, *threshold) {
                    if_true
                } else {
                    if_false
                };
                self.param(selected, ADDITIVE_DEFAULT)
            }
            Step::SumOfSteps { pipelines } => match branches {
                Some(branches) => pipelines
                    .iter()
                    .map(|pipeline| {
                        let mut steps = Vec::with_capacity(pipeline.len());
                        let value = self.run(pipeline, Some(&mut steps));
                        branches.push(steps);
                        value
                    })
                    .sum(),
                None => pipelines.iter().map(|p| self.run(p, None)).sum(),
            },
            Step::Unknown { operator, .. } => {
                warn!(
                    service = self.service,
                    operator = %operator,
                    "skipping unknown pipeline operator"
                );
                accumulator
            }
        }
    }

    fn volume(&self, source: &str) -> f64 {
        self.volumes.get(source).unwrap_or_else(|| {
            warn!(service = self.service, source, "no volume supplied; using 0");
            ADDITIVE_DEFAULT
        })
    }

    fn param(&self, key: &str, default: f64) -> f64 {
        match self.rule.params.get(key) {
            Some(ParamValue::Number(value)) => *value,
            Some(ParamValue::Brackets(_)) => {
                warn!(
                    service = self.service,
                    key, default, "parameter is a bracket list where a number was expected"
                );
                default
            }
            None => {
                warn!(service = self.service, key, default, "missing tariff parameter");
                default
            }
        }
    }

    fn context_value(&self, key: &str, default: f64) -> f64 {
        self.context.get(key).unwrap_or_else(|| {
            warn!(service = self.service, key, default, "missing context value");
            default
        })
    }

    fn subsidy_multiplier(&self) -> f64 {
        self.context.get(SUBSIDY_MULTIPLIER).unwrap_or_else(|| {
            debug!(
                service = self.service,
                "no subsidy multiplier in context; assuming fully subsidised"
            );
            MULTIPLICATIVE_DEFAULT
        })
    }
}

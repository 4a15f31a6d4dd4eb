use crate::context::{CalculationContext, VolumeTable};
use crate::tariff::{TariffRegistry, TariffRule, TariffSet};
use crate::trace::ServiceTrace;
use ahash::AHashMap;
use serde::{Serialize, Serializer};

mod engine;
pub mod progressive;

use engine::PipelineEngine;
pub use progressive::{blended_rate, progressive_cost};

/// Key under which a cost mapping reports its grand total. No service may use it.
pub const TOTAL_KEY: &str = "total";

/// Rounds a monetary amount to cents, ties to even.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Per-service costs of one evaluation plus their total, in tariff order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostBreakdown {
    services: Vec<(String, f64)>,
    total: f64,
}

impl CostBreakdown {
    /// Builds a breakdown from already rounded service costs; the total is the
    /// rounded sum.
    pub fn from_costs(services: Vec<(String, f64)>) -> Self {
        let total = round_currency(services.iter().map(|(_, cost)| cost).sum());
        Self { services, total }
    }

    /// Builds a breakdown from unrounded service costs. The total is rounded
    /// from the exact sum, so it may differ by a cent or so from the sum of
    /// the rounded services.
    pub fn from_unrounded(services: Vec<(String, f64)>) -> Self {
        let total = round_currency(services.iter().map(|(_, cost)| cost).sum());
        let services = services
            .into_iter()
            .map(|(name, cost)| (name, round_currency(cost)))
            .collect();
        Self { services, total }
    }

    pub fn get(&self, service: &str) -> Option<f64> {
        if service == TOTAL_KEY {
            return Some(self.total);
        }
        self.services
            .iter()
            .find(|(name, _)| name == service)
            .map(|(_, cost)| *cost)
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.services.iter().map(|(name, cost)| (name.as_str(), *cost))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Flat mapping including the `TOTAL_KEY` entry.
    pub fn to_map(&self) -> AHashMap<String, f64> {
        self.services
            .iter()
            .cloned()
            .chain(std::iter::once((TOTAL_KEY.to_string(), self.total)))
            .collect()
    }
}

impl Serialize for CostBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.iter()
                .chain(std::iter::once((TOTAL_KEY, self.total))),
        )
    }
}

/// Runs one rule's pipeline and returns its cost rounded to cents.
pub fn evaluate_rule(
    service: &str,
    rule: &TariffRule,
    volumes: &VolumeTable,
    context: &CalculationContext,
) -> f64 {
    round_currency(PipelineEngine::new(service, rule, volumes, context).evaluate(None))
}

/// Runs one rule's pipeline and records every executed step.
pub fn trace_rule(
    service: &str,
    rule: &TariffRule,
    volumes: &VolumeTable,
    context: &CalculationContext,
) -> ServiceTrace {
    let mut steps = Vec::with_capacity(rule.pipeline.len());
    let raw_cost = PipelineEngine::new(service, rule, volumes, context).evaluate(Some(&mut steps));
    ServiceTrace {
        service: service.to_string(),
        steps,
        raw_cost,
        cost: round_currency(raw_cost),
    }
}

/// Evaluates every service of a tariff set.
///
/// Each service is independent: a missing parameter or an unknown operator in
/// one pipeline degrades that service's cost and leaves the others untouched.
pub fn evaluate_costs(
    rules: &TariffSet,
    volumes: &VolumeTable,
    context: &CalculationContext,
) -> CostBreakdown {
    let services = rules
        .iter()
        .map(|(service, rule)| {
            (
                service.to_string(),
                evaluate_rule(service, rule, volumes, context),
            )
        })
        .collect();
    CostBreakdown::from_costs(services)
}

/// Evaluates cities from a shared, read-only registry.
///
/// Holds nothing but a borrow, so any number of evaluators (for instance the
/// ideal and the neighbor scenario) can run side by side.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'r> {
    registry: &'r TariffRegistry,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r TariffRegistry) -> Self {
        Self { registry }
    }

    /// Costs for every service of `city`; empty for an unknown city.
    pub fn evaluate(
        &self,
        city: &str,
        volumes: &VolumeTable,
        context: &CalculationContext,
    ) -> CostBreakdown {
        evaluate_costs(self.registry.lookup(city), volumes, context)
    }

    /// Step-by-step trace of one service, or `None` if the city has no such service.
    pub fn explain(
        &self,
        city: &str,
        service: &str,
        volumes: &VolumeTable,
        context: &CalculationContext,
    ) -> Option<ServiceTrace> {
        let rule = self.registry.lookup(city).get(service)?;
        Some(trace_rule(service, rule, volumes, context))
    }
}

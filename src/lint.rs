//! Load-time diagnostics for tariff data.
//!
//! The evaluator tolerates incomplete data by falling back to defaults, which
//! keeps a bad tariff from aborting a calculation but also hides it. `lint`
//! surfaces those problems without rejecting the registry.

use crate::tariff::{ParamValue, RateBracket, Step, TariffRegistry, TariffRule};
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// A problem found in one service's tariff rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Issue {
    #[error("unknown operator '{0}' will be skipped")]
    UnknownOperator(String),

    #[error("parameter '{0}' is referenced but not defined")]
    MissingParam(String),

    #[error("parameter '{key}' should be a {expected}, found a {found}")]
    ParamTypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("brackets in '{0}' are not stored in ascending order")]
    UnsortedBrackets(String),

    #[error("bracket {from}..{to} in '{key}' ends before it starts")]
    InvertedBracket { key: String, from: f64, to: f64 },

    #[error("brackets in '{key}' overlap at {at}")]
    OverlappingBrackets { key: String, at: f64 },

    #[error("brackets in '{key}' leave units {from}..{to} unpriced")]
    BracketGap { key: String, from: f64, to: f64 },

    #[error("open-ended bracket in '{0}' is followed by further brackets")]
    OpenBracketNotLast(String),

    #[error("VAT {0} is outside 0..=1")]
    VatOutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub city: String,
    pub service: String,
    pub issue: Issue,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}: {}", self.city, self.service, self.issue)
    }
}

/// Checks every rule in the registry and returns all issues found.
pub fn lint(registry: &TariffRegistry) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (city, profile) in registry.cities() {
        for (service, rule) in profile.tariffs.iter() {
            diagnostics.extend(lint_rule(rule).into_iter().map(|issue| Diagnostic {
                city: city.to_string(),
                service: service.to_string(),
                issue,
            }));
        }
    }
    diagnostics
}

/// Checks a single rule.
pub fn lint_rule(rule: &TariffRule) -> Vec<Issue> {
    let mut issues = Vec::new();
    if !(0.0..=1.0).contains(&rule.vat) {
        issues.push(Issue::VatOutOfRange(rule.vat));
    }
    lint_pipeline(rule, &rule.pipeline, &mut issues);
    issues.dedup();
    issues
}

#[derive(Clone, Copy)]
enum Expect {
    Number,
    Brackets,
}

fn lint_pipeline(rule: &TariffRule, pipeline: &[Step], issues: &mut Vec<Issue>) {
    for step in pipeline {
        match step {
            Step::GetFixedAmount { key }
            | Step::MultiplyByParam { key }
            | Step::AddParam { key } => check_param(rule, key, Expect::Number, issues),
            Step::ApplySubsidy {
                subsidy_key,
                full_key,
            } => {
                check_param(rule, subsidy_key, Expect::Number, issues);
                check_param(rule, full_key, Expect::Number, issues);
            }
            Step::ApplyConditionalValue {
                if_true, if_false, ..
            } => {
                check_param(rule, if_true, Expect::Number, issues);
                check_param(rule, if_false, Expect::Number, issues);
            }
            Step::ApplyProgressiveRate { brackets_key } => {
                check_param(rule, brackets_key, Expect::Brackets, issues);
                if let Some(brackets) = rule.params.get(brackets_key).and_then(ParamValue::as_brackets)
                {
                    lint_brackets(brackets_key, brackets, issues);
                }
            }
            Step::SumOfSteps { pipelines } => {
                for nested in pipelines {
                    lint_pipeline(rule, nested, issues);
                }
            }
            Step::Unknown { operator, .. } => issues.push(Issue::UnknownOperator(operator.clone())),
            Step::GetVolume { .. }
            | Step::GetParam { .. }
            | Step::MultiplyByContext { .. }
            | Step::ApplyVat => {}
        }
    }
}

fn check_param(rule: &TariffRule, key: &str, expect: Expect, issues: &mut Vec<Issue>) {
    let Some(value) = rule.params.get(key) else {
        issues.push(Issue::MissingParam(key.to_string()));
        return;
    };
    let (matches, expected) = match expect {
        Expect::Number => (value.as_number().is_some(), "number"),
        Expect::Brackets => (value.as_brackets().is_some(), "bracket list"),
    };
    if !matches {
        issues.push(Issue::ParamTypeMismatch {
            key: key.to_string(),
            expected,
            found: value.kind(),
        });
    }
}

fn lint_brackets(key: &str, brackets: &[RateBracket], issues: &mut Vec<Issue>) {
    let is_sorted = brackets
        .iter()
        .tuple_windows()
        .all(|(a, b)| a.from <= b.from);
    if !is_sorted {
        issues.push(Issue::UnsortedBrackets(key.to_string()));
    }

    for bracket in brackets {
        if let Some(to) = bracket.to.filter(|to| *to < bracket.from) {
            issues.push(Issue::InvertedBracket {
                key: key.to_string(),
                from: bracket.from,
                to,
            });
        }
    }

    let sorted = brackets
        .iter()
        .sorted_by(|a, b| a.from.total_cmp(&b.from))
        .collect_vec();
    for (current, next) in sorted.iter().tuple_windows() {
        match current.to {
            None => {
                issues.push(Issue::OpenBracketNotLast(key.to_string()));
                break;
            }
            Some(to) if next.from <= to => issues.push(Issue::OverlappingBrackets {
                key: key.to_string(),
                at: next.from,
            }),
            Some(to) if next.from > to + 1.0 => issues.push(Issue::BracketGap {
                key: key.to_string(),
                from: to + 1.0,
                to: next.from - 1.0,
            }),
            Some(_) => {}
        }
    }
}

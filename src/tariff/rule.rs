use super::step::Step;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One tier of a progressive tariff.
///
/// Bounds are inclusive: `{from: 1, to: 40}` covers 40 units. A missing `to`
/// marks the open-ended top tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBracket {
    pub from: f64,
    #[serde(default)]
    pub to: Option<f64>,
    pub rate: f64,
}

impl RateBracket {
    pub fn new(from: f64, to: Option<f64>, rate: f64) -> Self {
        Self { from, to, rate }
    }

    /// Number of units this bracket can absorb, or `None` when unbounded.
    /// An inverted bracket (`to < from`) absorbs nothing.
    pub fn width(&self) -> Option<f64> {
        self.to.map(|to| (to - self.from + 1.0).max(0.0))
    }
}

/// A value in a rule's parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Brackets(Vec<RateBracket>),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Brackets(_) => None,
        }
    }

    pub fn as_brackets(&self) -> Option<&[RateBracket]> {
        match self {
            ParamValue::Brackets(b) => Some(b),
            ParamValue::Number(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Number(_) => "number",
            ParamValue::Brackets(_) => "bracket list",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<Vec<RateBracket>> for ParamValue {
    fn from(value: Vec<RateBracket>) -> Self {
        ParamValue::Brackets(value)
    }
}

/// The billing formula for one service in one city.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TariffRule {
    #[serde(default)]
    pub vat: f64,
    #[serde(default)]
    pub params: AHashMap<String, ParamValue>,
    #[serde(default)]
    pub pipeline: Vec<Step>,
}

impl TariffRule {
    pub fn new(pipeline: Vec<Step>) -> Self {
        Self {
            vat: 0.0,
            params: AHashMap::new(),
            pipeline,
        }
    }

    pub fn with_vat(mut self, vat: f64) -> Self {
        self.vat = vat;
        self
    }

    pub fn with_param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

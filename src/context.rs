use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Context key for the dwelling's living area in square metres.
pub const AREA_M2: &str = "area_m2";
/// Context key for the number of residents.
pub const OCCUPANTS: &str = "occupants";
/// Context key for the floor the dwelling is on.
pub const FLOOR: &str = "floor";
/// Context key for the 0..=1 blend between subsidised (1) and full (0) rates.
pub const SUBSIDY_MULTIPLIER: &str = "subsidy_multiplier";

/// A value supplied by the caller for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Number(f64),
    Bool(bool),
}

impl ContextValue {
    /// Numeric view used by the operators; `true` reads as 1 and `false` as 0.
    pub fn as_f64(self) -> f64 {
        match self {
            ContextValue::Number(n) => n,
            ContextValue::Bool(true) => 1.0,
            ContextValue::Bool(false) => 0.0,
        }
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Number(value)
    }
}

impl From<u32> for ContextValue {
    fn from(value: u32) -> Self {
        ContextValue::Number(f64::from(value))
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        ContextValue::Number(f64::from(value))
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

/// Per-request calculation parameters (area, occupants, floor, subsidy, ...).
///
/// Distinct from a rule's own `params`: only `get_param`, `multiply_by_context`
/// and the check side of `apply_conditional_value` read from here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalculationContext {
    values: AHashMap<String, ContextValue>,
}

impl CalculationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<ContextValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<ContextValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).map(|v| v.as_f64())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Consumption per service, in whatever unit the city's tariffs expect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeTable {
    volumes: AHashMap<String, f64>,
}

impl VolumeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, service: &str, volume: f64) -> Self {
        self.insert(service, volume);
        self
    }

    pub fn insert(&mut self, service: &str, volume: f64) {
        self.volumes.insert(service.to_string(), volume);
    }

    pub fn get(&self, service: &str) -> Option<f64> {
        self.volumes.get(service).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.volumes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for VolumeTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self {
            volumes: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

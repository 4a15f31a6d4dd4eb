use crate::benchmark::{HouseCategory, Scenario};
use crate::context::{AREA_M2, CalculationContext, FLOOR, OCCUPANTS, SUBSIDY_MULTIPLIER};
use crate::error::DataError;
use crate::volume::VolumeInput;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_month() -> u32 {
    1
}

fn default_floor() -> i32 {
    1
}

fn default_subsidized() -> bool {
    true
}

/// A household description plus its self-reported monthly costs, matching the
/// expected JSON input format.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Household {
    pub city: String,
    pub area_m2: f64,
    pub occupants: u32,
    #[serde(default = "default_month")]
    pub month: u32,
    #[serde(default = "default_floor")]
    pub floor: i32,
    #[serde(default)]
    pub scenario: Scenario,
    #[serde(default)]
    pub house_category: HouseCategory,
    /// Whether the household pays subsidised rates where a city offers them.
    #[serde(default = "default_subsidized")]
    pub subsidized: bool,
    #[serde(default)]
    pub actual_costs: AHashMap<String, f64>,
}

impl Household {
    pub fn new(city: &str, area_m2: f64, occupants: u32) -> Self {
        Self {
            city: city.to_string(),
            area_m2,
            occupants,
            month: default_month(),
            floor: default_floor(),
            scenario: Scenario::default(),
            house_category: HouseCategory::default(),
            subsidized: default_subsidized(),
            actual_costs: AHashMap::new(),
        }
    }

    /// Load a household from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DataError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let household: Self =
            serde_json::from_str(json).map_err(|e| DataError::JsonParseError(e.to_string()))?;
        household.validate()?;
        Ok(household)
    }

    /// Rejects figures no consumption model can use: a month outside 1-12 or
    /// a negative or non-finite area.
    pub fn validate(&self) -> Result<(), DataError> {
        if !(1..=12).contains(&self.month) {
            return Err(DataError::InvalidField {
                field: "month",
                message: format!("{} is not a calendar month (1-12)", self.month),
            });
        }
        if !self.area_m2.is_finite() || self.area_m2 < 0.0 {
            return Err(DataError::InvalidField {
                field: "area_m2",
                message: format!("{} is not a usable area", self.area_m2),
            });
        }
        Ok(())
    }

    /// The calculation context the tariff pipelines read.
    pub fn context(&self) -> CalculationContext {
        CalculationContext::new()
            .with(AREA_M2, self.area_m2)
            .with(OCCUPANTS, self.occupants)
            .with(FLOOR, self.floor)
            .with(SUBSIDY_MULTIPLIER, if self.subsidized { 1.0 } else { 0.0 })
    }

    pub fn volume_input(&self, behavior_factor: f64) -> VolumeInput {
        VolumeInput {
            area_m2: self.area_m2,
            occupants: f64::from(self.occupants),
            month: self.month,
            behavior_factor,
        }
    }

    /// Self-reported cost of a category, 0 when not reported.
    pub fn actual(&self, category: &str) -> f64 {
        self.actual_costs.get(category).copied().unwrap_or(0.0)
    }
}

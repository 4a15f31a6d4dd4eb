use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How carefully the simulated neighbor consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Economical,
    #[default]
    Average,
    Wasteful,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Economical, Scenario::Average, Scenario::Wasteful];
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Economical => write!(f, "economical"),
            Scenario::Average => write!(f, "average"),
            Scenario::Wasteful => write!(f, "wasteful"),
        }
    }
}

/// Age class of the building, which drives heat and power losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseCategory {
    New,
    #[default]
    Average,
    Old,
}

impl HouseCategory {
    pub const ALL: [HouseCategory; 3] = [HouseCategory::New, HouseCategory::Average, HouseCategory::Old];
}

impl fmt::Display for HouseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HouseCategory::New => write!(f, "new"),
            HouseCategory::Average => write!(f, "average"),
            HouseCategory::Old => write!(f, "old"),
        }
    }
}

/// Which house coefficient applies to a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Electricity,
    Heating,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseCoefficients {
    #[serde(default = "one")]
    pub heating: f64,
    #[serde(default = "one")]
    pub electricity: f64,
}

impl HouseCoefficients {
    pub const NEUTRAL: HouseCoefficients = HouseCoefficients {
        heating: 1.0,
        electricity: 1.0,
    };

    pub fn for_kind(&self, kind: AdjustmentKind) -> f64 {
        match kind {
            AdjustmentKind::Electricity => self.electricity,
            AdjustmentKind::Heating => self.heating,
        }
    }
}

/// A saving tip shown when a service is overspent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub icon: String,
    pub tip: String,
}

fn default_scenarios() -> AHashMap<Scenario, f64> {
    AHashMap::from_iter([
        (Scenario::Economical, 0.85),
        (Scenario::Average, 1.0),
        (Scenario::Wasteful, 1.25),
    ])
}

fn default_house_coefficients() -> AHashMap<HouseCategory, HouseCoefficients> {
    AHashMap::from_iter([
        (HouseCategory::New, HouseCoefficients::NEUTRAL),
        (
            HouseCategory::Average,
            HouseCoefficients {
                heating: 1.05,
                electricity: 1.05,
            },
        ),
        (
            HouseCategory::Old,
            HouseCoefficients {
                heating: 1.1,
                electricity: 1.05,
            },
        ),
    ])
}

fn default_realism_uplift() -> f64 {
    1.07
}

/// Constants of the neighbor benchmark. Every field may be overridden from
/// the `benchmark` section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSettings {
    /// Behaviour factor per scenario.
    #[serde(default = "default_scenarios")]
    pub scenarios: AHashMap<Scenario, f64>,
    #[serde(default = "default_house_coefficients")]
    pub house_coefficients: AHashMap<HouseCategory, HouseCoefficients>,
    /// Flat factor applied to every neighbor cost.
    #[serde(default = "default_realism_uplift")]
    pub realism_uplift: f64,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            scenarios: default_scenarios(),
            house_coefficients: default_house_coefficients(),
            realism_uplift: default_realism_uplift(),
        }
    }
}

impl BenchmarkSettings {
    /// Behaviour factor of a scenario, 1.0 when not configured.
    pub fn behavior_factor(&self, scenario: Scenario) -> f64 {
        self.scenarios.get(&scenario).copied().unwrap_or(1.0)
    }

    /// Coefficients of a house category, neutral when not configured.
    pub fn coefficients(&self, category: HouseCategory) -> HouseCoefficients {
        self.house_coefficients
            .get(&category)
            .copied()
            .unwrap_or(HouseCoefficients::NEUTRAL)
    }
}

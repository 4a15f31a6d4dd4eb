//! Consumption models that turn a household description into a `VolumeTable`.
//!
//! Each city names its model in configuration (`volume_model`). The output is
//! keyed by the service names the city's tariffs read with `get_volume`.

use crate::context::VolumeTable;
use crate::tariff::City;
use tracing::warn;

pub const ELECTRICITY: &str = "Электроэнергия";
pub const WATER: &str = "Вода";
pub const SEWERAGE: &str = "Канализация";
pub const HEATING: &str = "Отопление";

/// Household figures a consumption model needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeInput {
    pub area_m2: f64,
    pub occupants: f64,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Scales behaviour-driven consumption; 1.0 is the normative household.
    pub behavior_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeModel {
    /// kWh of electricity, m³ of water and sewerage, Gcal of heating per month.
    StandardMinsk,
    /// kWh of electricity and m³ of water per month.
    StandardLimassol,
}

impl VolumeModel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "standard_minsk" => Some(VolumeModel::StandardMinsk),
            "standard_limassol" => Some(VolumeModel::StandardLimassol),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VolumeModel::StandardMinsk => "standard_minsk",
            VolumeModel::StandardLimassol => "standard_limassol",
        }
    }

    pub fn estimate(self, input: &VolumeInput, heating_months: &[u32]) -> VolumeTable {
        match self {
            VolumeModel::StandardMinsk => minsk(input, heating_months),
            VolumeModel::StandardLimassol => limassol(input),
        }
    }
}

/// Estimates volumes with the city's configured model; unknown models yield
/// an empty table, which makes every `get_volume` fall back to 0.
pub fn estimate_volumes(city: &City, input: &VolumeInput) -> VolumeTable {
    match VolumeModel::from_name(&city.volume_model) {
        Some(model) => model.estimate(input, &city.heating_months),
        None => {
            warn!(model = %city.volume_model, "unknown volume model; no volumes estimated");
            VolumeTable::new()
        }
    }
}

fn minsk(input: &VolumeInput, heating_months: &[u32]) -> VolumeTable {
    let electricity =
        (60.0 + 75.0 * input.occupants + 0.5 * input.area_m2) * input.behavior_factor;
    let water = 4.5 * input.occupants * input.behavior_factor;
    // Annual heat demand spread evenly over the heating season.
    let heating = if heating_months.contains(&input.month) {
        0.15 * input.area_m2 / heating_months.len() as f64
    } else {
        0.0
    };

    VolumeTable::new()
        .with(ELECTRICITY, electricity)
        .with(WATER, water)
        .with(SEWERAGE, water)
        .with(HEATING, heating)
}

fn limassol(input: &VolumeInput) -> VolumeTable {
    let electricity = (3.0 * input.area_m2 + 150.0 * input.occupants) * input.behavior_factor;
    let water = 4.0 * input.occupants * input.behavior_factor;

    VolumeTable::new()
        .with(ELECTRICITY, electricity)
        .with(WATER, water)
}

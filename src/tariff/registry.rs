use super::conversion::{IntoRegistry, UtilityConfig};
use super::set::TariffSet;
use crate::benchmark::{AdjustmentKind, BenchmarkSettings, Recommendation};
use crate::error::RegistryError;
use crate::evaluator::TOTAL_KEY;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

static EMPTY_TARIFFS: TariffSet = TariffSet::empty();

fn default_heating_months() -> Vec<u32> {
    vec![1, 2, 3, 4, 10, 11, 12]
}

/// Everything the engine knows about one city: how to estimate its volumes,
/// how to present it, and its tariff rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub currency: String,
    /// Name of the consumption model, e.g. `standard_minsk`.
    #[serde(default)]
    pub volume_model: String,
    /// Months (1-12) in which heating is billed.
    #[serde(default = "default_heating_months")]
    pub heating_months: Vec<u32>,
    /// Which house-age coefficient scales which service in the neighbor estimate.
    #[serde(default)]
    pub adjustment_kinds: AHashMap<String, AdjustmentKind>,
    #[serde(default, with = "super::ordered")]
    pub recommendations: Vec<(String, Recommendation)>,
    /// Self-reported categories shown next to the tariffs but left out of totals (e.g. rent).
    #[serde(default)]
    pub extra_categories: Vec<String>,
    #[serde(default)]
    pub tariffs: TariffSet,
}

impl City {
    pub fn new(currency: &str, volume_model: &str) -> Self {
        Self {
            currency: currency.to_string(),
            volume_model: volume_model.to_string(),
            heating_months: default_heating_months(),
            adjustment_kinds: AHashMap::new(),
            recommendations: Vec::new(),
            extra_categories: Vec::new(),
            tariffs: TariffSet::empty(),
        }
    }

    pub fn with_tariffs(mut self, tariffs: TariffSet) -> Self {
        self.tariffs = tariffs;
        self
    }
}

/// Immutable catalog of cities and their tariff rules.
///
/// Built once per process and shared read-only by every evaluation.
#[derive(Debug, Clone, Default)]
pub struct TariffRegistry {
    cities: Vec<(String, City)>,
    index: AHashMap<String, usize>,
    benchmark: BenchmarkSettings,
}

impl TariffRegistry {
    /// Builds a registry, rejecting data that would make cost mappings ambiguous:
    /// duplicate cities, duplicate or empty service names, and services named
    /// like the reserved total key.
    pub fn new(cities: Vec<(String, City)>) -> Result<Self, RegistryError> {
        let mut index = AHashMap::with_capacity(cities.len());
        for (position, (name, city)) in cities.iter().enumerate() {
            if index.insert(name.clone(), position).is_some() {
                return Err(RegistryError::DuplicateCity(name.clone()));
            }
            validate_services(name, &city.tariffs)?;
        }
        debug!(cities = cities.len(), "tariff registry loaded");
        Ok(Self {
            cities,
            index,
            benchmark: BenchmarkSettings::default(),
        })
    }

    pub fn with_benchmark_settings(mut self, settings: BenchmarkSettings) -> Self {
        self.benchmark = settings;
        self
    }

    /// Parses a JSON configuration document into a registry.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let config: UtilityConfig = serde_json::from_str(json)
            .map_err(|e| RegistryError::JsonParseError(e.to_string()))?;
        config.into_registry()
    }

    /// Loads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Returns the tariff rules of a city; unknown cities yield an empty set.
    pub fn lookup(&self, city: &str) -> &TariffSet {
        self.city(city)
            .map(|c| &c.tariffs)
            .unwrap_or(&EMPTY_TARIFFS)
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.index.get(name).map(|&position| &self.cities[position].1)
    }

    pub fn cities(&self) -> impl Iterator<Item = (&str, &City)> {
        self.cities.iter().map(|(name, city)| (name.as_str(), city))
    }

    pub fn benchmark_settings(&self) -> &BenchmarkSettings {
        &self.benchmark
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

fn validate_services(city: &str, tariffs: &TariffSet) -> Result<(), RegistryError> {
    let mut seen = AHashSet::with_capacity(tariffs.len());
    for (service, _) in tariffs.entries() {
        if service.trim().is_empty() {
            return Err(RegistryError::EmptyServiceName {
                city: city.to_string(),
            });
        }
        if service == TOTAL_KEY {
            return Err(RegistryError::ReservedServiceName {
                city: city.to_string(),
                service: service.clone(),
            });
        }
        if !seen.insert(service.as_str()) {
            return Err(RegistryError::DuplicateService {
                city: city.to_string(),
                service: service.clone(),
            });
        }
    }
    Ok(())
}

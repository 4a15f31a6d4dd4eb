use super::registry::{City, TariffRegistry};
use crate::benchmark::BenchmarkSettings;
use crate::error::RegistryError;
use serde::{Deserialize, Serialize};

/// A trait for configuration sources that can be turned into a `TariffRegistry`.
///
/// The bundled loader reads a JSON document (`UtilityConfig`). Other storage
/// back-ends, such as a relational store holding cities, services and tariff
/// rows, implement this trait to hand the engine the same immutable registry.
///
/// # Example
///
/// ```rust
/// use utility_bench::error::RegistryError;
/// use utility_bench::tariff::{City, IntoRegistry, Step, TariffRegistry, TariffRule, TariffSet};
///
/// struct TariffRow { city: String, service: String, rate: f64 }
/// struct MyStore { rows: Vec<TariffRow> }
///
/// impl IntoRegistry for MyStore {
///     fn into_registry(self) -> Result<TariffRegistry, RegistryError> {
///         let mut cities: Vec<(String, City)> = Vec::new();
///         for row in self.rows {
///             let rule = TariffRule::new(vec![
///                 Step::GetVolume { source: row.service.clone() },
///                 Step::MultiplyByParam { key: "rate".to_string() },
///             ])
///             .with_param("rate", row.rate);
///             match cities.iter_mut().find(|(name, _)| *name == row.city) {
///                 Some((_, city)) => city.tariffs.insert(row.service, rule),
///                 None => {
///                     let tariffs = TariffSet::empty().with(row.service, rule);
///                     cities.push((row.city, City::new("EUR", "").with_tariffs(tariffs)));
///                 }
///             }
///         }
///         TariffRegistry::new(cities)
///     }
/// }
///
/// let store = MyStore {
///     rows: vec![TariffRow { city: "Riga".into(), service: "Water".into(), rate: 1.5 }],
/// };
/// let registry = store.into_registry().unwrap();
/// assert_eq!(registry.lookup("Riga").len(), 1);
/// ```
pub trait IntoRegistry {
    /// Consumes the source and builds a validated registry.
    fn into_registry(self) -> Result<TariffRegistry, RegistryError>;
}

/// The JSON configuration document: cities in display order plus optional
/// benchmark constants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UtilityConfig {
    #[serde(with = "super::ordered")]
    pub cities: Vec<(String, City)>,
    #[serde(default)]
    pub benchmark: BenchmarkSettings,
}

impl IntoRegistry for UtilityConfig {
    fn into_registry(self) -> Result<TariffRegistry, RegistryError> {
        Ok(TariffRegistry::new(self.cities)?.with_benchmark_settings(self.benchmark))
    }
}

impl IntoRegistry for TariffRegistry {
    fn into_registry(self) -> Result<TariffRegistry, RegistryError> {
        Ok(self)
    }
}

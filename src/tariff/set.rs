use super::ordered;
use super::rule::TariffRule;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The tariff rules of one city, keyed by service name, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct TariffSet {
    entries: Vec<(String, TariffRule)>,
}

impl TariffSet {
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a rule, replacing any existing rule for the same service.
    pub fn insert(&mut self, service: impl Into<String>, rule: TariffRule) {
        let service = service.into();
        match self.entries.iter_mut().find(|(name, _)| *name == service) {
            Some((_, existing)) => *existing = rule,
            None => self.entries.push((service, rule)),
        }
    }

    pub fn with(mut self, service: impl Into<String>, rule: TariffRule) -> Self {
        self.insert(service, rule);
        self
    }

    pub fn get(&self, service: &str) -> Option<&TariffRule> {
        self.entries
            .iter()
            .find(|(name, _)| name == service)
            .map(|(_, rule)| rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TariffRule)> {
        self.entries.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entries, including duplicates a hand-built set may still contain.
    pub(crate) fn entries(&self) -> &[(String, TariffRule)] {
        &self.entries
    }
}

impl FromIterator<(String, TariffRule)> for TariffSet {
    fn from_iter<I: IntoIterator<Item = (String, TariffRule)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for TariffSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered::deserialize(deserializer).map(|entries| Self { entries })
    }
}

impl Serialize for TariffSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ordered::serialize(&self.entries, serializer)
    }
}

use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PRAYER_TYPES: [&str; 4] = ["rosary", "scripture", "mass", "adoration"];

/// A non-empty category tag. Surrounding whitespace is trimmed away.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrayerType(String);

impl PrayerType {
    pub fn new(raw: impl Into<String>) -> Result<Self, StoreError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StoreError::EmptyPrayerType);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form with the first letter upper-cased: `rosary` -> `Rosary`.
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl TryFrom<String> for PrayerType {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrayerType> for String {
    fn from(value: PrayerType) -> Self {
        value.0
    }
}

impl fmt::Display for PrayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of prayer types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerTypeRegistry {
    types: Vec<PrayerType>,
}

impl Default for PrayerTypeRegistry {
    fn default() -> Self {
        Self {
            types: DEFAULT_PRAYER_TYPES
                .iter()
                .map(|name| PrayerType(name.to_string()))
                .collect(),
        }
    }
}

impl PrayerTypeRegistry {
    /// Builds a registry from stored names, dropping blanks and repeats.
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut registry = Self { types: Vec::new() };
        for name in names {
            match PrayerType::new(name) {
                Ok(prayer_type) => {
                    registry.add(prayer_type);
                }
                Err(_) => tracing::warn!("dropping blank prayer type from storage"),
            }
        }
        registry
    }

    /// Returns false when the type was already present.
    pub fn add(&mut self, prayer_type: PrayerType) -> bool {
        if self.contains(&prayer_type) {
            return false;
        }
        self.types.push(prayer_type);
        true
    }

    /// Returns false when the type was not present.
    pub fn remove(&mut self, prayer_type: &PrayerType) -> bool {
        let before = self.types.len();
        self.types.retain(|existing| existing != prayer_type);
        self.types.len() != before
    }

    pub fn contains(&self, prayer_type: &PrayerType) -> bool {
        self.types.contains(prayer_type)
    }

    pub fn as_slice(&self) -> &[PrayerType] {
        &self.types
    }

    pub fn names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.0.clone()).collect()
    }
}

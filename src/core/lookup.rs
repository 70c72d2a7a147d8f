//! Static region lookup tables (population, density).

use crate::error::{RegionError, Result};
use std::collections::BTreeMap;

/// Read-only region → value mapping, e.g. population or density.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionTable {
    entries: BTreeMap<String, f64>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, consuming and returning the table.
    pub fn with(mut self, region: impl Into<String>, value: f64) -> Self {
        self.entries.insert(region.into(), value);
        self
    }

    /// Value for a region.
    pub fn get(&self, region: &str) -> Result<f64> {
        self.entries
            .get(region)
            .copied()
            .ok_or_else(|| RegionError::UnknownRegion(region.to_string()))
    }

    pub fn contains(&self, region: &str) -> bool {
        self.entries.contains_key(region)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Regions in lexicographic order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Fail with `UnknownRegion` on the first region without an entry.
    pub fn covers<S: AsRef<str>>(&self, regions: &[S]) -> Result<()> {
        match regions.iter().find(|r| !self.contains(r.as_ref())) {
            Some(missing) => Err(RegionError::UnknownRegion(missing.as_ref().to_string())),
            None => Ok(()),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RegionTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

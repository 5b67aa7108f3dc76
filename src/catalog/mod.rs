pub mod loader;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A concrete, costed action with direct indicator effects. Immutable once
/// loaded; the catalog for a run is the full available set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Intervention {
    /// Source file name, unique within a catalog directory.
    pub id: String,
    pub title: String,
    pub capex_usd: f64,
    /// Indicator key -> summed expected contribution.
    pub indicators: BTreeMap<String, f64>,
}

impl Intervention {
    pub fn effect_on(&self, indicator: &str) -> f64 {
        self.indicators.get(indicator).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub loaded_at: DateTime<Utc>,
    pub source: String,
    pub interventions: Vec<Intervention>,
    pub raw_hash: String,
}

impl CatalogSnapshot {
    /// Fingerprints the catalog contents: identical interventions in
    /// identical order produce an identical hash, which is what makes two
    /// runs comparable.
    pub fn from_interventions(source: impl Into<String>, interventions: Vec<Intervention>) -> Self {
        let canonical = serde_json::to_string(&interventions).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let raw_hash = format!("{:x}", hasher.finalize());
        Self {
            loaded_at: Utc::now(),
            source: source.into(),
            interventions,
            raw_hash,
        }
    }
}

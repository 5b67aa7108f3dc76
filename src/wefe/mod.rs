pub mod labs;
pub mod score;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four WEFE sustainability pillars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PillarKey {
    Water,
    Energy,
    Food,
    Ecosystems,
}

impl PillarKey {
    pub const ALL: [PillarKey; 4] = [
        PillarKey::Water,
        PillarKey::Energy,
        PillarKey::Food,
        PillarKey::Ecosystems,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Energy => "energy",
            Self::Food => "food",
            Self::Ecosystems => "ecosystems",
        }
    }
}

impl Display for PillarKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Water => "Water",
            Self::Energy => "Energy",
            Self::Food => "Food",
            Self::Ecosystems => "Ecosystems",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown pillar: {0}")]
pub struct PillarParseError(pub String);

impl FromStr for PillarKey {
    type Err = PillarParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "water" => Ok(Self::Water),
            "energy" => Ok(Self::Energy),
            "food" => Ok(Self::Food),
            "ecosystems" | "ecosystem" => Ok(Self::Ecosystems),
            _ => Err(PillarParseError(s.to_string())),
        }
    }
}

/// Relative importance of each pillar in the overall score. A zero weight
/// excludes the pillar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PillarWeights {
    #[serde(default = "default_weight")]
    pub water: f64,
    #[serde(default = "default_weight")]
    pub energy: f64,
    #[serde(default = "default_weight")]
    pub food: f64,
    #[serde(default = "default_weight")]
    pub ecosystems: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl PillarWeights {
    pub fn get(&self, pillar: PillarKey) -> f64 {
        match pillar {
            PillarKey::Water => self.water,
            PillarKey::Energy => self.energy,
            PillarKey::Food => self.food,
            PillarKey::Ecosystems => self.ecosystems,
        }
    }
}

impl Default for PillarWeights {
    fn default() -> Self {
        Self {
            water: 1.0,
            energy: 1.0,
            food: 1.0,
            ecosystems: 1.0,
        }
    }
}

/// pillars.json: normalization ranges and units per indicator, grouped by
/// pillar and category.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PillarDefinitions {
    #[serde(default)]
    pub wefe_pillars: BTreeMap<String, PillarDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PillarDefinition {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryDefinition {
    #[serde(default)]
    pub indicators: BTreeMap<String, IndicatorDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndicatorDefinition {
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
}

/// livinglab.json entry: reported indicator values for one region, grouped
/// by pillar and category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivingLab {
    pub name: String,
    #[serde(default)]
    pub wefe_pillars: BTreeMap<String, LabPillar>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LabPillar {
    #[serde(default)]
    pub indicators: BTreeMap<String, BTreeMap<String, f64>>,
}

impl LivingLab {
    /// All reported values for one pillar, categories flattened away.
    pub fn indicator_values(&self, pillar: PillarKey) -> BTreeMap<String, f64> {
        let mut values = BTreeMap::new();
        if let Some(lab_pillar) = self.wefe_pillars.get(pillar.as_slug()) {
            for category in lab_pillar.indicators.values() {
                for (indicator, value) in category {
                    values.insert(indicator.clone(), *value);
                }
            }
        }
        values
    }
}

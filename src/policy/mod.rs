pub mod loader;

use serde::{Deserialize, Serialize};

use crate::parse;

/// A bundled statement of intended change, expressed as synergy and
/// trade-off effects on indicators. Policies are reference data: read-only
/// to the planner once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Policy {
    pub title: String,
    #[serde(default)]
    pub policy_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub synergies: Vec<PolicyEffect>,
    #[serde(default)]
    pub trade_offs: Vec<PolicyEffect>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyEffect {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub affected_indicators: Vec<AffectedIndicator>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AffectedIndicator {
    /// Entries with an empty key are ignored during aggregation.
    #[serde(default)]
    pub indicator: String,
    #[serde(default, deserialize_with = "parse::lenient_change")]
    pub expected_change: f64,
}

impl Policy {
    pub fn effects(&self) -> impl Iterator<Item = &PolicyEffect> {
        self.synergies.iter().chain(self.trade_offs.iter())
    }
}

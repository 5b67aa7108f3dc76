//! End-to-end simulation pipeline: load catalog, aggregate targets,
//! allocate, package the result.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::allocator::greedy::select_interventions;
use crate::allocator::targets::aggregate_policy_targets;
use crate::catalog::loader::load_interventions;
use crate::catalog::{CatalogSnapshot, Intervention};
use crate::policy::Policy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Raw aggregated targets, including zero and negative entries.
    pub targets: BTreeMap<String, f64>,
    /// Per indicator: clamped target minus remaining unmet.
    pub coverage: BTreeMap<String, f64>,
    pub unmet: BTreeMap<String, f64>,
    pub total_capex_usd: f64,
    pub selected_interventions: Vec<Intervention>,
    pub catalog_hash: String,
    pub completed_at: DateTime<Utc>,
}

impl SimulationResult {
    pub fn all_targets_met(&self) -> bool {
        self.unmet
            .values()
            .all(|v| *v <= crate::allocator::greedy::MET_EPSILON)
    }
}

/// Runs one simulation for the given policies against the catalog found in
/// `interventions_dir`. Inputs are never mutated; identical policies and
/// identical catalog contents produce an identical result, modulo the
/// documented dependence of the tie-break on catalog order.
pub fn run_policy_simulation(interventions_dir: &Path, selected: &[Policy]) -> SimulationResult {
    let snapshot = CatalogSnapshot::from_interventions(
        interventions_dir.display().to_string(),
        load_interventions(interventions_dir),
    );
    let targets = aggregate_policy_targets(selected);
    let plan = select_interventions(&snapshot.interventions, &targets);

    let coverage = targets
        .iter()
        .map(|(k, v)| {
            let clamped = v.max(0.0);
            let unmet = plan.unmet.get(k).copied().unwrap_or(0.0);
            (k.clone(), clamped - unmet)
        })
        .collect();

    SimulationResult {
        total_capex_usd: plan.total_capex_usd(),
        targets,
        coverage,
        unmet: plan.unmet,
        selected_interventions: plan.selected,
        catalog_hash: snapshot.raw_hash,
        completed_at: Utc::now(),
    }
}

pub mod greedy;
pub mod targets;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Intervention;

/// Outcome of one greedy allocation pass: the interventions picked, in
/// selection order, and the residual positive shortfall per indicator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationPlan {
    pub selected: Vec<Intervention>,
    pub unmet: BTreeMap<String, f64>,
}

impl AllocationPlan {
    pub fn total_capex_usd(&self) -> f64 {
        self.selected.iter().map(|iv| iv.capex_usd).sum()
    }

    pub fn fully_met(&self) -> bool {
        self.unmet.values().all(|v| *v <= greedy::MET_EPSILON)
    }
}

use serde::{Deserialize, Serialize};

use crate::simulation::SimulationResult;
use crate::wefe::PillarWeights;

/// Caller-owned session state. The engine itself is stateless; everything a
/// UI or CLI wants to remember between runs lives here, passed explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Session {
    pub selected_lab: Option<String>,
    /// Policy titles in selection order, no duplicates.
    pub selected_policies: Vec<String>,
    #[serde(default)]
    pub weights: PillarWeights,
    pub last_run: Option<SimulationResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_lab(&mut self, name: impl Into<String>) {
        self.selected_lab = Some(name.into());
    }

    /// Returns false when the policy was already selected.
    pub fn select_policy(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        if self.selected_policies.contains(&title) {
            return false;
        }
        self.selected_policies.push(title);
        true
    }

    pub fn deselect_policy(&mut self, title: &str) -> bool {
        let before = self.selected_policies.len();
        self.selected_policies.retain(|t| t != title);
        self.selected_policies.len() != before
    }

    pub fn record_run(&mut self, result: SimulationResult) {
        self.last_run = Some(result);
    }

    pub fn last_run(&self) -> Option<&SimulationResult> {
        self.last_run.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[test]
    fn policy_selection_deduplicates_and_keeps_order() {
        let mut session = Session::new();
        assert!(session.select_policy("Water pricing reform"));
        assert!(session.select_policy("Agroforestry incentives"));
        assert!(!session.select_policy("Water pricing reform"));
        assert_eq!(
            session.selected_policies,
            vec!["Water pricing reform", "Agroforestry incentives"]
        );

        assert!(session.deselect_policy("Water pricing reform"));
        assert!(!session.deselect_policy("Water pricing reform"));
        assert_eq!(session.selected_policies, vec!["Agroforestry incentives"]);
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::policy::Policy;
use crate::wefe::PillarKey;

pub fn load_policies(path: &Path) -> Result<Vec<Policy>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading policies: {}", path.display()))?;
    let policies: Vec<Policy> = serde_json::from_str(&data)
        .with_context(|| format!("failed parsing policies JSON: {}", path.display()))?;
    Ok(policies)
}

pub fn policies_by_title(policies: &[Policy]) -> BTreeMap<String, Policy> {
    policies
        .iter()
        .map(|p| (p.title.clone(), p.clone()))
        .collect()
}

/// Sorted unique `policy_type` values across the catalog.
pub fn policy_categories(policies: &[Policy]) -> Vec<String> {
    let mut categories: Vec<String> = policies
        .iter()
        .filter_map(|p| p.policy_type.clone())
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

pub fn policies_by_category<'a>(policies: &'a [Policy], category: &str) -> Vec<&'a Policy> {
    policies
        .iter()
        .filter(|p| p.policy_type.as_deref() == Some(category))
        .collect()
}

/// Infer the primary WEFE pillar for a policy. Synergy and trade-off
/// category labels win over title keywords; the default bucket is
/// Ecosystems.
pub fn infer_policy_pillar(policy: &Policy) -> PillarKey {
    for effect in policy.effects() {
        if let Some(pillar) = pillar_from_category(&effect.category) {
            return pillar;
        }
    }

    let title = policy.title.to_lowercase();
    if title.contains("water") {
        return PillarKey::Water;
    }
    if title.contains("energy") || title.contains("renewable") {
        return PillarKey::Energy;
    }
    if title.contains("agri") || title.contains("food") || title.contains("farm") {
        return PillarKey::Food;
    }
    PillarKey::Ecosystems
}

fn pillar_from_category(category: &str) -> Option<PillarKey> {
    let c = category.trim().to_lowercase();
    if c.is_empty() {
        return None;
    }
    if c.starts_with("water") {
        return Some(PillarKey::Water);
    }
    if c.starts_with("energy") {
        return Some(PillarKey::Energy);
    }
    if c.starts_with("food") || c.contains("agri") {
        return Some(PillarKey::Food);
    }
    if c.contains("ecosystem")
        || c.contains("biodiversity")
        || c.contains("land")
        || c.contains("marine")
        || c.contains("climate")
    {
        return Some(PillarKey::Ecosystems);
    }
    None
}

//! Greedy cost-effectiveness selection of interventions against aggregated
//! policy targets.
//!
//! Each round rescans the remaining catalog, scores every candidate by
//! covered-shortfall-per-dollar, and commits the best one until every target
//! is met or nothing can make progress. The full rescan is deliberate:
//! catalogs and target vectors hold tens of entries, and the scan keeps the
//! selection order trivially reproducible.

use std::collections::BTreeMap;

use crate::allocator::AllocationPlan;
use crate::catalog::Intervention;

/// A target counts as met once its shortfall drops to this level.
pub const MET_EPSILON: f64 = 1e-6;

/// Cost divisor floor. Free or near-free interventions are not infinitely
/// prioritized; below one dollar the score equals the gain.
const COST_FLOOR_USD: f64 = 1.0;

/// How much of the current shortfall this intervention would actually cover.
/// Only positive contributions toward still-open targets count, and each is
/// capped at the remaining unmet amount, so over-delivering one indicator
/// does not inflate the score.
pub fn coverage_gain(unmet: &BTreeMap<String, f64>, intervention: &Intervention) -> f64 {
    let mut gain = 0.0;
    for (indicator, required) in unmet {
        if *required <= 0.0 {
            continue;
        }
        let contrib = intervention.effect_on(indicator);
        if contrib > 0.0 {
            gain += contrib.min(*required);
        }
    }
    gain
}

/// Selects interventions to meet or exceed `targets` at minimal capex.
/// Negative targets clamp to zero up front; an intervention is usable at
/// most once. Ties on score resolve to the earliest intervention in catalog
/// order, because only a strictly better score replaces the current best.
pub fn select_interventions(
    catalog: &[Intervention],
    targets: &BTreeMap<String, f64>,
) -> AllocationPlan {
    let mut unmet: BTreeMap<String, f64> = targets
        .iter()
        .map(|(k, v)| (k.clone(), v.max(0.0)))
        .collect();
    let mut remaining: Vec<&Intervention> = catalog.iter().collect();
    let mut selected: Vec<Intervention> = Vec::new();

    loop {
        if unmet.values().all(|v| *v <= MET_EPSILON) {
            break;
        }

        let mut best: Option<usize> = None;
        let mut best_score = 0.0;
        for (slot, intervention) in remaining.iter().enumerate() {
            let gain = coverage_gain(&unmet, intervention);
            if gain <= 0.0 {
                continue;
            }
            let cost = intervention.capex_usd.max(COST_FLOOR_USD);
            let score = gain / cost;
            if score > best_score {
                best_score = score;
                best = Some(slot);
            }
        }

        let Some(slot) = best else {
            // No remaining intervention makes progress; leftover unmet
            // stays on the table.
            break;
        };

        let winner = remaining.remove(slot);
        for (indicator, shortfall) in unmet.iter_mut() {
            let contrib = winner.effect_on(indicator);
            if contrib > 0.0 {
                // The uncapped contribution applies here; capping is a
                // scoring concern only.
                *shortfall = (*shortfall - contrib).max(0.0);
            }
        }
        selected.push(winner.clone());
    }

    AllocationPlan { selected, unmet }
}

//! Indicator normalization and pillar scoring.
//!
//! Raw indicator values are mapped onto a 0-100 scale using the min/max
//! ranges from the pillar definitions. Indicators where lower is better are
//! inverted so that 100 always reads as "good".

use serde::{Deserialize, Serialize};

use crate::allocator::targets::aggregate_policy_targets;
use crate::policy::Policy;
use crate::wefe::{LivingLab, PillarDefinitions, PillarKey, PillarWeights};

/// Indicators where a lower raw value scores higher.
const INVERTED_INDICATORS: [&str; 9] = [
    "undernourishment_prevalence",
    "children_wasting_percent",
    "children_stunted_percent",
    "adult_obesity_prevalence",
    "co2_emissions_per_capita",
    "freshwater_withdrawals_percent",
    "energy_imports_net_percent",
    "endangered_species_count",
    "soil_erosion_rate",
];

pub fn is_inverted(indicator: &str) -> bool {
    INVERTED_INDICATORS.contains(&indicator)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Maps a raw value onto 0-100 within [min, max], clamped, inverted when
/// lower is better. A degenerate range scores the midpoint.
pub fn normalize_indicator(
    value: f64,
    min_value: Option<f64>,
    max_value: Option<f64>,
    invert: bool,
) -> Option<f64> {
    let (min_value, max_value) = (min_value?, max_value?);
    if (max_value - min_value).abs() < f64::EPSILON {
        return Some(50.0);
    }
    let mut normalized = ((value - min_value) / (max_value - min_value)) * 100.0;
    normalized = normalized.clamp(0.0, 100.0);
    if invert {
        normalized = 100.0 - normalized;
    }
    Some(round1(normalized))
}

/// Mean of the normalized scores of the pillar's defined indicators that
/// the lab actually reports. None when nothing is scorable.
pub fn pillar_score(
    pillar: PillarKey,
    lab: &LivingLab,
    definitions: &PillarDefinitions,
) -> Option<f64> {
    let pillar_def = definitions.wefe_pillars.get(pillar.as_slug())?;
    let reported = lab.indicator_values(pillar);

    let mut scores = Vec::new();
    for category in pillar_def.categories.values() {
        for (indicator, indicator_def) in &category.indicators {
            let Some(value) = reported.get(indicator) else {
                continue;
            };
            if let Some(score) = normalize_indicator(
                *value,
                indicator_def.min_value,
                indicator_def.max_value,
                is_inverted(indicator),
            ) {
                scores.push(score);
            }
        }
    }

    if scores.is_empty() {
        return None;
    }
    Some(round1(scores.iter().sum::<f64>() / scores.len() as f64))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall_score: Option<f64>,
    pub included: Vec<PillarContribution>,
    pub excluded: Vec<ExcludedPillar>,
    pub total_weight: f64,
    pub weighted_sum: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarContribution {
    pub pillar: PillarKey,
    pub score: f64,
    pub weight: f64,
    pub weighted_contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedPillar {
    pub pillar: PillarKey,
    pub score: Option<f64>,
    pub weight: f64,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    ZeroWeight,
    ScoreUnavailable,
}

/// Weighted mean of the available pillar scores. Pillars with zero weight
/// or no score are excluded and listed with the reason.
pub fn overall_score(
    lab: &LivingLab,
    definitions: &PillarDefinitions,
    weights: &PillarWeights,
) -> ScoreBreakdown {
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for pillar in PillarKey::ALL {
        let weight = weights.get(pillar);
        let score = pillar_score(pillar, lab, definitions);
        match score {
            Some(score) if weight > 0.0 => {
                weighted_sum += score * weight;
                total_weight += weight;
                included.push(PillarContribution {
                    pillar,
                    score,
                    weight,
                    weighted_contribution: score * weight,
                });
            }
            _ => {
                excluded.push(ExcludedPillar {
                    pillar,
                    score,
                    weight,
                    reason: if weight <= 0.0 {
                        ExclusionReason::ZeroWeight
                    } else {
                        ExclusionReason::ScoreUnavailable
                    },
                });
            }
        }
    }

    let overall = if total_weight > 0.0 {
        Some(round1(weighted_sum / total_weight))
    } else {
        None
    };

    ScoreBreakdown {
        overall_score: overall,
        included,
        excluded,
        total_weight,
        weighted_sum,
    }
}

/// Applies the policies' expected percentage changes to a copy of the lab's
/// reported values and re-scores it. Each change scales the reported value
/// relative to itself: value + value * change / 100.
pub fn projected_score_after_policies(
    lab: &LivingLab,
    definitions: &PillarDefinitions,
    policies: &[Policy],
    weights: &PillarWeights,
) -> Option<f64> {
    if policies.is_empty() {
        return None;
    }
    let improvements = aggregate_policy_targets(policies);

    let mut projected = lab.clone();
    for lab_pillar in projected.wefe_pillars.values_mut() {
        for category in lab_pillar.indicators.values_mut() {
            for (indicator, value) in category.iter_mut() {
                if let Some(change) = improvements.get(indicator) {
                    *value += *value / 100.0 * change;
                }
            }
        }
    }

    overall_score(&projected, definitions, weights).overall_score
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::policy::{AffectedIndicator, Policy, PolicyEffect};
    use crate::wefe::{
        CategoryDefinition, IndicatorDefinition, LabPillar, LivingLab, PillarDefinition,
        PillarDefinitions, PillarKey, PillarWeights,
    };

    use super::{
        normalize_indicator, overall_score, pillar_score, projected_score_after_policies,
        ExclusionReason,
    };

    fn indicator_def(min: f64, max: f64) -> IndicatorDefinition {
        IndicatorDefinition {
            unit: "percentage".to_string(),
            min_value: Some(min),
            max_value: Some(max),
        }
    }

    fn water_only_fixture() -> (LivingLab, PillarDefinitions) {
        let definitions = PillarDefinitions {
            wefe_pillars: BTreeMap::from([(
                "water".to_string(),
                PillarDefinition {
                    label: "Water".to_string(),
                    categories: BTreeMap::from([(
                        "Access".to_string(),
                        CategoryDefinition {
                            indicators: BTreeMap::from([
                                ("water_access".to_string(), indicator_def(0.0, 100.0)),
                                (
                                    "freshwater_withdrawals_percent".to_string(),
                                    indicator_def(0.0, 100.0),
                                ),
                            ]),
                        },
                    )]),
                },
            )]),
        };
        let lab = LivingLab {
            name: "Tunis".to_string(),
            wefe_pillars: BTreeMap::from([(
                "water".to_string(),
                LabPillar {
                    indicators: BTreeMap::from([(
                        "Access".to_string(),
                        BTreeMap::from([
                            ("water_access".to_string(), 80.0),
                            ("freshwater_withdrawals_percent".to_string(), 30.0),
                        ]),
                    )]),
                },
            )]),
        };
        (lab, definitions)
    }

    #[test]
    fn normalizes_with_clamp_and_inversion() {
        assert_eq!(normalize_indicator(25.0, Some(0.0), Some(50.0), false), Some(50.0));
        assert_eq!(normalize_indicator(75.0, Some(0.0), Some(50.0), false), Some(100.0));
        assert_eq!(normalize_indicator(-10.0, Some(0.0), Some(50.0), false), Some(0.0));
        assert_eq!(normalize_indicator(25.0, Some(0.0), Some(50.0), true), Some(50.0));
        assert_eq!(normalize_indicator(10.0, Some(0.0), Some(100.0), true), Some(90.0));
        assert_eq!(normalize_indicator(7.0, Some(5.0), Some(5.0), false), Some(50.0));
        assert_eq!(normalize_indicator(7.0, None, Some(10.0), false), None);
    }

    #[test]
    fn pillar_score_is_the_mean_of_reported_indicators() {
        let (lab, definitions) = water_only_fixture();
        // water_access 80 -> 80.0; withdrawals 30 inverted -> 70.0
        assert_eq!(pillar_score(PillarKey::Water, &lab, &definitions), Some(75.0));
        assert_eq!(pillar_score(PillarKey::Energy, &lab, &definitions), None);
    }

    #[test]
    fn overall_score_weighs_and_excludes() {
        let (lab, definitions) = water_only_fixture();
        let weights = PillarWeights::default();
        let breakdown = overall_score(&lab, &definitions, &weights);

        assert_eq!(breakdown.overall_score, Some(75.0));
        assert_eq!(breakdown.included.len(), 1);
        assert_eq!(breakdown.excluded.len(), 3);
        assert!(breakdown
            .excluded
            .iter()
            .all(|e| e.reason == ExclusionReason::ScoreUnavailable));

        let zero_water = PillarWeights {
            water: 0.0,
            ..PillarWeights::default()
        };
        let breakdown = overall_score(&lab, &definitions, &zero_water);
        assert_eq!(breakdown.overall_score, None);
        assert!(breakdown
            .excluded
            .iter()
            .any(|e| e.reason == ExclusionReason::ZeroWeight));
    }

    #[test]
    fn projected_score_applies_relative_changes() {
        let (lab, definitions) = water_only_fixture();
        let policy = Policy {
            title: "Water efficiency".to_string(),
            policy_type: None,
            description: None,
            synergies: vec![PolicyEffect {
                category: "Water".to_string(),
                description: None,
                affected_indicators: vec![AffectedIndicator {
                    indicator: "water_access".to_string(),
                    expected_change: 10.0,
                }],
            }],
            trade_offs: Vec::new(),
        };

        let weights = PillarWeights::default();
        // water_access 80 -> 88 (88.0); withdrawals stay 30 -> 70.0; mean 79.0
        let projected =
            projected_score_after_policies(&lab, &definitions, &[policy], &weights);
        assert_eq!(projected, Some(79.0));
        assert_eq!(
            projected_score_after_policies(&lab, &definitions, &[], &weights),
            None
        );
        // The input lab is untouched.
        assert_eq!(
            lab.indicator_values(PillarKey::Water)["water_access"],
            80.0
        );
    }
}

use std::collections::BTreeMap;

use crate::policy::Policy;

/// Aggregates expected indicator changes across the selected policies into
/// one target vector. Synergies and trade-offs both contribute, so a policy
/// that helps and hurts the same indicator nets out. Indicators never
/// mentioned by any policy are absent from the result, not zero.
pub fn aggregate_policy_targets(policies: &[Policy]) -> BTreeMap<String, f64> {
    let mut targets: BTreeMap<String, f64> = BTreeMap::new();
    for policy in policies {
        for effect in policy.effects() {
            for affected in &effect.affected_indicators {
                if affected.indicator.is_empty() {
                    continue;
                }
                *targets.entry(affected.indicator.clone()).or_insert(0.0) +=
                    affected.expected_change;
            }
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::policy::{AffectedIndicator, Policy, PolicyEffect};

    use super::aggregate_policy_targets;

    fn policy(title: &str, synergies: Vec<(&str, f64)>, trade_offs: Vec<(&str, f64)>) -> Policy {
        let effect = |changes: Vec<(&str, f64)>| PolicyEffect {
            category: String::new(),
            description: None,
            affected_indicators: changes
                .into_iter()
                .map(|(indicator, expected_change)| AffectedIndicator {
                    indicator: indicator.to_string(),
                    expected_change,
                })
                .collect(),
        };
        Policy {
            title: title.to_string(),
            policy_type: None,
            description: None,
            synergies: vec![effect(synergies)],
            trade_offs: vec![effect(trade_offs)],
        }
    }

    #[test]
    fn sums_across_policies_and_collections() {
        let policies = vec![
            policy("A", vec![("water_access", 10.0)], vec![("energy_cost", -2.0)]),
            policy("B", vec![("water_access", 5.0)], vec![]),
        ];
        let targets = aggregate_policy_targets(&policies);
        assert_eq!(targets["water_access"], 15.0);
        assert_eq!(targets["energy_cost"], -2.0);
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn same_indicator_nets_out_across_entries() {
        let policies = vec![policy(
            "Mixed",
            vec![("groundwater_level", 6.0)],
            vec![("groundwater_level", -6.0)],
        )];
        let targets = aggregate_policy_targets(&policies);
        assert_eq!(targets["groundwater_level"], 0.0);
    }

    #[test]
    fn skips_entries_without_an_indicator_key() {
        let policies = vec![policy("Sparse", vec![("", 9.0), ("food_security", 1.0)], vec![])];
        let targets = aggregate_policy_targets(&policies);
        assert_eq!(targets, BTreeMap::from([("food_security".to_string(), 1.0)]));
    }

    #[test]
    fn disjoint_policy_lists_merge_without_overlap() {
        let p1 = vec![policy("A", vec![("water_access", 4.0)], vec![])];
        let p2 = vec![policy("B", vec![("energy_access", 7.0)], vec![])];

        let combined: Vec<_> = p1.iter().chain(p2.iter()).cloned().collect();
        let merged = aggregate_policy_targets(&combined);

        let mut expected = aggregate_policy_targets(&p1);
        expected.extend(aggregate_policy_targets(&p2));
        assert_eq!(merged, expected);
    }

    #[test]
    fn empty_input_yields_empty_targets() {
        assert!(aggregate_policy_targets(&[]).is_empty());
    }
}

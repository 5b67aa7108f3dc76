use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::catalog::Intervention;
use crate::parse;

/// On-disk shape of one intervention record. Cost lives under `needs`,
/// indicator effects under `outcomes.indicators`; both tolerate absence.
#[derive(Debug, Deserialize)]
struct InterventionRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    needs: Needs,
    #[serde(default)]
    outcomes: Outcomes,
}

#[derive(Debug, Default, Deserialize)]
struct Needs {
    #[serde(default, deserialize_with = "parse::lenient_change")]
    capex_usd: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Outcomes {
    #[serde(default)]
    indicators: Vec<OutcomeEntry>,
}

#[derive(Debug, Deserialize)]
struct OutcomeEntry {
    #[serde(default)]
    indicator: String,
    #[serde(default, deserialize_with = "parse::lenient_change")]
    expected_change: f64,
}

/// Loads every `*.json` record in `dir`, in sorted file-name order. That
/// order is also the allocator's tie-break order. A record that does not
/// parse as the expected structure is skipped; a missing directory yields
/// an empty catalog.
pub fn load_interventions(dir: &Path) -> Vec<Intervention> {
    let mut interventions = Vec::new();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                "interventions directory unavailable, catalog is empty: {}: {err}",
                dir.display()
            );
            return interventions;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".json"))
        .collect();
    names.sort();

    for name in names {
        let path = dir.join(&name);
        let record: InterventionRecord = match fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|data| serde_json::from_str(&data).map_err(anyhow::Error::from))
        {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping malformed intervention record {name}: {err}");
                continue;
            }
        };

        let mut indicators: BTreeMap<String, f64> = BTreeMap::new();
        for entry in record.outcomes.indicators {
            if entry.indicator.is_empty() {
                continue;
            }
            *indicators.entry(entry.indicator).or_insert(0.0) += entry.expected_change;
        }

        interventions.push(Intervention {
            title: record.title.unwrap_or_else(|| name.clone()),
            id: name,
            capex_usd: record.needs.capex_usd,
            indicators,
        });
    }

    interventions
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::load_interventions;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).expect("write fixture");
    }

    #[test]
    fn missing_directory_yields_empty_catalog() {
        let catalog = load_interventions(Path::new("/nonexistent/interventions"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn loads_records_in_sorted_file_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            dir.path(),
            "b_solar.json",
            r#"{"title": "Solar pumping", "needs": {"capex_usd": 5000},
                "outcomes": {"indicators": [{"indicator": "energy_access", "expected_change": 12}]}}"#,
        );
        write(
            dir.path(),
            "a_drip.json",
            r#"{"title": "Drip irrigation", "needs": {"capex_usd": "2500"},
                "outcomes": {"indicators": [{"indicator": "water_access", "expected_change": "+8%"}]}}"#,
        );

        let catalog = load_interventions(dir.path());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].id, "a_drip.json");
        assert_eq!(catalog[0].capex_usd, 2500.0);
        assert_eq!(catalog[0].effect_on("water_access"), 8.0);
        assert_eq!(catalog[1].title, "Solar pumping");
    }

    #[test]
    fn skips_malformed_records_and_non_json_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "bad.json", "{ not json");
        write(dir.path(), "wrong_shape.json", r#"{"needs": "lots of money"}"#);
        write(dir.path(), "notes.txt", "ignored");
        write(
            dir.path(),
            "ok.json",
            r#"{"title": "Wetland buffer", "needs": {}, "outcomes": {}}"#,
        );

        let catalog = load_interventions(dir.path());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].title, "Wetland buffer");
        assert_eq!(catalog[0].capex_usd, 0.0);
        assert!(catalog[0].indicators.is_empty());
    }

    #[test]
    fn sums_repeated_outcome_indicators_and_defaults_title_to_file_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            dir.path(),
            "terraces.json",
            r#"{"needs": {"capex_usd": "n/a"},
                "outcomes": {"indicators": [
                    {"indicator": "soil_retention", "expected_change": 3},
                    {"indicator": "soil_retention", "expected_change": "2%"},
                    {"expected_change": 99}]}}"#,
        );

        let catalog = load_interventions(dir.path());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].title, "terraces.json");
        assert_eq!(catalog[0].capex_usd, 0.0);
        assert_eq!(catalog[0].effect_on("soil_retention"), 5.0);
        assert_eq!(catalog[0].indicators.len(), 1);
    }
}

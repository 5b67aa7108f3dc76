use anyhow::Result;

use crate::catalog::Intervention;
use crate::simulation::SimulationResult;

pub fn simulation_to_csv(result: &SimulationResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["indicator", "target", "coverage", "unmet"])?;
    for (indicator, target) in &result.targets {
        writer.write_record([
            indicator.clone(),
            format!("{target:.3}"),
            format!("{:.3}", result.coverage.get(indicator).copied().unwrap_or(0.0)),
            format!("{:.3}", result.unmet.get(indicator).copied().unwrap_or(0.0)),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn catalog_to_csv(interventions: &[Intervention]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["id", "title", "capex_usd", "indicator_count"])?;
    for intervention in interventions {
        writer.write_record([
            intervention.id.clone(),
            intervention.title.clone(),
            format!("{:.2}", intervention.capex_usd),
            intervention.indicators.len().to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

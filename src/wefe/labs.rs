use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::wefe::{LivingLab, PillarDefinitions};

pub fn load_living_labs(path: &Path) -> Result<Vec<LivingLab>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading living labs: {}", path.display()))?;
    let labs: Vec<LivingLab> = serde_json::from_str(&data)
        .with_context(|| format!("failed parsing living labs JSON: {}", path.display()))?;
    Ok(labs)
}

pub fn load_pillar_definitions(path: &Path) -> Result<PillarDefinitions> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading pillar definitions: {}", path.display()))?;
    let definitions: PillarDefinitions = serde_json::from_str(&data)
        .with_context(|| format!("failed parsing pillar definitions JSON: {}", path.display()))?;
    Ok(definitions)
}

pub fn region_names(labs: &[LivingLab]) -> Vec<String> {
    labs.iter().map(|lab| lab.name.clone()).collect()
}

pub fn find_lab<'a>(labs: &'a [LivingLab], name: &str) -> Option<&'a LivingLab> {
    labs.iter().find(|lab| lab.name == name)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::wefe::PillarKey;

    use super::{find_lab, load_living_labs, region_names};

    #[test]
    fn loads_labs_and_flattens_categories() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"[{{"name": "Tunis",
                 "wefe_pillars": {{
                     "water": {{"indicators": {{
                         "Access": {{"water_access": 72.5}},
                         "Availability": {{"renewable_water_per_capita": 410.0}}}}}}}}}}]"#
        )
        .expect("write");

        let labs = load_living_labs(file.path()).expect("load");
        assert_eq!(region_names(&labs), vec!["Tunis"]);

        let lab = find_lab(&labs, "Tunis").expect("lab");
        let values = lab.indicator_values(PillarKey::Water);
        assert_eq!(values["water_access"], 72.5);
        assert_eq!(values["renewable_water_per_capita"], 410.0);
        assert!(lab.indicator_values(PillarKey::Energy).is_empty());
    }
}

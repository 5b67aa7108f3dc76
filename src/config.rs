use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::wefe::PillarWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub lab: LabConfig,
    #[serde(default)]
    pub weights: PillarWeights,
    #[serde(default)]
    pub policies: PoliciesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_policies_path")]
    pub policies_path: String,
    #[serde(default = "default_interventions_dir")]
    pub interventions_dir: String,
    #[serde(default = "default_pillars_path")]
    pub pillars_path: String,
    #[serde(default = "default_labs_path")]
    pub labs_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabConfig {
    #[serde(default = "default_lab_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PoliciesConfig {
    /// Policy titles selected by default when the CLI gives none.
    #[serde(default)]
    pub selected: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub lab: Option<String>,
    pub interventions_dir: Option<String>,
    pub policies_path: Option<String>,
    pub selected_policies: Option<Vec<String>>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/nexus-planner/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(lab) = overrides.lab {
            self.lab.name = lab;
        }
        if let Some(dir) = overrides.interventions_dir {
            self.data.interventions_dir = dir;
        }
        if let Some(path) = overrides.policies_path {
            self.data.policies_path = path;
        }
        if let Some(selected) = overrides.selected_policies {
            self.policies.selected = selected;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_policies_path(&self) -> PathBuf {
        expand_tilde(&self.data.policies_path)
    }

    pub fn resolved_interventions_dir(&self) -> PathBuf {
        expand_tilde(&self.data.interventions_dir)
    }

    pub fn resolved_pillars_path(&self) -> PathBuf {
        expand_tilde(&self.data.pillars_path)
    }

    pub fn resolved_labs_path(&self) -> PathBuf {
        expand_tilde(&self.data.labs_path)
    }

    pub fn default_template() -> String {
        let template = r#"[data]
policies_path = "data/policies.json"
interventions_dir = "data/interventions"
pillars_path = "data/pillars.json"
labs_path = "data/livinglab.json"

[lab]
name = "Tunis"

[weights]
water = 1.0
energy = 1.0
food = 1.0
ecosystems = 1.0

[policies]
selected = []
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            lab: LabConfig::default(),
            weights: PillarWeights::default(),
            policies: PoliciesConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            policies_path: default_policies_path(),
            interventions_dir: default_interventions_dir(),
            pillars_path: default_pillars_path(),
            labs_path: default_labs_path(),
        }
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            name: default_lab_name(),
        }
    }
}

fn default_policies_path() -> String {
    "data/policies.json".to_string()
}

fn default_interventions_dir() -> String {
    "data/interventions".to_string()
}

fn default_pillars_path() -> String {
    "data/pillars.json".to_string()
}

fn default_labs_path() -> String {
    "data/livinglab.json".to_string()
}

fn default_lab_name() -> String {
    "Tunis".to_string()
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn template_parses_back_into_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("parse template");
        assert_eq!(parsed.lab.name, "Tunis");
        assert_eq!(parsed.data.interventions_dir, "data/interventions");
        assert_eq!(parsed.weights.water, 1.0);
        assert!(parsed.policies.selected.is_empty());
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::clean::{AmbiguityPolicy, Cleaner};
use crate::names::MatchRule;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "thesisnet.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub names: NamesConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_top")]
    pub top: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            top: default_top(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamesConfig {
    #[serde(default)]
    pub match_rule: MatchRule,
    #[serde(default)]
    pub ambiguity: AmbiguityPolicy,
}

impl NamesConfig {
    #[must_use]
    pub const fn cleaner(&self) -> Cleaner {
        Cleaner::new(self.match_rule, self.ambiguity)
    }
}

/// Metric names per graph flavour. Validated when the report runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_undirected_metrics")]
    pub undirected: Vec<String>,
    #[serde(default = "default_directed_metrics")]
    pub directed: Vec<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            undirected: default_undirected_metrics(),
            directed: default_directed_metrics(),
        }
    }
}

/// Load `path` if it exists, falling back to defaults otherwise.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load `thesisnet.toml` from `project_root`.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    load_config(&project_root.join(CONFIG_FILE))
}

fn default_input_path() -> PathBuf {
    PathBuf::from("data/thesis.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

const fn default_top() -> usize {
    10
}

fn default_undirected_metrics() -> Vec<String> {
    ["degree", "betweenness", "closeness"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_directed_metrics() -> Vec<String> {
    ["degree", "betweenness", "closeness", "in-degree"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

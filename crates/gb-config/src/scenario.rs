//! Scenario file types.
//!
//! A scenario file fixes one candidate grid and lists any number of
//! independent analyses (prior family + observed data) evaluated on it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Complete scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub grid: GridSpec,

    pub scenarios: Vec<ScenarioSpec>,

    #[serde(default)]
    pub predictive: Option<PredictiveSpec>,
}

/// Candidate grid description.
///
/// Without explicit bounds the grid is the interior lattice `i/(points+1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub points: usize,

    #[serde(default)]
    pub lower: Option<f64>,

    #[serde(default)]
    pub upper: Option<f64>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            points: 10,
            lower: None,
            upper: None,
        }
    }
}

/// One named analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    pub prior: PriorSpec,
    pub data: DataSpec,
}

/// Prior family as written in a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum PriorSpec {
    Triangular,
    Uniform,
    Beta { alpha: f64, beta: f64 },
}

/// Observed counts. Signed so that negative input reaches validation
/// instead of failing inside the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSpec {
    pub successes: i64,
    pub trials: i64,
}

/// Posterior predictive simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictiveSpec {
    #[serde(default = "default_predictive_trials")]
    pub trials: i64,

    #[serde(default = "default_draws")]
    pub draws: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_predictive_trials() -> i64 {
    10
}

fn default_draws() -> usize {
    1000
}

fn default_seed() -> u64 {
    42
}

impl Default for PredictiveSpec {
    fn default() -> Self {
        Self {
            trials: default_predictive_trials(),
            draws: default_draws(),
            seed: default_seed(),
        }
    }
}

impl Default for ScenarioFile {
    /// The penalty-kick analysis: 6 goals in 10 kicks on a 10-point grid,
    /// under three priors of decreasing strength.
    fn default() -> Self {
        let data = DataSpec {
            successes: 6,
            trials: 10,
        };
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: Some("Penalty-kick success probability".to_string()),
            grid: GridSpec::default(),
            scenarios: vec![
                ScenarioSpec {
                    name: "triangular".to_string(),
                    prior: PriorSpec::Triangular,
                    data,
                },
                ScenarioSpec {
                    name: "beta-10-10".to_string(),
                    prior: PriorSpec::Beta {
                        alpha: 10.0,
                        beta: 10.0,
                    },
                    data,
                },
                ScenarioSpec {
                    name: "beta-2-2".to_string(),
                    prior: PriorSpec::Beta {
                        alpha: 2.0,
                        beta: 2.0,
                    },
                    data,
                },
            ],
            predictive: Some(PredictiveSpec::default()),
        }
    }
}

/// On-disk encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Json,
    Toml,
}

impl ScenarioFormat {
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ScenarioFormat::Json),
            Some("toml") => Ok(ScenarioFormat::Toml),
            other => Err(ValidationError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl ScenarioFile {
    /// Load a scenario file, picking the parser from the extension.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let format = ScenarioFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        match format {
            ScenarioFormat::Json => Self::parse_json(&content),
            ScenarioFormat::Toml => Self::parse_toml(&content),
        }
    }

    pub fn parse_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    pub fn parse_toml(text: &str) -> Result<Self, ValidationError> {
        toml::from_str(text).map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Look up a scenario by name.
    pub fn scenario(&self, name: &str) -> Option<&ScenarioSpec> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}

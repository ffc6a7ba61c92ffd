//! Scenario file resolution and loading.
//!
//! Resolution order: CLI argument → environment variables → XDG config →
//! system config → builtin default.

use std::path::{Path, PathBuf};

use crate::scenario::ScenarioFile;
use crate::validate::{validate_scenario_file, ValidationError, ValidationResult};

/// Where a scenario file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/grid-bayes/.
    SystemConfig,

    /// Using the builtin penalty-kick scenario.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

pub const ENV_SCENARIO_PATH: &str = "GRID_BAYES_SCENARIO";
pub const ENV_CONFIG_DIR: &str = "GRID_BAYES_CONFIG_DIR";

/// Candidate file names inside a config directory, in preference order.
const SCENARIO_FILENAMES: [&str; 2] = ["scenario.toml", "scenario.json"];

const APP_NAME: &str = "grid-bayes";

/// A scenario file together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub file: ScenarioFile,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve the scenario path.
///
/// An explicit CLI path is returned even if it does not exist, so that the
/// caller gets an I/O error instead of a silent fallback to the default.
pub fn resolve_scenario_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_SCENARIO_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = find_in_dir(Path::new(&config_dir)) {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = find_in_dir(&dir) {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    if let Some(path) = find_in_dir(&system_config_dir()) {
        return (Some(path), ConfigSource::SystemConfig);
    }

    (None, ConfigSource::BuiltinDefault)
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    SCENARIO_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Resolve, load and validate the scenario file.
pub fn load_scenario(cli_path: Option<&Path>) -> ValidationResult<LoadedScenario> {
    let (path, source) = resolve_scenario_path(cli_path);
    let file = match path {
        Some(ref p) => {
            if !p.exists() {
                return Err(ValidationError::IoError(format!(
                    "Scenario file not found: {}",
                    p.display()
                )));
            }
            ScenarioFile::from_file(p)?
        }
        None => ScenarioFile::default(),
    };
    validate_scenario_file(&file)?;
    Ok(LoadedScenario { file, path, source })
}

/// Get the XDG config directory for grid-bayes.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

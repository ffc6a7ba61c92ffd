//! grid-bayes scenario configuration.
//!
//! This crate provides:
//! - Typed serde structs for scenario files (TOML or JSON)
//! - Path resolution (CLI → env → XDG → system → builtin default)
//! - Semantic validation

pub mod resolve;
pub mod scenario;
pub mod validate;

pub use resolve::{load_scenario, resolve_scenario_path, ConfigSource, LoadedScenario};
pub use scenario::{DataSpec, GridSpec, PredictiveSpec, PriorSpec, ScenarioFile, ScenarioSpec};
pub use validate::{validate_scenario_file, ValidationError, ValidationResult};

/// Schema version for scenario files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Largest future batch the predictive step accepts. The exact predictive
/// pmf holds `trials + 1` values and costs `trials × grid` log terms.
pub const MAX_PREDICTIVE_TRIALS: u64 = 100_000;

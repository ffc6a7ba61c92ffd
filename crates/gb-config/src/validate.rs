//! Scenario validation errors and semantic validation.

use std::collections::HashSet;

use thiserror::Error;

use crate::scenario::{DataSpec, GridSpec, PredictiveSpec, PriorSpec, ScenarioFile};
use crate::MAX_PREDICTIVE_TRIALS;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Scenario configuration errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported scenario file extension: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::UnsupportedFormat(_) => 62,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

/// Validate a scenario file semantically.
pub fn validate_scenario_file(file: &ScenarioFile) -> ValidationResult<()> {
    if file.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: file.schema_version.clone(),
        });
    }

    validate_grid(&file.grid)?;

    if file.scenarios.is_empty() {
        return Err(invalid("scenarios", "At least one scenario is required"));
    }

    let mut seen = HashSet::new();
    for (idx, scenario) in file.scenarios.iter().enumerate() {
        if scenario.name.trim().is_empty() {
            return Err(invalid(format!("scenarios[{}].name", idx), "Must not be empty"));
        }
        if !seen.insert(scenario.name.as_str()) {
            return Err(invalid(
                format!("scenarios[{}].name", idx),
                format!("Duplicate scenario name '{}'", scenario.name),
            ));
        }
        validate_prior(&format!("scenarios.{}.prior", scenario.name), &scenario.prior)?;
        validate_data(&format!("scenarios.{}.data", scenario.name), &scenario.data)?;
    }

    if let Some(ref predictive) = file.predictive {
        validate_predictive(predictive)?;
    }

    Ok(())
}

/// Validate grid bounds and size.
pub fn validate_grid(grid: &GridSpec) -> ValidationResult<()> {
    if grid.points < 1 {
        return Err(invalid("grid.points", "Must be at least 1"));
    }

    match (grid.lower, grid.upper) {
        (None, None) => Ok(()),
        (Some(lower), Some(upper)) => {
            if !(lower > 0.0 && lower < 1.0) {
                return Err(invalid("grid.lower", format!("Must be in (0, 1), got {}", lower)));
            }
            if !(upper > 0.0 && upper < 1.0) {
                return Err(invalid("grid.upper", format!("Must be in (0, 1), got {}", upper)));
            }
            if lower >= upper {
                return Err(invalid(
                    "grid",
                    format!("lower ({}) must be below upper ({})", lower, upper),
                ));
            }
            Ok(())
        }
        _ => Err(invalid("grid", "lower and upper must be given together")),
    }
}

/// Validate prior shape parameters.
pub fn validate_prior(field: &str, prior: &PriorSpec) -> ValidationResult<()> {
    if let PriorSpec::Beta { alpha, beta } = *prior {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(invalid(
                format!("{}.alpha", field),
                format!("Must be positive, got {}", alpha),
            ));
        }
        if !(beta.is_finite() && beta > 0.0) {
            return Err(invalid(
                format!("{}.beta", field),
                format!("Must be positive, got {}", beta),
            ));
        }
    }
    Ok(())
}

/// Validate observed counts.
pub fn validate_data(field: &str, data: &DataSpec) -> ValidationResult<()> {
    if data.successes < 0 {
        return Err(invalid(
            format!("{}.successes", field),
            format!("Must be non-negative, got {}", data.successes),
        ));
    }
    if data.trials < 0 {
        return Err(invalid(
            format!("{}.trials", field),
            format!("Must be non-negative, got {}", data.trials),
        ));
    }
    if data.successes > data.trials {
        return Err(invalid(
            field,
            format!(
                "successes ({}) exceeds trials ({})",
                data.successes, data.trials
            ),
        ));
    }
    Ok(())
}

fn validate_predictive(predictive: &PredictiveSpec) -> ValidationResult<()> {
    if predictive.trials < 0 {
        return Err(invalid(
            "predictive.trials",
            format!("Must be non-negative, got {}", predictive.trials),
        ));
    }
    if predictive.trials as u64 > MAX_PREDICTIVE_TRIALS {
        return Err(invalid(
            "predictive.trials",
            format!(
                "Must be at most {}, got {}",
                MAX_PREDICTIVE_TRIALS, predictive.trials
            ),
        ));
    }
    Ok(())
}

//! Observed binary trial data.

use serde::Serialize;

use crate::error::{Result, UpdateError};

/// `successes` out of `trials` independent binary outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observations {
    successes: u64,
    trials: u64,
}

impl Observations {
    pub fn new(successes: u64, trials: u64) -> Result<Self> {
        if successes > trials {
            return Err(UpdateError::invalid(
                "data.successes",
                format!("successes ({}) exceeds trials ({})", successes, trials),
            ));
        }
        Ok(Self { successes, trials })
    }

    /// Accept signed counts from loosely typed surfaces (config files, CLI).
    pub fn from_signed(successes: i64, trials: i64) -> Result<Self> {
        let successes = u64::try_from(successes).map_err(|_| {
            UpdateError::invalid(
                "data.successes",
                format!("must be non-negative, got {}", successes),
            )
        })?;
        let trials = u64::try_from(trials).map_err(|_| {
            UpdateError::invalid("data.trials", format!("must be non-negative, got {}", trials))
        })?;
        Self::new(successes, trials)
    }

    /// Count successes in a sequence of outcomes (`true` = success).
    pub fn from_outcomes(outcomes: &[bool]) -> Self {
        let successes = outcomes.iter().filter(|&&o| o).count() as u64;
        Self {
            successes,
            trials: outcomes.len() as u64,
        }
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn failures(&self) -> u64 {
        self.trials - self.successes
    }

    /// Raw success proportion, or None when no trials were observed.
    pub fn proportion(&self) -> Option<f64> {
        if self.trials == 0 {
            None
        } else {
            Some(self.successes as f64 / self.trials as f64)
        }
    }

    /// Pool two independent batches of trials.
    ///
    /// Fails with `InvalidArgument` when the pooled counts overflow `u64`.
    pub fn combine(&self, other: &Observations) -> Result<Self> {
        let trials = self.trials.checked_add(other.trials).ok_or_else(|| {
            UpdateError::invalid(
                "data.trials",
                format!("pooling {} and {} trials overflows", self.trials, other.trials),
            )
        })?;
        // successes <= trials on both sides, so this cannot overflow once trials fit
        Ok(Self {
            successes: self.successes + other.successes,
            trials,
        })
    }
}

impl TryFrom<&gb_config::DataSpec> for Observations {
    type Error = UpdateError;

    fn try_from(spec: &gb_config::DataSpec) -> Result<Self> {
        Observations::from_signed(spec.successes, spec.trials)
    }
}

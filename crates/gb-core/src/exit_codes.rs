//! Exit codes for the grid-bayes CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/input errors (recoverable by fixing arguments or files)
//! - 20-29: Internal errors (bugs, should be reported)

use gb_config::ValidationError;

use crate::error::UpdateError;

/// Exit codes for grid-bayes commands.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Ok = 0,

    /// Invalid arguments (bad grid, counts, prior shapes, lengths)
    ArgsError = 10,

    /// Scenario file failed to parse or validate
    ConfigError = 11,

    /// Prior and likelihood share no support on the grid
    DegenerateError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Ok
    }

    /// Codes 10-19: resolvable by the user.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Codes 20-29.
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Name used in JSON error payloads.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Ok => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::DegenerateError => "ERR_DEGENERATE",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&UpdateError> for ExitCode {
    fn from(err: &UpdateError) -> Self {
        match err {
            UpdateError::InvalidArgument { .. } => ExitCode::ArgsError,
            UpdateError::DegenerateMarginal { .. } => ExitCode::DegenerateError,
        }
    }
}

impl From<&ValidationError> for ExitCode {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::IoError(_) => ExitCode::IoError,
            _ => ExitCode::ConfigError,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

//! Fuzz target for TOML scenario files.
//!
//! Tests that TOML parsing and validation handle arbitrary input without
//! panicking.

#![no_main]

use gb_config::{validate_scenario_file, ScenarioFile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(file) = ScenarioFile::parse_toml(data) {
        let _ = validate_scenario_file(&file);
    }
});

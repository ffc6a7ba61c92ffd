//! Fuzz target for JSON scenario files.
//!
//! Parsing and validation must return errors for malformed input, never
//! panic, and any file that validates must run through the updater.

#![no_main]

use gb_config::{validate_scenario_file, ScenarioFile};
use gb_core::{Analysis, Grid, Observations, PriorFamily};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(file) = ScenarioFile::parse_json(text) else {
        return;
    };
    if validate_scenario_file(&file).is_err() || file.grid.points > 10_000 {
        return;
    }
    let Ok(grid) = Grid::try_from(&file.grid) else {
        return;
    };
    for spec in &file.scenarios {
        if let Ok(obs) = Observations::try_from(&spec.data) {
            let _ = Analysis::run(&grid, PriorFamily::from(spec.prior), obs);
        }
    }
});

//! Fuzz target for the grid update.
//!
//! Arbitrary weights must either produce a normalized posterior or one of
//! the documented errors.

#![no_main]

use arbitrary::Arbitrary;
use gb_core::{posterior, posterior_predictive_sample, Grid, UpdateError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    prior: Vec<f64>,
    likelihood: Vec<f64>,
    trials: u8,
    seed: u64,
}

fuzz_target!(|input: Input| {
    if input.prior.len() > 4096 {
        return;
    }
    match posterior(&input.prior, &input.likelihood) {
        Ok(post) => {
            let total: f64 = post.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "posterior sums to {}", total);
            for (p, q) in input.prior.iter().zip(&post) {
                if *p == 0.0 {
                    assert_eq!(*q, 0.0);
                }
            }
            let grid = Grid::interior(post.len()).expect("non-empty posterior");
            let draws = posterior_predictive_sample(&grid, &post, input.trials as u64, 16, input.seed)
                .expect("valid posterior samples");
            assert!(draws.iter().all(|k| *k <= input.trials as u64));
        }
        Err(UpdateError::InvalidArgument { .. }) | Err(UpdateError::DegenerateMarginal { .. }) => {}
    }
});

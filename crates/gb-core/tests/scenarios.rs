//! Penalty-kick scenarios: 6 goals in 10 kicks under priors of varying
//! strength, and the effect of collecting more data.

use gb_config::ScenarioFile;
use gb_core::{
    compare_priors, likelihood_weights, posterior, posterior_mean, prior_weights, Analysis, Grid,
    Observations, PriorFamily,
};

const OBSERVED: f64 = 0.6;

fn kick_grid() -> Grid {
    Grid::interior(10).expect("interior grid")
}

fn mean_for(grid: &Grid, family: PriorFamily, successes: u64, trials: u64) -> f64 {
    let prior = prior_weights(grid, &family).expect("prior");
    let lik = likelihood_weights(grid, successes, trials).expect("likelihood");
    let post = posterior(&prior, &lik).expect("posterior");
    posterior_mean(grid, &post).expect("mean")
}

#[test]
fn kick_grid_is_elevenths() {
    let grid = kick_grid();
    assert_eq!(grid.len(), 10);
    for (i, theta) in grid.iter().enumerate() {
        assert!((theta - (i + 1) as f64 / 11.0).abs() < 1e-15);
    }
}

#[test]
fn triangular_prior_pulls_mean_between_half_and_observed() {
    let mean = mean_for(&kick_grid(), PriorFamily::Triangular, 6, 10);
    assert!(mean > 0.5 && mean < 0.6, "posterior mean {mean}");
}

#[test]
fn weaker_beta_prior_lands_closer_to_data() {
    let grid = kick_grid();
    let strong = mean_for(&grid, PriorFamily::beta(10.0, 10.0).unwrap(), 6, 10);
    let weak = mean_for(&grid, PriorFamily::beta(2.0, 2.0).unwrap(), 6, 10);
    assert!(
        (weak - OBSERVED).abs() < (strong - OBSERVED).abs(),
        "beta(2,2) mean {weak} vs beta(10,10) mean {strong}"
    );
}

#[test]
fn more_data_dominates_the_prior() {
    let grid = kick_grid();
    let family = PriorFamily::beta(10.0, 10.0).unwrap();
    let small = mean_for(&grid, family, 6, 10);
    let large = mean_for(&grid, family, 30, 50);
    assert!(
        (large - OBSERVED).abs() < (small - OBSERVED).abs(),
        "n=50 mean {large} vs n=10 mean {small}"
    );
}

#[test]
fn beta_posteriors_track_conjugate_means_on_fine_grid() {
    // Beta(a, b) with k of n has posterior mean (a + k) / (a + b + n)
    let grid = Grid::interior(999).unwrap();
    for (a, b) in [(10.0, 10.0), (2.0, 2.0), (1.0, 1.0)] {
        let mean = mean_for(&grid, PriorFamily::beta(a, b).unwrap(), 6, 10);
        let exact = (a + 6.0) / (a + b + 10.0);
        assert!((mean - exact).abs() < 1e-3, "beta({a},{b}): {mean} vs {exact}");
    }
}

#[test]
fn builtin_scenario_file_runs_end_to_end() {
    let file = ScenarioFile::default();
    let grid = Grid::try_from(&file.grid).unwrap();
    assert_eq!(grid, kick_grid());

    let results: Vec<Analysis> = file
        .scenarios
        .iter()
        .map(|spec| {
            let data = Observations::try_from(&spec.data).unwrap();
            Analysis::run(&grid, PriorFamily::from(spec.prior), data).unwrap()
        })
        .collect();
    assert_eq!(results.len(), 3);

    let triangular = &results[0];
    assert!(triangular.posterior_mean > 0.5 && triangular.posterior_mean < 0.6);
    let strong = results[1].shrinkage().unwrap();
    let weak = results[2].shrinkage().unwrap();
    assert!(weak < strong);
}

#[test]
fn compare_priors_matches_individual_runs() {
    let grid = kick_grid();
    let data = Observations::new(6, 10).unwrap();
    let families = [PriorFamily::Triangular, PriorFamily::Uniform];
    let compared = compare_priors(&grid, &families, data).unwrap();
    for (analysis, family) in compared.iter().zip(families) {
        let single = Analysis::run(&grid, family, data).unwrap();
        assert_eq!(analysis.posterior, single.posterior);
    }
}

#[test]
fn independent_analyses_do_not_share_state() {
    let grid = kick_grid();
    let first = Analysis::run(&grid, PriorFamily::Triangular, Observations::new(6, 10).unwrap())
        .unwrap();
    let _other = Analysis::run(&grid, PriorFamily::Uniform, Observations::new(1, 9).unwrap())
        .unwrap();
    let again = Analysis::run(&grid, PriorFamily::Triangular, Observations::new(6, 10).unwrap())
        .unwrap();
    assert_eq!(first.posterior, again.posterior);
    assert_eq!(first.log_evidence, again.log_evidence);
}

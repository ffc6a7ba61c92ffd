//! Property-based tests for gb-math numerical functions.

use gb_math::binomial;
use gb_math::{
    beta_pdf, log_beta, log_beta_pdf, log_binomial, log_gamma, log_sum_exp, normalize,
    normalize_log_weights,
};
use proptest::prelude::*;

const TOL: f64 = 1e-10;
const LGAMMA_TOL: f64 = 1e-8;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a.is_infinite() && b.is_infinite() {
        return a.signum() == b.signum();
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// log_sum_exp
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn log_sum_exp_commutative(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        prop_assert!(approx_eq(log_sum_exp(&[a, b]), log_sum_exp(&[b, a]), TOL));
    }

    #[test]
    fn log_sum_exp_bounded_by_max(values in prop::collection::vec(-800.0..800.0f64, 1..50)) {
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let lse = log_sum_exp(&values);
        prop_assert!(lse.is_finite());
        prop_assert!(lse >= max - TOL);
        prop_assert!(lse <= max + (values.len() as f64).ln() + TOL);
    }
}

// ============================================================================
// log_gamma / log_beta / log_binomial
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn log_gamma_recurrence(z in 1.0..100.0f64) {
        let expected = log_gamma(z) + z.ln();
        prop_assert!(approx_eq(log_gamma(z + 1.0), expected, LGAMMA_TOL));
    }

    #[test]
    fn log_beta_symmetric(a in 0.1..50.0f64, b in 0.1..50.0f64) {
        prop_assert!(approx_eq(log_beta(a, b), log_beta(b, a), LGAMMA_TOL));
    }

    #[test]
    fn log_binomial_symmetric(n in 1u64..200, k_frac in 0.0..1.0f64) {
        let k = ((n as f64) * k_frac) as u64;
        prop_assert!(approx_eq(log_binomial(n, k), log_binomial(n, n - k), TOL));
    }
}

// ============================================================================
// Densities and mass functions
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn binomial_pmf_sums_to_one(n in 0u64..60, p in 0.001..0.999f64) {
        let total: f64 = (0..=n).map(|k| binomial::pmf(k, n, p)).sum();
        prop_assert!(approx_eq(total, 1.0, 1e-9), "n={} p={} total={}", n, p, total);
    }

    #[test]
    fn binomial_log_kernel_finite_for_interior_p(
        n in 0u64..20_000,
        k_frac in 0.0..=1.0f64,
        p in 0.001..0.999f64,
    ) {
        let k = ((n as f64) * k_frac) as u64;
        prop_assert!(binomial::log_kernel(k, n, p).is_finite());
    }

    #[test]
    fn beta_pdf_consistent_with_log(x in 0.01..0.99f64, a in 0.2..30.0f64, b in 0.2..30.0f64) {
        let pdf = beta_pdf(x, a, b);
        prop_assert!(pdf >= 0.0);
        prop_assert!(approx_eq(pdf.ln(), log_beta_pdf(x, a, b), 1e-9));
    }
}

// ============================================================================
// Normalization
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn normalize_sums_to_one(weights in prop::collection::vec(0.0..1e6f64, 1..100)) {
        prop_assume!(weights.iter().any(|w| *w > 0.0));
        let out = normalize(&weights).expect("positive total");
        let total: f64 = out.iter().sum();
        prop_assert!(approx_eq(total, 1.0, 1e-9));
    }

    #[test]
    fn normalize_log_matches_linear(weights in prop::collection::vec(1e-3..1e3f64, 1..50)) {
        let logs: Vec<f64> = weights.iter().map(|w| w.ln()).collect();
        let from_log = normalize_log_weights(&logs).expect("finite logs");
        let from_linear = normalize(&weights).expect("positive total");
        for (a, b) in from_log.iter().zip(&from_linear) {
            prop_assert!(approx_eq(*a, *b, 1e-9));
        }
    }

    #[test]
    fn normalize_log_shift_invariant(
        logs in prop::collection::vec(-50.0..50.0f64, 1..30),
        shift in -5000.0..5000.0f64,
    ) {
        let shifted: Vec<f64> = logs.iter().map(|l| l + shift).collect();
        let a = normalize_log_weights(&logs).expect("finite logs");
        let b = normalize_log_weights(&shifted).expect("finite logs");
        for (x, y) in a.iter().zip(&b) {
            prop_assert!(approx_eq(*x, *y, 1e-9));
        }
    }
}

#[test]
fn known_values_log_binomial() {
    assert!((log_binomial(10, 6) - 210.0_f64.ln()).abs() < 1e-10);
    assert!((log_binomial(20, 10) - 184_756.0_f64.ln()).abs() < 1e-8);
}

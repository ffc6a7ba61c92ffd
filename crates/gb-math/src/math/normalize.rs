//! Normalization of weight vectors in linear and log domain.

use super::stable::max_value;

/// Scale non-negative weights so they sum to 1.
///
/// Returns None for empty input, any negative or non-finite entry, or a zero
/// (or overflowing) total.
pub fn normalize(weights: &[f64]) -> Option<Vec<f64>> {
    if weights.is_empty() || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    Some(weights.iter().map(|w| w / total).collect())
}

/// Exponentiate and normalize log weights.
///
/// The maximum is subtracted before exponentiating so that the largest weight
/// becomes exactly 1 and nothing underflows to an all-zero vector. Entries of
/// -inf map to 0. Returns None for empty input, NaN or +inf entries, or when
/// every entry is -inf.
pub fn normalize_log_weights(log_weights: &[f64]) -> Option<Vec<f64>> {
    if log_weights.is_empty()
        || log_weights
            .iter()
            .any(|w| w.is_nan() || *w == f64::INFINITY)
    {
        return None;
    }
    let max = max_value(log_weights);
    if max == f64::NEG_INFINITY {
        return None;
    }
    let shifted: Vec<f64> = log_weights.iter().map(|w| (w - max).exp()).collect();
    normalize(&shifted)
}

/// Sum of `values[i] * weights[i]`. NaN on length mismatch.
pub fn weighted_sum(values: &[f64], weights: &[f64]) -> f64 {
    if values.len() != weights.len() {
        return f64::NAN;
    }
    values.iter().zip(weights).map(|(v, w)| v * w).sum()
}

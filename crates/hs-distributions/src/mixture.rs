//! Poisson-weighted mixtures used by the noncentral distributions.

use hs_core::Real;
use hs_math::special::ln_gamma;
use tracing::warn;

/// Relative size below which a Poisson weight no longer contributes.
const WEIGHT_TOLERANCE: Real = 1e-15;

/// Bound on the number of terms summed on either side of the mode.
const MAX_TERMS: u64 = 100_000;

/// `Σⱼ e^{-h} hʲ/j! · term(j)` for `h ≥ 0`.
///
/// Summation starts at the Poisson mode and proceeds outward in both
/// directions, stopping once a weight falls below `1e-15` of the running
/// sum. Starting at the mode keeps the weights representable for large `h`;
/// the result is normalized by the summed weights, which cancels the
/// rounding in the log-gamma evaluation of the mode weight.
pub(crate) fn poisson_mixture<F>(h: Real, term: F) -> Real
where
    F: Fn(u64) -> Real,
{
    if h == 0.0 {
        return term(0);
    }
    let mode = h.floor() as u64;
    let mode_weight = (-h + mode as Real * h.ln() - ln_gamma(mode as Real + 1.0)).exp();
    let mut sum = mode_weight * term(mode);
    let mut total_weight = mode_weight;

    let mut weight = mode_weight;
    let mut j = mode;
    loop {
        j += 1;
        weight *= h / j as Real;
        sum += weight * term(j);
        total_weight += weight;
        if weight == 0.0 || weight <= WEIGHT_TOLERANCE * sum {
            break;
        }
        if j - mode > MAX_TERMS {
            warn!(h, terms = j - mode, "poisson mixture did not converge");
            return Real::NAN;
        }
    }

    weight = mode_weight;
    j = mode;
    while j > 0 {
        weight *= j as Real / h;
        j -= 1;
        sum += weight * term(j);
        total_weight += weight;
        if weight <= WEIGHT_TOLERANCE * sum {
            break;
        }
    }
    sum / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weights_sum_to_one() {
        for h in [0.0, 0.3, 1.0, 7.5, 250.0, 5.0e4] {
            assert_relative_eq!(poisson_mixture(h, |_| 1.0), 1.0, max_relative = 1e-13);
        }
    }

    #[test]
    fn mean_of_poisson() {
        // E[j] = h
        assert_relative_eq!(poisson_mixture(12.25, |j| j as Real), 12.25, max_relative = 1e-12);
    }
}

//! The capability set shared by every distribution.

use hs_core::{errors::Result, unsupported, Real};

use crate::domain::Domain;
use crate::inverse::{invert, Inversion};

/// A univariate probability distribution.
///
/// `cdf` is `P(X ≤ x)` and `ccdf` is `P(X > x)`. Implementations compute
/// `ccdf` directly where a closed form exists instead of subtracting from
/// one.
pub trait ProbDistribution {
    /// The support of the distribution.
    fn domain(&self) -> Domain;

    /// Return `true` if the density is symmetric about `x`.
    fn is_symmetric(&self, _x: Real) -> bool {
        false
    }

    /// The probability density at `x`.
    fn pdf(&self, x: Real) -> Real;

    /// The cumulative distribution function `P(X ≤ x)`.
    fn cdf(&self, x: Real) -> Real;

    /// The complementary cumulative distribution function `P(X > x)`.
    fn ccdf(&self, x: Real) -> Real {
        1.0 - self.cdf(x)
    }

    /// Probability of the interval `[c - x, c + x]` about the point of
    /// symmetry `c`, extended to negative `x` as an odd function.
    ///
    /// Only symmetric distributions support this.
    fn interval_probability(&self, x: Real) -> Result<Real> {
        let _ = x;
        unsupported!("interval probability requires a symmetric distribution")
    }

    /// The `x` with `cdf(x) = p`.
    fn inverse_cdf(&self, p: Real) -> Result<Real> {
        invert(self, p, Inversion::Cdf)
    }

    /// The `x` with `ccdf(x) = p`.
    fn inverse_ccdf(&self, p: Real) -> Result<Real> {
        invert(self, p, Inversion::Ccdf)
    }

    /// The half-width `x` with `interval_probability(x) = p`, `p ∈ [-1, 1]`.
    fn inverse_interval_probability(&self, p: Real) -> Result<Real> {
        // surface the capability gap before searching
        self.interval_probability(0.0)?;
        invert(self, p, Inversion::Interval)
    }
}

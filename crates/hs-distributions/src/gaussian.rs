//! Gaussian (normal) distribution.

use std::f64::consts::{PI, SQRT_2};

use hs_core::{ensure, errors::Result, Real};
use hs_math::special::{erf, erf_inv, erfc, erfc_inv};

use crate::domain::Domain;
use crate::traits::ProbDistribution;

/// Normal distribution with mean `μ` and standard deviation `σ`.
///
/// All functions are closed forms of the (complementary) error function;
/// the symmetric-interval probability is `A(x) = erf(x / (σ√2))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianDistribution {
    mean: Real,
    sigma: Real,
}

impl Default for GaussianDistribution {
    fn default() -> Self {
        Self::standard()
    }
}

impl GaussianDistribution {
    /// Create a normal distribution.
    pub fn new(mean: Real, sigma: Real) -> Result<Self> {
        ensure!(mean.is_finite(), "mean must be finite, got {mean}");
        ensure!(
            sigma > 0.0 && sigma.is_finite(),
            "standard deviation must be positive, got {sigma}"
        );
        Ok(Self { mean, sigma })
    }

    /// The standard normal distribution N(0, 1).
    pub const fn standard() -> Self {
        Self {
            mean: 0.0,
            sigma: 1.0,
        }
    }

    /// Mean.
    pub fn mean(&self) -> Real {
        self.mean
    }

    /// Standard deviation.
    pub fn sigma(&self) -> Real {
        self.sigma
    }

    #[inline]
    fn scaled(&self, x: Real) -> Real {
        (x - self.mean) / (self.sigma * SQRT_2)
    }
}

impl ProbDistribution for GaussianDistribution {
    fn domain(&self) -> Domain {
        Domain::REAL_LINE
    }

    fn is_symmetric(&self, x: Real) -> bool {
        x == self.mean
    }

    fn pdf(&self, x: Real) -> Real {
        let z = (x - self.mean) / self.sigma;
        (-0.5 * z * z).exp() / (self.sigma * (2.0 * PI).sqrt())
    }

    fn cdf(&self, x: Real) -> Real {
        if x == self.mean {
            return 0.5;
        }
        0.5 * erfc(-self.scaled(x))
    }

    fn ccdf(&self, x: Real) -> Real {
        if x == self.mean {
            return 0.5;
        }
        0.5 * erfc(self.scaled(x))
    }

    fn interval_probability(&self, x: Real) -> Result<Real> {
        Ok(erf(x / (self.sigma * SQRT_2)))
    }

    fn inverse_cdf(&self, p: Real) -> Result<Real> {
        ensure!((0.0..=1.0).contains(&p), "probability must be in [0, 1], got {p}");
        Ok(if p == 0.0 {
            -Real::MAX
        } else if p == 1.0 {
            Real::MAX
        } else {
            self.mean - self.sigma * SQRT_2 * erfc_inv(2.0 * p)
        })
    }

    fn inverse_ccdf(&self, p: Real) -> Result<Real> {
        ensure!((0.0..=1.0).contains(&p), "probability must be in [0, 1], got {p}");
        Ok(if p == 0.0 {
            Real::MAX
        } else if p == 1.0 {
            -Real::MAX
        } else {
            self.mean + self.sigma * SQRT_2 * erfc_inv(2.0 * p)
        })
    }

    fn inverse_interval_probability(&self, p: Real) -> Result<Real> {
        ensure!((-1.0..=1.0).contains(&p), "probability must be in [-1, 1], got {p}");
        Ok(if p.abs() == 1.0 {
            Real::MAX.copysign(p)
        } else {
            self.sigma * SQRT_2 * erf_inv(p)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn standard_normal_values() {
        let g = GaussianDistribution::standard();
        assert_eq!(g.cdf(0.0), 0.5);
        assert_abs_diff_eq!(g.pdf(0.0), 1.0 / (2.0 * PI).sqrt(), epsilon = 1e-15);
        assert_abs_diff_eq!(g.cdf(1.96), 0.975_002_104_851_780, epsilon = 1e-12);
        assert_abs_diff_eq!(g.ccdf(5.0), 2.866_515_718_791_939e-7, epsilon = 1e-18);
    }

    #[test]
    fn shifted_and_scaled() {
        let g = GaussianDistribution::new(10.0, 2.0).unwrap();
        assert_eq!(g.cdf(10.0), 0.5);
        assert!(g.is_symmetric(10.0));
        assert!(!g.is_symmetric(0.0));
        assert_abs_diff_eq!(g.cdf(12.0), GaussianDistribution::standard().cdf(1.0), epsilon = 1e-15);
        assert_abs_diff_eq!(g.interval_probability(2.0).unwrap(), 0.682_689_492_137_086, epsilon = 1e-12);
    }

    #[test]
    fn closed_form_inverses() {
        let g = GaussianDistribution::new(-3.0, 0.5).unwrap();
        for p in [0.001, 0.25, 0.5, 0.75, 0.999] {
            assert_abs_diff_eq!(g.cdf(g.inverse_cdf(p).unwrap()), p, epsilon = 1e-12);
            assert_abs_diff_eq!(g.ccdf(g.inverse_ccdf(p).unwrap()), p, epsilon = 1e-12);
        }
        let x = g.inverse_interval_probability(0.95).unwrap();
        assert_abs_diff_eq!(x, 0.5 * 1.959_963_984_540_054, epsilon = 1e-10);
        assert_eq!(g.inverse_cdf(0.0).unwrap(), -Real::MAX);
    }

    #[test]
    fn invalid_parameters() {
        assert!(GaussianDistribution::new(0.0, 0.0).unwrap_err().is_invalid_argument());
        assert!(GaussianDistribution::new(Real::NAN, 1.0).is_err());
        assert!(GaussianDistribution::standard().inverse_cdf(-0.1).is_err());
    }
}

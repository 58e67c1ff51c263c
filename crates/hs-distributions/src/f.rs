//! Snedecor's F distribution, central and noncentral.

use hs_core::{ensure, errors::Result, Real};
use hs_math::special::{incomplete_beta, ln_beta};

use crate::domain::Domain;
use crate::mixture::poisson_mixture;
use crate::traits::ProbDistribution;

/// Density of `Beta(a, b)` at `y ∈ (0, 1)`.
fn beta_pdf(y: Real, a: Real, b: Real) -> Real {
    ((a - 1.0) * y.ln() + (b - 1.0) * (1.0 - y).ln() - ln_beta(a, b)).exp()
}

/// Density of the central F distribution.
pub fn central_pdf(f: Real, nu1: u64, nu2: u64) -> Real {
    if f < 0.0 {
        return 0.0;
    }
    if f == 0.0 {
        return match nu1 {
            1 => Real::INFINITY,
            2 => 1.0,
            _ => 0.0,
        };
    }
    let (n1, n2) = (nu1 as Real, nu2 as Real);
    let ln_pdf = 0.5 * n1 * n1.ln() + 0.5 * n2 * n2.ln() + (0.5 * n1 - 1.0) * f.ln()
        - 0.5 * (n1 + n2) * (n2 + n1 * f).ln()
        - ln_beta(0.5 * n1, 0.5 * n2);
    ln_pdf.exp()
}

/// `P(F ≤ f)` for the central F distribution.
pub fn central_cdf(f: Real, nu1: u64, nu2: u64) -> Real {
    if f <= 0.0 {
        return 0.0;
    }
    let (n1, n2) = (nu1 as Real, nu2 as Real);
    incomplete_beta(n1 * f / (n2 + n1 * f), 0.5 * n1, 0.5 * n2)
}

/// `P(F > f)` for the central F distribution.
pub fn central_ccdf(f: Real, nu1: u64, nu2: u64) -> Real {
    if f <= 0.0 {
        return 1.0;
    }
    let (n1, n2) = (nu1 as Real, nu2 as Real);
    incomplete_beta(n2 / (n2 + n1 * f), 0.5 * n2, 0.5 * n1)
}

/// F distribution with `ν₁` and `ν₂` degrees of freedom and optional
/// noncentrality `λ`.
///
/// The noncentral forms mix the central terms with the first shape
/// parameter of the incomplete beta function shifted by `j`, weighted by the
/// Poisson probabilities of mean `λ/2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FDistribution {
    nu1: u64,
    nu2: u64,
    lambda: Option<Real>,
}

impl FDistribution {
    /// The central distribution.
    pub fn new(nu1: u64, nu2: u64) -> Result<Self> {
        ensure!(
            nu1 >= 1 && nu2 >= 1,
            "degrees of freedom must be positive, got ({nu1}, {nu2})"
        );
        Ok(Self {
            nu1,
            nu2,
            lambda: None,
        })
    }

    /// The noncentral distribution with parameter `lambda ≥ 0`.
    pub fn noncentral(nu1: u64, nu2: u64, lambda: Real) -> Result<Self> {
        let central = Self::new(nu1, nu2)?;
        ensure!(
            lambda >= 0.0 && lambda.is_finite(),
            "noncentrality must be finite and non-negative, got {lambda}"
        );
        Ok(Self {
            lambda: Some(lambda),
            ..central
        })
    }

    /// Numerator degrees of freedom.
    pub fn degrees_of_freedom1(&self) -> u64 {
        self.nu1
    }

    /// Denominator degrees of freedom.
    pub fn degrees_of_freedom2(&self) -> u64 {
        self.nu2
    }

    /// The noncentrality parameter, if any.
    pub fn noncentrality(&self) -> Option<Real> {
        self.lambda
    }

    /// Return `true` for a noncentral distribution.
    pub fn is_noncentral(&self) -> bool {
        self.lambda.is_some()
    }
}

impl ProbDistribution for FDistribution {
    fn domain(&self) -> Domain {
        Domain::NON_NEGATIVE
    }

    fn pdf(&self, f: Real) -> Real {
        let lambda = match self.lambda {
            None => return central_pdf(f, self.nu1, self.nu2),
            Some(lambda) => lambda,
        };
        if f < 0.0 {
            return 0.0;
        }
        if f == 0.0 {
            return match self.nu1 {
                1 => Real::INFINITY,
                2 => (-lambda / 2.0).exp(),
                _ => 0.0,
            };
        }
        let (n1, n2) = (self.nu1 as Real, self.nu2 as Real);
        let denom = n2 + n1 * f;
        let y = n1 * f / denom;
        // dy/df
        let jacobian = n1 * n2 / (denom * denom);
        poisson_mixture(lambda / 2.0, |j| beta_pdf(y, 0.5 * n1 + j as Real, 0.5 * n2)) * jacobian
    }

    fn cdf(&self, f: Real) -> Real {
        match self.lambda {
            None => central_cdf(f, self.nu1, self.nu2),
            Some(_) if f <= 0.0 => 0.0,
            Some(lambda) => {
                let (n1, n2) = (self.nu1 as Real, self.nu2 as Real);
                let y = n1 * f / (n2 + n1 * f);
                poisson_mixture(lambda / 2.0, |j| {
                    incomplete_beta(y, 0.5 * n1 + j as Real, 0.5 * n2)
                })
            }
        }
    }

    fn ccdf(&self, f: Real) -> Real {
        match self.lambda {
            None => central_ccdf(f, self.nu1, self.nu2),
            Some(_) if f <= 0.0 => 1.0,
            Some(lambda) => {
                let (n1, n2) = (self.nu1 as Real, self.nu2 as Real);
                let y = n2 / (n2 + n1 * f);
                poisson_mixture(lambda / 2.0, |j| {
                    incomplete_beta(y, 0.5 * n2, 0.5 * n1 + j as Real)
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn central_values() {
        let d = FDistribution::new(3, 3).unwrap();
        assert_abs_diff_eq!(d.pdf(1.7), 0.168_683_763_703_431_347, epsilon = 1e-13);
        assert_abs_diff_eq!(d.cdf(1.7), 0.663_181_488_122_757_193, epsilon = 1e-13);

        let d = FDistribution::new(7, 8).unwrap();
        assert_relative_eq!(d.pdf(20.0), 3.297_771_539_238_707_76e-5, max_relative = 1e-10);
        assert_abs_diff_eq!(d.cdf(20.0), 0.999_820_637_473_974_115, epsilon = 1e-13);
        assert_relative_eq!(d.ccdf(20.0), 1.793_625_260_258_854_35e-4, max_relative = 1e-10);
    }

    #[test]
    fn density_at_origin() {
        assert_eq!(FDistribution::new(1, 5).unwrap().pdf(0.0), Real::INFINITY);
        assert_eq!(FDistribution::new(2, 5).unwrap().pdf(0.0), 1.0);
        assert_eq!(FDistribution::new(3, 5).unwrap().pdf(0.0), 0.0);
        let d = FDistribution::noncentral(2, 5, 1.4).unwrap();
        assert_abs_diff_eq!(d.pdf(0.0), (-0.7_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn noncentral_values() {
        let d = FDistribution::noncentral(2, 3, 2.3).unwrap();
        assert_abs_diff_eq!(d.pdf(1.5), 0.191_248_271_031_184_195, epsilon = 1e-12);
        assert_abs_diff_eq!(d.cdf(1.5), 0.399_891_074_862_363_007, epsilon = 1e-12);
        assert_abs_diff_eq!(d.ccdf(1.5), 0.600_108_925_137_636_993, epsilon = 1e-12);
    }

    #[test]
    fn zero_noncentrality_matches_central() {
        let central = FDistribution::new(2, 3).unwrap();
        let noncentral = FDistribution::noncentral(2, 3, 0.0).unwrap();
        assert_abs_diff_eq!(central.pdf(1.5), 0.176_776_695_296_636_881, epsilon = 1e-14);
        assert_abs_diff_eq!(noncentral.pdf(1.5), central.pdf(1.5), epsilon = 1e-14);
        assert_abs_diff_eq!(noncentral.cdf(1.5), central.cdf(1.5), epsilon = 1e-14);
    }

    #[test]
    fn invalid_parameters() {
        assert!(FDistribution::new(0, 3).unwrap_err().is_invalid_argument());
        assert!(FDistribution::noncentral(2, 3, Real::NAN).is_err());
    }
}

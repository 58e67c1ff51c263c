//! Student's t distribution, central and noncentral.

use std::f64::consts::{FRAC_2_PI, LN_2, PI, SQRT_2};

use hs_core::{ensure, errors::Result, unsupported, Real};
use hs_math::special::{erfc, hypergeometric_1f1, incomplete_beta, ln_gamma};
use crate::domain::Domain;
use crate::mixture::poisson_mixture;
use crate::traits::ProbDistribution;

/// Largest `ν` for which `A(t)` is summed with the trigonometric series.
const SERIES_MAX_NU: u64 = 1000;

/// Density of the central t distribution.
pub fn central_pdf(t: Real, nu: u64) -> Real {
    let n = nu as Real;
    let ln_pdf = ln_gamma(0.5 * (n + 1.0))
        - ln_gamma(0.5 * n)
        - 0.5 * (n * PI).ln()
        - 0.5 * (n + 1.0) * (1.0 + t * t / n).ln();
    ln_pdf.exp()
}

/// `A(t|ν)`, the probability that `|T| ≤ t`, extended as an odd function.
///
/// For `ν ≤ 1000` this is the finite series in `θ = atan(t/√ν)`, with closed
/// forms for one to three degrees of freedom; beyond that the incomplete
/// beta function is used.
pub fn interval_probability(t: Real, nu: u64) -> Real {
    let n = nu as Real;
    if nu > SERIES_MAX_NU {
        let a = 1.0 - incomplete_beta(n / (n + t * t), 0.5 * n, 0.5);
        return a.copysign(t);
    }
    let theta = (t / n.sqrt()).atan();
    if nu == 1 {
        return FRAC_2_PI * theta;
    }
    let sin_theta = theta.sin();
    if nu == 2 {
        return sin_theta;
    }
    let cos_theta = theta.cos();
    if nu == 3 {
        return FRAC_2_PI * (theta + sin_theta * cos_theta);
    }
    let cos2 = cos_theta * cos_theta;
    let limit = nu - 2;
    if nu % 2 == 1 {
        let mut term = cos_theta;
        let mut sum = term;
        let mut odd = 1;
        while odd < limit {
            term *= (odd + 1) as Real / (odd + 2) as Real * cos2;
            sum += term;
            odd += 2;
        }
        FRAC_2_PI * (theta + sin_theta * sum)
    } else {
        let mut term = 1.0;
        let mut sum = term;
        let mut even = 0;
        while even < limit {
            term *= (even + 1) as Real / (even + 2) as Real * cos2;
            sum += term;
            even += 2;
        }
        sin_theta * sum
    }
}

/// `P(|T| > |t|) / 2`, the one-sided tail beyond `|t|`.
fn central_tail(t: Real, nu: u64) -> Real {
    let n = nu as Real;
    0.5 * incomplete_beta(n / (n + t * t), 0.5 * n, 0.5)
}

/// `P(T ≤ t)` for the central t distribution.
pub fn central_cdf(t: Real, nu: u64) -> Real {
    if t < 0.0 {
        central_tail(t, nu)
    } else {
        0.5 * (1.0 + interval_probability(t, nu))
    }
}

/// `P(T > t)` for the central t distribution.
pub fn central_ccdf(t: Real, nu: u64) -> Real {
    if t > 0.0 {
        central_tail(t, nu)
    } else {
        0.5 * (1.0 - interval_probability(t, nu))
    }
}

/// `P(T ≤ t)` for the noncentral t distribution with noncentrality `μ`.
///
/// Lenth's series in incomplete beta functions for `t ≥ 0`, with
/// `P(t, ν, μ) = 1 - P(-t, ν, -μ)` for negative `t`. The series is a Poisson
/// mixture with mean `μ²/2`, summed outward from its mode so that large
/// `|μ|` does not underflow the leading weight.
pub fn noncentral_cdf(t: Real, nu: u64, mu: Real) -> Real {
    if t < 0.0 {
        return 1.0 - noncentral_cdf(-t, nu, -mu);
    }
    let half_nu = 0.5 * nu as Real;
    let y = t * t / (t * t + nu as Real);
    let odd_scale = mu / SQRT_2;
    // the odd weights are the even ones times μ/√2 · Γ(j + 1)/Γ(j + 3/2)
    let sum = poisson_mixture(0.5 * mu * mu, |j| {
        let jr = j as Real;
        let odd_ratio = odd_scale * (ln_gamma(jr + 1.0) - ln_gamma(jr + 1.5)).exp();
        incomplete_beta(y, 0.5 + jr, half_nu) + odd_ratio * incomplete_beta(y, jr + 1.0, half_nu)
    });
    0.5 * erfc(mu / SQRT_2) + 0.5 * sum
}

/// `P(T > t)` for the noncentral t distribution.
pub fn noncentral_ccdf(t: Real, nu: u64, mu: Real) -> Real {
    if t < 0.0 {
        noncentral_cdf(-t, nu, -mu)
    } else {
        1.0 - noncentral_cdf(t, nu, mu)
    }
}

/// Density of the noncentral t distribution, expressed with Kummer's
/// confluent hypergeometric function `M(a, b, z)`.
pub fn noncentral_pdf(t: Real, nu: u64, mu: Real) -> Real {
    let n = nu as Real;
    let nu_t2 = n + t * t;
    let z = mu * mu * t * t / (2.0 * nu_t2);
    let ln_prefactor = 0.5 * n * n.ln() + ln_gamma(n + 1.0)
        - 0.5 * mu * mu
        - n * LN_2
        - 0.5 * n * nu_t2.ln()
        - ln_gamma(0.5 * n);
    let odd = SQRT_2 * mu * t * hypergeometric_1f1(0.5 * n + 1.0, 1.5, z) / nu_t2
        * (ln_prefactor - ln_gamma(0.5 * (n + 1.0))).exp();
    let even = hypergeometric_1f1(0.5 * (n + 1.0), 0.5, z) / nu_t2.sqrt()
        * (ln_prefactor - ln_gamma(0.5 * n + 1.0)).exp();
    odd + even
}

/// Student's t distribution with `ν` degrees of freedom and noncentrality
/// `μ` (zero for the central distribution).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentsTDistribution {
    nu: u64,
    mu: Real,
}

impl StudentsTDistribution {
    /// The central distribution.
    pub fn new(nu: u64) -> Result<Self> {
        Self::noncentral(nu, 0.0)
    }

    /// The noncentral distribution; `mu == 0` gives the central one.
    pub fn noncentral(nu: u64, mu: Real) -> Result<Self> {
        ensure!(nu >= 1, "degrees of freedom must be positive, got {nu}");
        ensure!(mu.is_finite(), "noncentrality must be finite, got {mu}");
        Ok(Self { nu, mu })
    }

    /// Degrees of freedom.
    pub fn degrees_of_freedom(&self) -> u64 {
        self.nu
    }

    /// The noncentrality parameter, if nonzero.
    pub fn noncentrality(&self) -> Option<Real> {
        self.is_noncentral().then_some(self.mu)
    }

    /// Return `true` when `μ ≠ 0`.
    pub fn is_noncentral(&self) -> bool {
        self.mu != 0.0
    }
}

impl ProbDistribution for StudentsTDistribution {
    fn domain(&self) -> Domain {
        Domain::REAL_LINE
    }

    fn is_symmetric(&self, x: Real) -> bool {
        x == 0.0 && !self.is_noncentral()
    }

    fn pdf(&self, t: Real) -> Real {
        if self.is_noncentral() {
            noncentral_pdf(t, self.nu, self.mu)
        } else {
            central_pdf(t, self.nu)
        }
    }

    fn cdf(&self, t: Real) -> Real {
        if self.is_noncentral() {
            noncentral_cdf(t, self.nu, self.mu)
        } else {
            central_cdf(t, self.nu)
        }
    }

    fn ccdf(&self, t: Real) -> Real {
        if self.is_noncentral() {
            noncentral_ccdf(t, self.nu, self.mu)
        } else {
            central_ccdf(t, self.nu)
        }
    }

    fn interval_probability(&self, t: Real) -> Result<Real> {
        if self.is_noncentral() {
            unsupported!("interval probability of a noncentral t distribution");
        }
        Ok(interval_probability(t, self.nu))
    }
}

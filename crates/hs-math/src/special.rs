//! Special functions used by the distribution library.
//!
//! Gamma, log-gamma, beta, the regularized incomplete beta and gamma
//! functions, and the error functions delegate to `statrs`. Arguments outside
//! the mathematical domain yield `NaN` instead of panicking, so callers can
//! evaluate series without pre-checking every term.

use hs_core::Real;
use tracing::warn;

/// Iteration bound for the confluent hypergeometric series.
const MAX_HYPERGEOMETRIC_TERMS: usize = 10_000;

/// The Gamma function Γ(z).
///
/// Undefined (`NaN`) at zero and the negative integers.
pub fn gamma(z: Real) -> Real {
    if z <= 0.0 && z == z.floor() {
        return Real::NAN;
    }
    statrs::function::gamma::gamma(z)
}

/// The natural logarithm of the Gamma function: ln Γ(z), for `z > 0`.
pub fn ln_gamma(z: Real) -> Real {
    if z <= 0.0 || z.is_nan() {
        return Real::NAN;
    }
    statrs::function::gamma::ln_gamma(z)
}

/// The Beta function B(a, b) = Γ(a)Γ(b)/Γ(a+b).
pub fn beta(a: Real, b: Real) -> Real {
    ln_beta(a, b).exp()
}

/// ln B(a, b) for `a, b > 0`.
pub fn ln_beta(a: Real, b: Real) -> Real {
    if a <= 0.0 || b <= 0.0 || a.is_nan() || b.is_nan() {
        return Real::NAN;
    }
    statrs::function::beta::ln_beta(a, b)
}

/// The regularized incomplete beta function I_x(a, b).
///
/// `x` is clamped to `[0, 1]`; non-positive shape parameters yield `NaN`.
pub fn incomplete_beta(x: Real, a: Real, b: Real) -> Real {
    if a <= 0.0 || b <= 0.0 || x.is_nan() || a.is_nan() || b.is_nan() {
        return Real::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    statrs::function::beta::beta_reg(a, b, x)
}

/// The regularized lower incomplete gamma function P(a, x).
pub fn incomplete_gamma_lower(a: Real, x: Real) -> Real {
    if a <= 0.0 || a.is_nan() || x.is_nan() {
        return Real::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    statrs::function::gamma::gamma_lr(a, x)
}

/// The regularized upper incomplete gamma function Q(a, x) = 1 − P(a, x).
pub fn incomplete_gamma_upper(a: Real, x: Real) -> Real {
    if a <= 0.0 || a.is_nan() || x.is_nan() {
        return Real::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    if x.is_infinite() {
        return 0.0;
    }
    statrs::function::gamma::gamma_ur(a, x)
}

/// The error function erf(x) = 2/√π ∫₀ˣ e^{-t²} dt.
pub fn erf(x: Real) -> Real {
    statrs::function::erf::erf(x)
}

/// The complementary error function erfc(x) = 1 − erf(x), computed without
/// cancellation for large `x`.
pub fn erfc(x: Real) -> Real {
    statrs::function::erf::erfc(x)
}

/// The inverse error function erf⁻¹(x) for `x ∈ [-1, 1]`.
pub fn erf_inv(x: Real) -> Real {
    statrs::function::erf::erf_inv(x)
}

/// The inverse complementary error function erfc⁻¹(x) for `x ∈ [0, 2]`.
pub fn erfc_inv(x: Real) -> Real {
    statrs::function::erf::erfc_inv(x)
}

/// Kummer's confluent hypergeometric function M(a, b, z) for `z ≥ 0`.
///
/// Sums `Σ (a)ₖ/(b)ₖ zᵏ/k!` until the terms stop contributing.
pub fn hypergeometric_1f1(a: Real, b: Real, z: Real) -> Real {
    if z == 0.0 {
        return 1.0;
    }
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 0..MAX_HYPERGEOMETRIC_TERMS {
        let k = k as Real;
        term *= (a + k) / (b + k) * z / (k + 1.0);
        sum += term;
        if term.abs() <= sum.abs() * 1e-17 {
            return sum;
        }
    }
    warn!(a, b, z, "confluent hypergeometric series did not converge");
    Real::NAN
}

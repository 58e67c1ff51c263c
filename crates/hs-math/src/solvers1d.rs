//! One-dimensional root finding on a bracketing interval.
//!
//! Both solvers require `f(x_min)` and `f(x_max)` to have opposite signs (or
//! one of them to be zero). A `NaN` function value aborts the search with
//! [`Error::Convergence`].

use hs_core::{
    ensure,
    errors::{Error, Result},
    fail, Real,
};
use tracing::warn;

/// Iteration bound shared by the solvers.
pub const MAX_ITERATIONS: u32 = 200;

/// Accuracy used when the caller passes a non-positive one.
pub const DEFAULT_ACCURACY: Real = 1.0e-12;

fn evaluate<F: Fn(Real) -> Real>(f: &F, x: Real) -> Result<Real> {
    let y = f(x);
    if y.is_nan() {
        return Err(Error::Convergence(format!("objective is NaN at x = {x}")));
    }
    Ok(y)
}

fn check_bracket(x_min: Real, x_max: Real, f_min: Real, f_max: Real) -> Result<()> {
    ensure!(
        x_min.is_finite() && x_max.is_finite() && x_min < x_max,
        "invalid bracket [{x_min}, {x_max}]"
    );
    ensure!(
        f_min * f_max <= 0.0,
        "root not bracketed: f({x_min}) = {f_min}, f({x_max}) = {f_max}"
    );
    Ok(())
}

/// Find a root of `f` in `[x_min, x_max]` with Brent's method.
///
/// Mixes inverse quadratic interpolation, secant steps, and bisection; each
/// step keeps the root bracketed.
pub fn brent<F>(f: F, x_min: Real, x_max: Real, accuracy: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let accuracy = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };

    let (mut a, mut b) = (x_min, x_max);
    let (mut fa, mut fb) = (evaluate(&f, a)?, evaluate(&f, b)?);
    check_bracket(a, b, fa, fb)?;
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    // `c` is the contrapoint: the root always lies between `b` and `c`.
    let (mut c, mut fc) = (a, fa);
    let mut step = b - a;
    let mut previous_step = step;

    for _ in 0..MAX_ITERATIONS {
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            step = b - a;
            previous_step = step;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tolerance = 2.0 * Real::EPSILON * b.abs() + 0.5 * accuracy;
        let half_width = 0.5 * (c - b);
        if half_width.abs() <= tolerance || fb == 0.0 {
            return Ok(b);
        }

        if previous_step.abs() >= tolerance && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * half_width * s, 1.0 - s)
            } else {
                let qa = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * half_width * qa * (qa - r) - (b - a) * (r - 1.0)),
                    (qa - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            let interpolation_ok = 2.0 * p < 3.0 * half_width * q - (tolerance * q).abs()
                && 2.0 * p < (previous_step * q).abs();
            if interpolation_ok {
                previous_step = step;
                step = p / q;
            } else {
                step = half_width;
                previous_step = step;
            }
        } else {
            step = half_width;
            previous_step = step;
        }

        a = b;
        fa = fb;
        b += if step.abs() > tolerance {
            step
        } else {
            tolerance.copysign(half_width)
        };
        fb = evaluate(&f, b)?;
    }

    warn!(x_min, x_max, "brent solver reached its iteration bound");
    fail!("brent solver: no convergence after {MAX_ITERATIONS} iterations")
}

/// Find a root of `f` in `[x_min, x_max]` by bisection.
pub fn bisection<F>(f: F, x_min: Real, x_max: Real, accuracy: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let accuracy = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };

    let (mut lo, mut hi) = (x_min, x_max);
    let f_lo = evaluate(&f, lo)?;
    let f_hi = evaluate(&f, hi)?;
    check_bracket(lo, hi, f_lo, f_hi)?;
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    let rising = f_lo < 0.0;

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = evaluate(&f, mid)?;
        if f_mid == 0.0 || 0.5 * (hi - lo) < accuracy {
            return Ok(mid);
        }
        if (f_mid < 0.0) == rising {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    warn!(x_min, x_max, "bisection reached its iteration bound");
    fail!("bisection: no convergence after {MAX_ITERATIONS} iterations")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn brent_sqrt2() {
        let root = brent(|x| x * x - 2.0, 0.0, 2.0, 1e-14).unwrap();
        assert_abs_diff_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn brent_decreasing_function() {
        let root = brent(|x: f64| (-x).exp() - 0.5, 0.0, 5.0, 1e-14).unwrap();
        assert_abs_diff_eq!(root, 2.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn brent_root_on_endpoint() {
        assert_eq!(brent(|x| x - 1.0, 1.0, 3.0, 1e-12).unwrap(), 1.0);
    }

    #[test]
    fn brent_rejects_unbracketed() {
        let err = brent(|x| x * x + 1.0, -1.0, 1.0, 1e-12).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn brent_reports_nan_objective() {
        let err = brent(|x| if x > 0.5 { f64::NAN } else { x - 0.7 }, 0.0, 1.0, 1e-12)
            .unwrap_err();
        assert!(matches!(err, Error::Convergence(_)));
    }

    #[test]
    fn bisection_cos() {
        let root = bisection(f64::cos, 0.0, 3.0, 1e-13).unwrap();
        assert_abs_diff_eq!(root, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }
}

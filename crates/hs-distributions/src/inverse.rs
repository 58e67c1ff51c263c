//! Generic inversion of cumulative probabilities.
//!
//! Distributions without a closed-form quantile share one procedure: handle
//! the boundary probabilities from the domain's endpoints, walk outward from
//! an initial guess of zero with steps growing by a factor of 1.5 (halved
//! whenever they would leave a finite domain) until the target probability
//! is bracketed, then refine with Brent's method.

use hs_core::{ensure, errors::Result, fail, Real};
use hs_math::{brent, next_after};
use tracing::debug;

use crate::traits::ProbDistribution;

/// Bound on the number of outward steps while bracketing.
const MAX_BRACKET_STEPS: u32 = 4096;

/// Absolute accuracy requested from the root finder; the relative term
/// `2·ε·|x|` is added by the solver.
const ROOT_ACCURACY: Real = 1e-15;

/// Which probability function is inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inversion {
    Cdf,
    Ccdf,
    Interval,
}

impl Inversion {
    /// The probabilities attained at the lower and upper end of the domain,
    /// expressed for the increasing form of the function.
    fn range(self) -> (Real, Real) {
        match self {
            Inversion::Cdf => (0.0, 1.0),
            Inversion::Ccdf => (-1.0, 0.0),
            Inversion::Interval => (-1.0, 1.0),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Inversion::Cdf => "cdf",
            Inversion::Ccdf => "ccdf",
            Inversion::Interval => "interval probability",
        }
    }
}

/// Solve `F(x) = p` for the function selected by `kind`.
pub(crate) fn invert<D>(dist: &D, p: Real, kind: Inversion) -> Result<Real>
where
    D: ProbDistribution + ?Sized,
{
    let (bottom, top) = match kind {
        Inversion::Interval => (-1.0, 1.0),
        _ => (0.0, 1.0),
    };
    ensure!(
        p >= bottom && p <= top,
        "{} inverse needs a probability in [{bottom}, {top}], got {p}",
        kind.name()
    );

    // Increasing form: the complementary cdf is negated.
    let (target, g): (Real, Box<dyn Fn(Real) -> Real + '_>) = match kind {
        Inversion::Cdf => (p, Box::new(|x: Real| dist.cdf(x))),
        Inversion::Ccdf => (-p, Box::new(|x: Real| -dist.ccdf(x))),
        Inversion::Interval => (
            p,
            Box::new(|x: Real| dist.interval_probability(x).unwrap_or(Real::NAN)),
        ),
    };
    let (at_min, at_max) = kind.range();
    let domain = dist.domain();

    let mut dmin = domain.min;
    if dmin == Real::NEG_INFINITY {
        if target == at_min {
            return Ok(if domain.min_closed {
                Real::NEG_INFINITY
            } else {
                -Real::MAX
            });
        }
        dmin = -Real::MAX;
    } else if !domain.min_closed {
        dmin = next_after(dmin, Real::MAX);
    }

    let mut dmax = domain.max;
    if dmax == Real::INFINITY {
        if target == at_max {
            return Ok(if domain.max_closed {
                Real::INFINITY
            } else {
                Real::MAX
            });
        }
        dmax = Real::MAX;
    } else if !domain.max_closed {
        dmax = next_after(dmax, -Real::MAX);
    }

    if target == at_min {
        return Ok(dmin);
    }
    if target == at_max {
        return Ok(dmax);
    }

    let checked = |x: Real| -> Result<Real> {
        let y = g(x);
        if y.is_nan() {
            fail!("{} evaluated to NaN at x = {x}", kind.name());
        }
        Ok(y)
    };

    let guess = 0.0_f64.clamp(dmin, dmax);

    let mut low = guess;
    let mut g_low = checked(low)?;
    let mut step = -1.0;
    let mut steps = 0;
    while g_low > target {
        while low + step < dmin {
            step /= 2.0;
        }
        low += step;
        step *= 1.5;
        g_low = checked(low)?;
        steps += 1;
        if steps > MAX_BRACKET_STEPS {
            fail!("no lower bracket for {} = {p}", kind.name());
        }
    }

    let mut high = guess.max(low);
    let mut g_high = checked(high)?;
    step = 1.0;
    steps = 0;
    while g_high < target {
        while high + step > dmax {
            step /= 2.0;
        }
        high += step;
        step *= 1.5;
        g_high = checked(high)?;
        steps += 1;
        if steps > MAX_BRACKET_STEPS {
            fail!("no upper bracket for {} = {p}", kind.name());
        }
    }

    debug!(low, high, target, kind = kind.name(), "inverse bracketed");

    if g_low == target {
        return Ok(low);
    }
    if g_high == target || low >= high {
        return Ok(high);
    }
    brent(|x| g(x) - target, low, high, ROOT_ACCURACY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use approx::assert_abs_diff_eq;

    /// Uniform on `[lo, hi]`.
    struct Uniform {
        lo: Real,
        hi: Real,
    }

    impl ProbDistribution for Uniform {
        fn domain(&self) -> Domain {
            Domain::closed(self.lo, self.hi)
        }
        fn pdf(&self, x: Real) -> Real {
            if (self.lo..=self.hi).contains(&x) {
                1.0 / (self.hi - self.lo)
            } else {
                0.0
            }
        }
        fn cdf(&self, x: Real) -> Real {
            ((x - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0)
        }
    }

    /// Logistic distribution on the real line.
    struct Logistic;

    impl ProbDistribution for Logistic {
        fn domain(&self) -> Domain {
            Domain::REAL_LINE
        }
        fn is_symmetric(&self, x: Real) -> bool {
            x == 0.0
        }
        fn pdf(&self, x: Real) -> Real {
            let e = (-x).exp();
            e / (1.0 + e).powi(2)
        }
        fn cdf(&self, x: Real) -> Real {
            1.0 / (1.0 + (-x).exp())
        }
        fn ccdf(&self, x: Real) -> Real {
            1.0 / (1.0 + x.exp())
        }
        fn interval_probability(&self, x: Real) -> Result<Real> {
            Ok(self.cdf(x) - self.cdf(-x))
        }
    }

    #[test]
    fn bounded_domain_endpoints() {
        let u = Uniform { lo: 2.0, hi: 6.0 };
        assert_eq!(u.inverse_cdf(0.0).unwrap(), 2.0);
        assert_eq!(u.inverse_cdf(1.0).unwrap(), 6.0);
        assert_eq!(u.inverse_ccdf(1.0).unwrap(), 2.0);
        assert_abs_diff_eq!(u.inverse_cdf(0.25).unwrap(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(u.inverse_ccdf(0.25).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_bounded_domain() {
        let u = Uniform { lo: -30.0, hi: -10.0 };
        assert_abs_diff_eq!(u.inverse_cdf(0.5).unwrap(), -20.0, epsilon = 1e-11);
    }

    #[test]
    fn open_infinite_domain() {
        let d = Logistic;
        assert_eq!(d.inverse_cdf(0.0).unwrap(), -Real::MAX);
        assert_eq!(d.inverse_cdf(1.0).unwrap(), Real::MAX);
        for p in [0.001, 0.25, 0.5, 0.75, 0.999] {
            let x = d.inverse_cdf(p).unwrap();
            assert_abs_diff_eq!(x, (p / (1.0 - p)).ln(), epsilon = 1e-10);
            let x = d.inverse_ccdf(p).unwrap();
            assert_abs_diff_eq!(d.ccdf(x), p, epsilon = 1e-13);
        }
    }

    #[test]
    fn interval_inverse_is_odd() {
        let d = Logistic;
        let x = d.inverse_interval_probability(0.5).unwrap();
        assert_abs_diff_eq!(d.interval_probability(x).unwrap(), 0.5, epsilon = 1e-13);
        let y = d.inverse_interval_probability(-0.5).unwrap();
        assert_abs_diff_eq!(x, -y, epsilon = 1e-10);
    }

    #[test]
    fn unsupported_interval_and_bad_probability() {
        let u = Uniform { lo: 0.0, hi: 1.0 };
        assert!(u.inverse_interval_probability(0.5).unwrap_err().is_unsupported());
        assert!(u.inverse_cdf(1.5).unwrap_err().is_invalid_argument());
        assert!(u.inverse_cdf(Real::NAN).unwrap_err().is_invalid_argument());
    }
}

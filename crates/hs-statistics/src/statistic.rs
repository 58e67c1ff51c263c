//! The contract shared by every test statistic.
//!
//! A [`Statistic`] supplies its value and its sampling distribution under
//! the null hypothesis; p-values, critical values, power and the type II
//! error probability are derived from those in the provided methods.

use std::fmt;

use hs_core::{
    ensure,
    errors::{Error, Result},
    unsupported, Real,
};
use hs_distributions::{Distribution, ProbDistribution};

/// Which tail (or tails) a p-value or critical value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PValueMode {
    /// Upper tail: `P(X > value)`.
    PositiveSide,
    /// Lower tail: `P(X ≤ value)`.
    NegativeSide,
    /// Both tails of a distribution symmetric about the optimal value.
    TwoSided,
    /// The tail on the side of the optimal value where the statistic lies.
    OneSided,
}

impl fmt::Display for PValueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PValueMode::PositiveSide => "positive side",
            PValueMode::NegativeSide => "negative side",
            PValueMode::TwoSided => "two-sided",
            PValueMode::OneSided => "one-sided",
        };
        f.write_str(name)
    }
}

/// The rejection region used for power calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Reject when the statistic exceeds the critical value.
    Above(Real),
    /// Reject when the statistic is at most the critical value.
    Below(Real),
    /// Reject outside the interval between the two critical values.
    Outside(Real, Real),
}

/// Degrees of freedom of a statistic's sampling distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegreesOfFreedom {
    /// A single integral parameter.
    Integer(u64),
    /// A fractional value; the distribution uses its floor.
    Fractional(Real),
    /// Numerator and denominator degrees of freedom.
    Pair(u64, u64),
}

/// A test statistic with a known sampling distribution.
pub trait Statistic {
    /// The current value of the statistic.
    fn value(&self) -> Result<Real>;

    /// The value expected when the null hypothesis holds exactly.
    fn optimal_value(&self) -> Real {
        0.0
    }

    /// The sampling distribution under the null hypothesis.
    fn distribution(&self) -> Result<Distribution>;

    /// The sampling distribution for a given noncentrality parameter.
    fn noncentral_distribution(&self, noncentrality: Real) -> Result<Distribution> {
        let _ = noncentrality;
        unsupported!("statistic has no noncentral distribution")
    }

    /// Degrees of freedom of [`distribution`](Self::distribution).
    fn degrees_of_freedom(&self) -> Result<DegreesOfFreedom>;

    /// The noncentrality parameter implied by a hypothesized effect.
    fn noncentrality(&self, effect: Real) -> Result<Real> {
        let _ = effect;
        unsupported!("statistic cannot derive a noncentrality parameter")
    }

    /// The noncentrality parameter implied by one effect per component.
    ///
    /// A single effect is forwarded to [`noncentrality`](Self::noncentrality).
    fn noncentrality_for(&self, effects: &[Real]) -> Result<Real> {
        match effects {
            [] => Err(Error::InvalidArgument("at least one effect is required".into())),
            [effect] => self.noncentrality(*effect),
            _ => unsupported!("statistic takes a single effect"),
        }
    }

    /// Resolve an optional mode: two-sided when the null distribution is
    /// symmetric about the optimal value, one-sided otherwise.
    fn resolve_mode(&self, mode: Option<PValueMode>) -> Result<PValueMode> {
        match mode {
            Some(mode) => Ok(mode),
            None if self.distribution()?.is_symmetric(self.optimal_value()) => {
                Ok(PValueMode::TwoSided)
            }
            None => Ok(PValueMode::OneSided),
        }
    }

    /// The p-value of the current value.
    ///
    /// `TwoSided` fails unless the distribution is symmetric about the
    /// optimal value.
    fn p_value(&self, mode: Option<PValueMode>) -> Result<Real> {
        let mode = self.resolve_mode(mode)?;
        let distribution = self.distribution()?;
        let stat = self.value()?;
        let optimal = self.optimal_value();
        match mode {
            PValueMode::PositiveSide => Ok(distribution.ccdf(stat)),
            PValueMode::NegativeSide => Ok(distribution.cdf(stat)),
            PValueMode::TwoSided => {
                ensure!(
                    distribution.is_symmetric(optimal),
                    "{mode} p-value needs a distribution symmetric about {optimal}"
                );
                Ok(if stat == optimal {
                    1.0
                } else if stat < optimal {
                    2.0 * distribution.cdf(stat)
                } else {
                    2.0 * distribution.ccdf(stat)
                })
            }
            PValueMode::OneSided if stat < optimal => Ok(distribution.cdf(stat)),
            PValueMode::OneSided => Ok(distribution.ccdf(stat)),
        }
    }

    /// The critical value at significance level `alpha`.
    ///
    /// `TwoSided` returns the upper critical value; the lower one follows by
    /// symmetry. `OneSided` is only defined for an optimal value of zero,
    /// where it is the upper critical value.
    fn critical_value(&self, mode: Option<PValueMode>, alpha: Real) -> Result<Real> {
        ensure!(
            alpha > 0.0 && alpha < 1.0,
            "significance level must lie in (0, 1), got {alpha}"
        );
        let mode = self.resolve_mode(mode)?;
        let distribution = self.distribution()?;
        let optimal = self.optimal_value();
        match mode {
            PValueMode::PositiveSide => distribution.inverse_ccdf(alpha),
            PValueMode::NegativeSide => distribution.inverse_cdf(alpha),
            PValueMode::TwoSided => {
                ensure!(
                    distribution.is_symmetric(optimal),
                    "{mode} critical value needs a distribution symmetric about {optimal}"
                );
                distribution.inverse_ccdf(alpha / 2.0)
            }
            PValueMode::OneSided => {
                ensure!(
                    optimal == 0.0,
                    "{mode} critical value needs an optimal value of zero, got {optimal}"
                );
                distribution.inverse_ccdf(alpha)
            }
        }
    }

    /// The probability of rejecting the null hypothesis when the
    /// noncentrality parameter is `noncentrality`.
    fn power(&self, noncentrality: Real, rejection: Rejection) -> Result<Real> {
        let d = self.noncentral_distribution(noncentrality)?;
        Ok(match rejection {
            Rejection::Above(cv) => d.ccdf(cv),
            Rejection::Below(cv) => d.cdf(cv),
            Rejection::Outside(a, b) if a == b => 1.0,
            Rejection::Outside(a, b) => {
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                d.ccdf(hi) + d.cdf(lo)
            }
        })
    }

    /// The probability of failing to reject the null hypothesis when the
    /// noncentrality parameter is `noncentrality`.
    fn type_ii_error_probability(&self, noncentrality: Real, rejection: Rejection) -> Result<Real> {
        let d = self.noncentral_distribution(noncentrality)?;
        Ok(match rejection {
            Rejection::Above(cv) => d.cdf(cv),
            Rejection::Below(cv) => d.ccdf(cv),
            Rejection::Outside(a, b) if a == b => 0.0,
            Rejection::Outside(a, b) => {
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                d.cdf(hi) - d.cdf(lo)
            }
        })
    }
}

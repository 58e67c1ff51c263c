//! A closed sum type over the supported distribution families.

use hs_core::{errors::Result, Real};

use crate::chi_square::ChiSquareDistribution;
use crate::domain::Domain;
use crate::f::FDistribution;
use crate::gaussian::GaussianDistribution;
use crate::kolmogorov::KolmogorovDistribution;
use crate::student_t::StudentsTDistribution;
use crate::traits::ProbDistribution;

/// Any of the distributions in this crate.
///
/// Statistics return this type so callers can hold the sampling
/// distribution of any test without boxing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Normal distribution.
    Gaussian(GaussianDistribution),
    /// Chi-square distribution.
    ChiSquare(ChiSquareDistribution),
    /// F distribution.
    F(FDistribution),
    /// Student's t distribution.
    StudentsT(StudentsTDistribution),
    /// Kolmogorov's distribution.
    Kolmogorov(KolmogorovDistribution),
}

macro_rules! dispatch {
    ($self:ident, $d:ident => $body:expr) => {
        match $self {
            Distribution::Gaussian($d) => $body,
            Distribution::ChiSquare($d) => $body,
            Distribution::F($d) => $body,
            Distribution::StudentsT($d) => $body,
            Distribution::Kolmogorov($d) => $body,
        }
    };
}

impl ProbDistribution for Distribution {
    fn domain(&self) -> Domain {
        dispatch!(self, d => d.domain())
    }

    fn is_symmetric(&self, x: Real) -> bool {
        dispatch!(self, d => d.is_symmetric(x))
    }

    fn pdf(&self, x: Real) -> Real {
        dispatch!(self, d => d.pdf(x))
    }

    fn cdf(&self, x: Real) -> Real {
        dispatch!(self, d => d.cdf(x))
    }

    fn ccdf(&self, x: Real) -> Real {
        dispatch!(self, d => d.ccdf(x))
    }

    fn interval_probability(&self, x: Real) -> Result<Real> {
        dispatch!(self, d => d.interval_probability(x))
    }

    fn inverse_cdf(&self, p: Real) -> Result<Real> {
        dispatch!(self, d => d.inverse_cdf(p))
    }

    fn inverse_ccdf(&self, p: Real) -> Result<Real> {
        dispatch!(self, d => d.inverse_ccdf(p))
    }

    fn inverse_interval_probability(&self, p: Real) -> Result<Real> {
        dispatch!(self, d => d.inverse_interval_probability(p))
    }
}

impl From<GaussianDistribution> for Distribution {
    fn from(d: GaussianDistribution) -> Self {
        Distribution::Gaussian(d)
    }
}

impl From<ChiSquareDistribution> for Distribution {
    fn from(d: ChiSquareDistribution) -> Self {
        Distribution::ChiSquare(d)
    }
}

impl From<FDistribution> for Distribution {
    fn from(d: FDistribution) -> Self {
        Distribution::F(d)
    }
}

impl From<StudentsTDistribution> for Distribution {
    fn from(d: StudentsTDistribution) -> Self {
        Distribution::StudentsT(d)
    }
}

impl From<KolmogorovDistribution> for Distribution {
    fn from(d: KolmogorovDistribution) -> Self {
        Distribution::Kolmogorov(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_preserves_overrides() {
        let g: Distribution = GaussianDistribution::standard().into();
        assert_eq!(g.cdf(0.0), 0.5);
        assert!(g.is_symmetric(0.0));
        // closed-form inverse, not the generic search
        assert_eq!(g.inverse_cdf(0.0).unwrap(), -Real::MAX);

        let f: Distribution = FDistribution::new(3, 4).unwrap().into();
        assert!(!f.is_symmetric(0.0));
        assert!(f.interval_probability(1.0).unwrap_err().is_unsupported());
        assert_eq!(f.domain(), Domain::NON_NEGATIVE);
    }
}

//! Welch's t statistic for two samples with possibly unequal variances.

use hs_core::{ensure_state, errors::Result, Count, Real};
use hs_distributions::Distribution;
use hs_moments::SampleStats;

use crate::statistic::{DegreesOfFreedom, Statistic};
use crate::t_tests::t_distribution;

/// Difference of two means scaled by `sqrt(s1²/n1 + s2²/n2)`.
///
/// The degrees of freedom follow the Welch-Satterthwaite approximation and
/// are fractional; the sampling distribution uses their floor.
#[derive(Debug, Clone, Default)]
pub struct WelchT {
    first: SampleStats,
    second: SampleStats,
}

impl WelchT {
    /// A statistic with no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the two samples.
    pub fn from_samples(first: &[Real], second: &[Real]) -> Self {
        Self {
            first: SampleStats::from_values(first),
            second: SampleStats::from_values(second),
        }
    }

    /// Build from each sample's mean, sample variance, and size.
    pub fn from_summaries(
        mean1: Real,
        variance1: Real,
        n1: Count,
        mean2: Real,
        variance2: Real,
        n2: Count,
    ) -> Result<Self> {
        Ok(Self {
            first: SampleStats::from_summary(mean1, variance1, n1)?,
            second: SampleStats::from_summary(mean2, variance2, n2)?,
        })
    }

    /// Add a point to the first sample.
    pub fn add_first(&mut self, x: Real) {
        self.first.add(x);
    }

    /// Add a point to the second sample.
    pub fn add_second(&mut self, x: Real) {
        self.second.add(x);
    }

    /// Mean of the first sample.
    pub fn mean1(&self) -> Result<Real> {
        self.first.mean()
    }

    /// Standard deviation of the first sample.
    pub fn standard_deviation1(&self) -> Result<Real> {
        self.first.standard_deviation()
    }

    /// Mean of the second sample.
    pub fn mean2(&self) -> Result<Real> {
        self.second.mean()
    }

    /// Standard deviation of the second sample.
    pub fn standard_deviation2(&self) -> Result<Real> {
        self.second.standard_deviation()
    }

    /// The Welch-Satterthwaite degrees of freedom.
    pub fn fractional_dof(&self) -> Result<Real> {
        let (a, b) = self.squared_errors()?;
        let n1 = self.first.count() as Real;
        let n2 = self.second.count() as Real;
        let s = a + b;
        Ok(s * s / (a * a / (n1 - 1.0) + b * b / (n2 - 1.0)))
    }

    /// `(s1²/n1, s2²/n2)`.
    fn squared_errors(&self) -> Result<(Real, Real)> {
        Ok((
            self.first.variance()? / self.first.count() as Real,
            self.second.variance()? / self.second.count() as Real,
        ))
    }

    fn standard_error(&self) -> Result<Real> {
        let (a, b) = self.squared_errors()?;
        Ok((a + b).sqrt())
    }

    fn integral_dof(&self) -> Result<u64> {
        let dof = self.fractional_dof()?.floor();
        ensure_state!(dof >= 1.0, "Welch degrees of freedom {dof} are below one");
        Ok(dof as u64)
    }
}

impl Statistic for WelchT {
    fn value(&self) -> Result<Real> {
        Ok((self.first.mean()? - self.second.mean()?) / self.standard_error()?)
    }

    fn distribution(&self) -> Result<Distribution> {
        t_distribution(self.integral_dof()?, 0.0)
    }

    fn noncentral_distribution(&self, noncentrality: Real) -> Result<Distribution> {
        t_distribution(self.integral_dof()?, noncentrality)
    }

    fn degrees_of_freedom(&self) -> Result<DegreesOfFreedom> {
        self.fractional_dof().map(DegreesOfFreedom::Fractional)
    }

    fn noncentrality(&self, effect: Real) -> Result<Real> {
        Ok(effect / self.standard_error()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn equal_sizes_and_variances_give_pooled_dof() {
        let t = WelchT::from_summaries(1.0, 4.0, 10, 0.0, 4.0, 10).unwrap();
        assert_abs_diff_eq!(t.fractional_dof().unwrap(), 18.0, epsilon = 1e-12);
    }

    #[test]
    fn needs_two_points_per_sample() {
        let mut t = WelchT::new();
        t.add_first(1.0);
        t.add_first(2.0);
        t.add_second(3.0);
        assert!(t.value().unwrap_err().is_invalid_state());
    }
}

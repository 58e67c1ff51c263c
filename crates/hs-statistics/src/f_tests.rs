//! F statistics: the ratio of two sample variances and Levene's test for
//! equality of variances across groups.

use std::fmt;

use hs_core::{ensure, errors::Result, kahan_sum, Count, Real};
use hs_distributions::{Distribution, FDistribution};
use hs_moments::{mean, median, trimmed_mean, PopulationStats, SampleStats};
use tracing::debug;

use crate::statistic::{DegreesOfFreedom, Statistic};
use crate::t_tests::remaining_dof;

fn f_distribution(nu1: u64, nu2: u64, lambda: Real) -> Result<Distribution> {
    ensure!(
        lambda >= 0.0,
        "noncentrality must be non-negative, got {lambda}"
    );
    if lambda == 0.0 {
        Ok(FDistribution::new(nu1, nu2)?.into())
    } else {
        Ok(FDistribution::noncentral(nu1, nu2, lambda)?.into())
    }
}

// ── Variance ratio ───────────────────────────────────────────────────────────

/// `s1² / s2²` for two independent normal samples.
///
/// The optimal value is 1, so p-values default to the tail on the side of 1
/// where the ratio lies, and critical values need an explicit tail.
#[derive(Debug, Clone, Default)]
pub struct VarianceRatioF {
    first: SampleStats,
    second: SampleStats,
}

impl VarianceRatioF {
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

    /// Build from each sample's variance and size. Means are not needed.
    pub fn from_summaries(variance1: Real, n1: Count, variance2: Real, n2: Count) -> Result<Self> {
        Ok(Self {
            first: SampleStats::from_summary(0.0, variance1, n1)?,
            second: SampleStats::from_summary(0.0, variance2, n2)?,
        })
    }

    /// Add a point to the numerator sample.
    pub fn add_first(&mut self, x: Real) {
        self.first.add(x);
    }

    /// Add a point to the denominator sample.
    pub fn add_second(&mut self, x: Real) {
        self.second.add(x);
    }

    fn dofs(&self) -> Result<(u64, u64)> {
        Ok((
            remaining_dof(self.first.count(), 1)?,
            remaining_dof(self.second.count(), 1)?,
        ))
    }
}

impl Statistic for VarianceRatioF {
    fn value(&self) -> Result<Real> {
        Ok(self.first.variance()? / self.second.variance()?)
    }

    fn optimal_value(&self) -> Real {
        1.0
    }

    fn distribution(&self) -> Result<Distribution> {
        let (nu1, nu2) = self.dofs()?;
        f_distribution(nu1, nu2, 0.0)
    }

    fn degrees_of_freedom(&self) -> Result<DegreesOfFreedom> {
        let (nu1, nu2) = self.dofs()?;
        Ok(DegreesOfFreedom::Pair(nu1, nu2))
    }
}

// ── Levene ───────────────────────────────────────────────────────────────────

/// The location estimate Levene's test measures deviations from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LeveneCenter {
    /// The group mean (Levene's original test).
    #[default]
    Mean,
    /// The group median (Brown-Forsythe).
    Median,
    /// The 10% trimmed group mean.
    TrimmedMean,
}

impl LeveneCenter {
    fn locate(self, group: &[Real]) -> Result<Real> {
        match self {
            LeveneCenter::Mean => mean(group),
            LeveneCenter::Median => median(group),
            LeveneCenter::TrimmedMean => trimmed_mean(group, 10),
        }
    }
}

impl fmt::Display for LeveneCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeveneCenter::Mean => "mean",
            LeveneCenter::Median => "median",
            LeveneCenter::TrimmedMean => "trimmed mean",
        };
        f.write_str(name)
    }
}

/// Levene's W statistic for equality of variances across `k` groups.
///
/// Each observation is replaced by its absolute deviation from its group's
/// center, and W is the one-way analysis-of-variance F ratio of those
/// deviations, on `(k - 1, N - k)` degrees of freedom.
#[derive(Debug, Clone)]
pub struct Levene {
    center: LeveneCenter,
    value: Real,
    groups: u64,
    total: u64,
}

impl Levene {
    /// Levene's test using group means.
    pub fn new<G: AsRef<[Real]>>(groups: &[G]) -> Result<Self> {
        Self::with_center(LeveneCenter::default(), groups)
    }

    /// Levene's test using the given center estimator.
    pub fn with_center<G: AsRef<[Real]>>(center: LeveneCenter, groups: &[G]) -> Result<Self> {
        ensure!(
            groups.len() >= 2,
            "Levene's test needs at least 2 groups, got {}",
            groups.len()
        );
        let mut deviations = Vec::with_capacity(groups.len());
        for group in groups {
            let group = group.as_ref();
            let c = center.locate(group)?;
            deviations.push(
                group
                    .iter()
                    .map(|x| (x - c).abs())
                    .collect::<PopulationStats>(),
            );
        }

        let k = groups.len() as u64;
        let n: u64 = deviations.iter().map(PopulationStats::count).sum();
        ensure!(n > k, "Levene's test needs more points ({n}) than groups ({k})");

        let means = deviations
            .iter()
            .map(|d| d.mean())
            .collect::<Result<Vec<_>>>()?;
        let grand = kahan_sum(
            &deviations
                .iter()
                .zip(&means)
                .map(|(d, m)| d.count() as Real * m)
                .collect::<Vec<_>>(),
        ) / n as Real;
        let between = kahan_sum(
            &deviations
                .iter()
                .zip(&means)
                .map(|(d, m)| d.count() as Real * (m - grand) * (m - grand))
                .collect::<Vec<_>>(),
        );
        let within = kahan_sum(
            &deviations
                .iter()
                .map(PopulationStats::sum_of_squares)
                .collect::<Vec<_>>(),
        );

        let value = if between == 0.0 {
            0.0
        } else if within == 0.0 {
            Real::INFINITY
        } else {
            (n - k) as Real / (k - 1) as Real * between / within
        };
        debug!(%center, groups = k, points = n, value, "computed Levene statistic");

        Ok(Self {
            center,
            value,
            groups: k,
            total: n,
        })
    }

    /// The center estimator in use.
    pub fn center(&self) -> LeveneCenter {
        self.center
    }

    /// Number of groups.
    pub fn group_count(&self) -> u64 {
        self.groups
    }

    /// Total number of observations.
    pub fn size(&self) -> u64 {
        self.total
    }

    fn dofs(&self) -> (u64, u64) {
        (self.groups - 1, self.total - self.groups)
    }
}

impl Statistic for Levene {
    fn value(&self) -> Result<Real> {
        Ok(self.value)
    }

    fn distribution(&self) -> Result<Distribution> {
        let (nu1, nu2) = self.dofs();
        f_distribution(nu1, nu2, 0.0)
    }

    fn noncentral_distribution(&self, noncentrality: Real) -> Result<Distribution> {
        let (nu1, nu2) = self.dofs();
        f_distribution(nu1, nu2, noncentrality)
    }

    fn degrees_of_freedom(&self) -> Result<DegreesOfFreedom> {
        let (nu1, nu2) = self.dofs();
        Ok(DegreesOfFreedom::Pair(nu1, nu2))
    }

    /// `k · effect²`: the same standardized effect in every group.
    fn noncentrality(&self, effect: Real) -> Result<Real> {
        Ok(self.groups as Real * effect * effect)
    }

    /// `Σ effect_i²` over one standardized effect per group.
    fn noncentrality_for(&self, effects: &[Real]) -> Result<Real> {
        match effects {
            [effect] => self.noncentrality(*effect),
            _ => {
                ensure!(
                    effects.len() as u64 == self.groups,
                    "expected {} effects, one per group, got {}",
                    self.groups,
                    effects.len()
                );
                Ok(kahan_sum(&effects.iter().map(|e| e * e).collect::<Vec<_>>()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identical_spreads_give_zero() {
        let w = Levene::new(&[[1.0, 3.0], [5.0, 7.0], [0.0, 2.0]]).unwrap();
        assert_eq!(w.value().unwrap(), 0.0);
        assert_eq!(w.degrees_of_freedom().unwrap(), DegreesOfFreedom::Pair(2, 3));
        assert_eq!(w.p_value(None).unwrap(), 1.0);
    }

    #[test]
    fn rejects_too_few_groups_or_points() {
        assert!(Levene::new(&[[1.0, 2.0]]).unwrap_err().is_invalid_argument());
        assert!(Levene::new(&[[1.0], [2.0]]).unwrap_err().is_invalid_argument());
        let empty: [&[Real]; 2] = [&[], &[1.0, 2.0]];
        assert!(Levene::new(&empty).is_err());
    }

    #[test]
    fn per_group_effects() {
        let w = Levene::new(&[[1.0, 2.0, 4.0], [2.0, 3.0, 9.0]]).unwrap();
        assert_abs_diff_eq!(w.noncentrality(0.5).unwrap(), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(w.noncentrality_for(&[1.0, 2.0]).unwrap(), 5.0, epsilon = 1e-15);
        assert!(w.noncentrality_for(&[1.0, 2.0, 3.0]).unwrap_err().is_invalid_argument());
        assert!(w.noncentrality_for(&[]).unwrap_err().is_invalid_argument());
        assert!(w.noncentral_distribution(-1.0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn variance_ratio_needs_explicit_tail_for_critical_values() {
        let f = VarianceRatioF::from_summaries(2.0, 5, 1.0, 7).unwrap();
        assert_abs_diff_eq!(f.value().unwrap(), 2.0, epsilon = 1e-14);
        assert_eq!(f.optimal_value(), 1.0);
        assert!(f.critical_value(None, 0.05).unwrap_err().is_invalid_argument());
        assert!(f.critical_value(Some(crate::PValueMode::PositiveSide), 0.05).is_ok());
        assert!(f.noncentral_distribution(1.0).unwrap_err().is_unsupported());
    }
}

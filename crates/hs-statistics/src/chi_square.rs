//! Pearson's chi-square statistic for goodness of fit and contingency tables.

use hs_core::{
    ensure, ensure_state,
    errors::{Error, Result},
    Count, KahanSum, Real,
};
use hs_distributions::{ChiSquareDistribution, Distribution};
use tracing::debug;

use crate::statistic::{DegreesOfFreedom, Statistic};

/// `Σ (d_i - e_i)² / σ_i²` over observed values `d_i` with expected values
/// `e_i`.
///
/// When no standard error is given, `σ_i² = |e_i|`, the Poisson variance of
/// a count. The degrees of freedom are the number of terms minus the number
/// of constraints.
///
/// Constructors that take whole arrays retain the per-term standard errors,
/// which [`noncentrality`](Statistic::noncentrality) needs. Adding terms one
/// at a time discards them.
#[derive(Debug, Clone, Default)]
pub struct ChiSquareStat {
    total: KahanSum,
    n: Count,
    constraints: Count,
    sigmas: Option<Vec<Real>>,
    frozen: bool,
}

fn check_lengths(data: &[Real], other: &[Real], what: &str) -> Result<()> {
    ensure!(
        data.len() == other.len(),
        "{} data values but {} {what}",
        data.len(),
        other.len()
    );
    Ok(())
}

impl ChiSquareStat {
    /// An empty statistic; terms are added with [`add`](Self::add).
    pub fn new() -> Self {
        Self::default()
    }

    /// A statistic with a precomputed value over `n` terms.
    pub fn from_value(chi_square: Real, n: Count, constraints: Count) -> Self {
        Self {
            total: KahanSum::with_total(chi_square),
            n,
            constraints,
            ..Self::default()
        }
    }

    fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (Real, Real, Real)>,
    {
        let mut stat = Self::default();
        let mut sigmas = Vec::new();
        for (d, e, sigma) in terms {
            stat.push(d, e, sigma * sigma);
            sigmas.push(sigma);
        }
        stat.sigmas = Some(sigmas);
        stat
    }

    /// Counts against per-term expected values.
    pub fn with_expected(data: &[Real], expected: &[Real]) -> Result<Self> {
        check_lengths(data, expected, "expected values")?;
        Ok(Self::from_terms(
            data.iter()
                .zip(expected)
                .map(|(&d, &e)| (d, e, e.abs().sqrt())),
        ))
    }

    /// Counts against a single expected value.
    pub fn with_expected_value(data: &[Real], expected: Real) -> Self {
        let sigma = expected.abs().sqrt();
        Self::from_terms(data.iter().map(|&d| (d, expected, sigma)))
    }

    /// Measurements against per-term expected values and standard errors.
    pub fn with_sigmas(data: &[Real], expected: &[Real], sigmas: &[Real]) -> Result<Self> {
        check_lengths(data, expected, "expected values")?;
        check_lengths(data, sigmas, "standard errors")?;
        Ok(Self::from_terms(
            data.iter()
                .zip(expected)
                .zip(sigmas)
                .map(|((&d, &e), &s)| (d, e, s)),
        ))
    }

    /// Measurements against per-term expected values with a shared standard
    /// error.
    pub fn with_sigma(data: &[Real], expected: &[Real], sigma: Real) -> Result<Self> {
        check_lengths(data, expected, "expected values")?;
        Ok(Self::from_terms(
            data.iter().zip(expected).map(|(&d, &e)| (d, e, sigma)),
        ))
    }

    /// Measurements against a single expected value and standard error.
    pub fn with_expected_value_and_sigma(data: &[Real], expected: Real, sigma: Real) -> Self {
        Self::from_terms(data.iter().map(|&d| (d, expected, sigma)))
    }

    /// Pearson's test of independence for an `r × c` table of counts.
    ///
    /// Expected counts come from the row and column totals. The result has
    /// `(r - 1)(c - 1)` degrees of freedom and is frozen.
    pub fn contingency<R: AsRef<[u64]>>(table: &[R]) -> Result<Self> {
        let rows = table.len();
        ensure!(rows >= 2, "a contingency table needs at least 2 rows, got {rows}");
        let columns = table[0].as_ref().len();
        ensure!(
            columns >= 2,
            "a contingency table needs at least 2 columns, got {columns}"
        );
        ensure!(
            table.iter().all(|row| row.as_ref().len() == columns),
            "contingency table rows differ in length"
        );

        let row_totals: Vec<u64> = table.iter().map(|row| row.as_ref().iter().sum()).collect();
        let column_totals: Vec<u64> = (0..columns)
            .map(|j| table.iter().map(|row| row.as_ref()[j]).sum())
            .collect();
        ensure!(
            row_totals.iter().all(|&t| t > 0) && column_totals.iter().all(|&t| t > 0),
            "contingency table has an empty row or column"
        );
        let grand = row_totals.iter().sum::<u64>() as Real;

        let mut stat = Self::default();
        for (row, &row_total) in table.iter().zip(&row_totals) {
            for (&count, &column_total) in row.as_ref().iter().zip(&column_totals) {
                let expected = row_total as Real * column_total as Real / grand;
                stat.push(count as Real, expected, expected);
            }
        }
        stat.set_degrees_of_freedom((rows as Count - 1) * (columns as Count - 1))?;
        stat.freeze();
        debug!(
            rows,
            columns,
            value = stat.total.total(),
            "built contingency-table chi-square"
        );
        Ok(stat)
    }

    fn push(&mut self, d: Real, e: Real, variance: Real) {
        let v = d - e;
        self.total.add(v * v / variance);
        self.n += 1;
    }

    /// Add a count `d` with expected value `e`.
    pub fn add(&mut self, d: Real, e: Real) -> Result<()> {
        ensure_state!(!self.frozen, "cannot add to a frozen chi-square statistic");
        self.push(d, e, e.abs());
        self.sigmas = None;
        Ok(())
    }

    /// Add a measurement `d` with expected value `e` and standard error
    /// `sigma`.
    pub fn add_with_sigma(&mut self, d: Real, e: Real, sigma: Real) -> Result<()> {
        ensure_state!(!self.frozen, "cannot add to a frozen chi-square statistic");
        self.push(d, e, sigma * sigma);
        self.sigmas = None;
        Ok(())
    }

    /// Prevent further changes.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Return `true` once [`freeze`](Self::freeze) has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of terms.
    pub fn size(&self) -> Count {
        self.n
    }

    /// Number of constraints subtracted from the number of terms.
    pub fn constraints(&self) -> Count {
        self.constraints
    }

    /// Set the number of constraints.
    pub fn set_constraints(&mut self, constraints: Count) -> Result<()> {
        ensure_state!(
            !self.frozen,
            "cannot change the constraints of a frozen chi-square statistic"
        );
        self.constraints = constraints;
        Ok(())
    }

    /// Set the constraints so that the degrees of freedom equal `dof`.
    pub fn set_degrees_of_freedom(&mut self, dof: Count) -> Result<()> {
        ensure!(dof >= 1, "degrees of freedom must be positive, got {dof}");
        ensure!(
            dof <= self.n,
            "degrees of freedom {dof} exceed the number of terms {}",
            self.n
        );
        ensure_state!(
            !self.frozen,
            "cannot change the degrees of freedom of a frozen chi-square statistic"
        );
        self.constraints = self.n - dof;
        Ok(())
    }

    fn dof(&self) -> Result<u64> {
        ensure_state!(
            self.n > self.constraints,
            "{} terms leave no degrees of freedom after {} constraints",
            self.n,
            self.constraints
        );
        Ok(self.n - self.constraints)
    }

    fn sigmas(&self) -> Result<&[Real]> {
        self.sigmas
            .as_deref()
            .ok_or_else(|| Error::InvalidState("per-term standard errors were not retained".into()))
    }
}

impl Statistic for ChiSquareStat {
    fn value(&self) -> Result<Real> {
        ensure_state!(self.n > 0, "chi-square statistic has no terms");
        Ok(self.total.total())
    }

    fn distribution(&self) -> Result<Distribution> {
        Ok(ChiSquareDistribution::new(self.dof()?)?.into())
    }

    fn noncentral_distribution(&self, noncentrality: Real) -> Result<Distribution> {
        ensure!(
            noncentrality >= 0.0,
            "noncentrality must be non-negative, got {noncentrality}"
        );
        if noncentrality == 0.0 {
            return self.distribution();
        }
        Ok(ChiSquareDistribution::noncentral(self.dof()?, noncentrality)?.into())
    }

    fn degrees_of_freedom(&self) -> Result<DegreesOfFreedom> {
        self.dof().map(DegreesOfFreedom::Integer)
    }

    /// `Σ (effect / σ_i)²`: the same shift in every term.
    fn noncentrality(&self, effect: Real) -> Result<Real> {
        let mut sum = KahanSum::new();
        for sigma in self.sigmas()? {
            let r = effect / sigma;
            sum.add(r * r);
        }
        Ok(sum.total())
    }

    /// `Σ (effect_i / σ_i)²` over one shift per term.
    fn noncentrality_for(&self, effects: &[Real]) -> Result<Real> {
        if let [effect] = effects {
            return self.noncentrality(*effect);
        }
        let sigmas = self.sigmas()?;
        ensure!(
            effects.len() == sigmas.len(),
            "expected {} effects, one per term, got {}",
            sigmas.len(),
            effects.len()
        );
        let mut sum = KahanSum::new();
        for (effect, sigma) in effects.iter().zip(sigmas) {
            let r = effect / sigma;
            sum.add(r * r);
        }
        Ok(sum.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn expected_only_terms_use_poisson_variance() {
        let stat = ChiSquareStat::with_expected(&[12.0, 8.0], &[10.0, 10.0]).unwrap();
        assert_abs_diff_eq!(stat.value().unwrap(), 0.8, epsilon = 1e-14);
        assert_eq!(stat.degrees_of_freedom().unwrap(), DegreesOfFreedom::Integer(2));
        // σ_i = sqrt(10)
        assert_abs_diff_eq!(stat.noncentrality(1.0).unwrap(), 0.2, epsilon = 1e-14);
    }

    #[test]
    fn incremental_terms_drop_sigmas() {
        let mut stat = ChiSquareStat::with_sigma(&[1.0, 2.0], &[0.0, 0.0], 2.0).unwrap();
        assert_abs_diff_eq!(stat.noncentrality_for(&[2.0, 4.0]).unwrap(), 5.0, epsilon = 1e-14);
        stat.add_with_sigma(3.0, 1.0, 1.0).unwrap();
        assert_abs_diff_eq!(stat.value().unwrap(), 0.25 + 1.0 + 4.0, epsilon = 1e-14);
        assert!(stat.noncentrality(1.0).unwrap_err().is_invalid_state());
    }

    #[test]
    fn constraints_reduce_degrees_of_freedom() {
        let mut stat = ChiSquareStat::with_expected_value(&[3.0, 5.0, 4.0], 4.0);
        stat.set_constraints(1).unwrap();
        assert_eq!(stat.degrees_of_freedom().unwrap(), DegreesOfFreedom::Integer(2));
        stat.set_constraints(3).unwrap();
        assert!(stat.distribution().unwrap_err().is_invalid_state());
        assert!(stat.set_degrees_of_freedom(4).unwrap_err().is_invalid_argument());
        stat.set_degrees_of_freedom(3).unwrap();
        assert_eq!(stat.constraints(), 0);
    }

    #[test]
    fn empty_statistic_has_no_value() {
        assert!(ChiSquareStat::new().value().unwrap_err().is_invalid_state());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(ChiSquareStat::with_expected(&[1.0], &[1.0, 2.0]).is_err());
        assert!(ChiSquareStat::with_sigmas(&[1.0, 2.0], &[1.0, 2.0], &[1.0]).is_err());
        assert!(ChiSquareStat::contingency(&[vec![1, 2], vec![3]]).is_err());
    }
}

//! Coordinate-wise mean and variance of vector-valued data.

use std::fmt;
use std::marker::PhantomData;

use hs_core::{ensure, ensure_state, errors::Result, Count, KahanSum, Real, Size};

use crate::basic::{Estimator, Sample};
use crate::reduction::Merge;

/// Streaming accumulator for vectors of a fixed dimension.
///
/// Each coordinate carries its own mean, sum of squared deviations, and
/// Kahan compensation terms; coordinates never interact.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiStats<E: Estimator = Sample> {
    count: Count,
    means: Vec<KahanSum>,
    sums_of_squares: Vec<KahanSum>,
    #[cfg_attr(feature = "serde", serde(skip))]
    estimator: PhantomData<E>,
}

impl<E: Estimator> fmt::Debug for MultiStats<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let means: Vec<Real> = self.means.iter().map(KahanSum::total).collect();
        f.debug_struct("MultiStats")
            .field("estimator", &E::NAME)
            .field("count", &self.count)
            .field("means", &means)
            .finish()
    }
}

impl<E: Estimator> MultiStats<E> {
    /// An empty accumulator for vectors with `dimension` coordinates.
    pub fn new(dimension: Size) -> Self {
        Self {
            count: 0,
            means: vec![KahanSum::new(); dimension],
            sums_of_squares: vec![KahanSum::new(); dimension],
            estimator: PhantomData,
        }
    }

    /// Accumulate a batch of rows. Every row must have `dimension` entries.
    pub fn from_rows<R: AsRef<[Real]>>(dimension: Size, rows: &[R]) -> Result<Self> {
        let mut stats = Self::new(dimension);
        for row in rows {
            stats.add(row.as_ref())?;
        }
        Ok(stats)
    }

    /// Restore an accumulator from per-coordinate means and variances.
    pub fn from_summary(means: &[Real], variances: &[Real], count: Count) -> Result<Self> {
        ensure!(
            means.len() == variances.len(),
            "means and variances differ in length: {} vs {}",
            means.len(),
            variances.len()
        );
        ensure!(
            count >= E::MIN_COUNT,
            "{} summary needs at least {} points, got {count}",
            E::NAME,
            E::MIN_COUNT
        );
        ensure!(
            variances.iter().all(|&v| v >= 0.0),
            "variances must be non-negative"
        );
        Ok(Self {
            count,
            means: means.iter().map(|&m| KahanSum::with_total(m)).collect(),
            sums_of_squares: variances
                .iter()
                .map(|&v| KahanSum::with_total(E::sum_of_squares(v, count)))
                .collect(),
            estimator: PhantomData,
        })
    }

    /// Number of coordinates.
    #[inline]
    pub fn dimension(&self) -> Size {
        self.means.len()
    }

    /// Number of vectors absorbed so far.
    #[inline]
    pub fn count(&self) -> Count {
        self.count
    }

    /// Add one vector.
    pub fn add(&mut self, x: &[Real]) -> Result<()> {
        ensure!(
            x.len() == self.dimension(),
            "expected a vector of length {}, got {}",
            self.dimension(),
            x.len()
        );
        let previous = self.count as Real;
        self.count += 1;
        let n = self.count as Real;
        for ((mean, ss), &xi) in self.means.iter_mut().zip(&mut self.sums_of_squares).zip(x) {
            let q = xi - mean.total();
            let r = q / n;
            mean.add(r);
            ss.add(previous * q * r);
        }
        Ok(())
    }

    /// Absorb another accumulator.
    ///
    /// `other` must have at least as many coordinates as `self`; extra
    /// coordinates of `other` are ignored.
    pub fn add_all(&mut self, other: &Self) -> Result<()> {
        ensure!(
            other.dimension() >= self.dimension(),
            "cannot merge a {}-dimensional accumulator into a {}-dimensional one",
            other.dimension(),
            self.dimension()
        );
        if other.count == 0 {
            return Ok(());
        }
        let n1 = self.count as Real;
        let n2 = other.count as Real;
        let n = n1 + n2;
        for i in 0..self.dimension() {
            let mean1 = self.means[i].total();
            let mean2 = other.means[i].total();
            let delta = mean2 - mean1;
            let mean = (mean1 * n1 + mean2 * n2) / n;
            let ss = self.sums_of_squares[i].total()
                + other.sums_of_squares[i].total()
                + delta * delta * n1 * n2 / n;
            self.means[i].reset_to(mean);
            self.sums_of_squares[i].reset_to(ss);
        }
        self.count += other.count;
        Ok(())
    }

    /// Per-coordinate means.
    pub fn means(&self) -> Result<Vec<Real>> {
        ensure_state!(self.count > 0, "mean of an empty data set");
        Ok(self.means.iter().map(KahanSum::total).collect())
    }

    /// Per-coordinate variances, using this accumulator's correction.
    pub fn variances(&self) -> Result<Vec<Real>> {
        ensure_state!(
            self.count >= E::MIN_COUNT,
            "{} variance needs at least {} points, got {}",
            E::NAME,
            E::MIN_COUNT,
            self.count
        );
        let scale = E::correction(self.count) / self.count as Real;
        Ok(self
            .sums_of_squares
            .iter()
            .map(|ss| ss.total() * scale)
            .collect())
    }

    /// Per-coordinate standard deviations.
    pub fn standard_deviations(&self) -> Result<Vec<Real>> {
        Ok(self.variances()?.into_iter().map(Real::sqrt).collect())
    }
}

impl<E: Estimator> Merge for MultiStats<E> {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.add_all(other)
    }
}

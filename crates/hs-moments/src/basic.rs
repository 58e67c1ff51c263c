//! Scalar mean and variance accumulators.
//!
//! [`BasicStats`] runs West's single-pass recurrence
//!
//! ```text
//! Q = x - mean;  R = Q / count;  mean += R;  T += (count - 1) * Q * R
//! ```
//!
//! with both `+=` steps carried out through a [`KahanSum`]. `T` is the sum of
//! squared deviations from the running mean. The estimator parameter picks
//! the variance correction: [`Sample`] divides `T` by `count - 1`,
//! [`Population`] by `count`.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use hs_core::{ensure, ensure_state, errors::Result, Count, KahanSum, Real};

use crate::reduction::Merge;

// ── Estimators ───────────────────────────────────────────────────────────────

/// Variance correction applied by an accumulator.
pub trait Estimator: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Human-readable name used in error messages.
    const NAME: &'static str;

    /// Smallest point count for which a variance is defined.
    const MIN_COUNT: Count;

    /// Factor turning the population variance `T / n` into this estimator.
    fn correction(count: Count) -> Real;

    /// The sum of squared deviations `T` that yields `variance` over `count`
    /// points.
    fn sum_of_squares(variance: Real, count: Count) -> Real {
        variance * count as Real / Self::correction(count)
    }
}

/// Unbiased sample estimator: correction `n / (n - 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample;

/// Population estimator: correction 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population;

impl Estimator for Sample {
    const NAME: &'static str = "sample";
    const MIN_COUNT: Count = 2;

    #[inline]
    fn correction(count: Count) -> Real {
        let n = count as Real;
        n / (n - 1.0)
    }
}

impl Estimator for Population {
    const NAME: &'static str = "population";
    const MIN_COUNT: Count = 1;

    #[inline]
    fn correction(_count: Count) -> Real {
        1.0
    }
}

// ── BasicStats ───────────────────────────────────────────────────────────────

/// Streaming mean/variance accumulator.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicStats<E: Estimator = Sample> {
    count: Count,
    mean: KahanSum,
    sum_of_squares: KahanSum,
    #[cfg_attr(feature = "serde", serde(skip))]
    cached_variance: Cell<Option<(Count, Real)>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    estimator: PhantomData<E>,
}

/// Accumulator using the sample (`n - 1`) variance.
pub type SampleStats = BasicStats<Sample>;

/// Accumulator using the population (`n`) variance.
pub type PopulationStats = BasicStats<Population>;

impl<E: Estimator> fmt::Debug for BasicStats<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicStats")
            .field("estimator", &E::NAME)
            .field("count", &self.count)
            .field("mean", &self.mean.total())
            .field("sum_of_squares", &self.sum_of_squares.total())
            .finish()
    }
}

impl<E: Estimator> BasicStats<E> {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: KahanSum::new(),
            sum_of_squares: KahanSum::new(),
            cached_variance: Cell::new(None),
            estimator: PhantomData,
        }
    }

    /// Accumulate every value of `values`.
    pub fn from_values(values: &[Real]) -> Self {
        let mut stats = Self::new();
        stats.add_slice(values);
        stats
    }

    /// Restore an accumulator from a previously computed summary.
    ///
    /// `variance` is interpreted with this accumulator's correction, so a
    /// sample accumulator stores `T = variance * (n - 1)` and a population
    /// accumulator `T = variance * n`.
    pub fn from_summary(mean: Real, variance: Real, count: Count) -> Result<Self> {
        ensure!(
            count >= E::MIN_COUNT,
            "{} summary needs at least {} points, got {count}",
            E::NAME,
            E::MIN_COUNT
        );
        ensure!(variance >= 0.0, "variance must be non-negative, got {variance}");
        ensure!(mean.is_finite(), "mean must be finite, got {mean}");
        Ok(Self {
            count,
            mean: KahanSum::with_total(mean),
            sum_of_squares: KahanSum::with_total(E::sum_of_squares(variance, count)),
            cached_variance: Cell::new(None),
            estimator: PhantomData,
        })
    }

    /// Add one value.
    pub fn add(&mut self, x: Real) {
        let previous = self.count as Real;
        self.count += 1;
        let q = x - self.mean.total();
        let r = q / self.count as Real;
        self.mean.add(r);
        self.sum_of_squares.add(previous * q * r);
    }

    /// Add every value of `values`.
    pub fn add_slice(&mut self, values: &[Real]) {
        for &x in values {
            self.add(x);
        }
    }

    /// Absorb another accumulator as if its points had been added here.
    ///
    /// The combination is algebraic; both Kahan compensation terms restart
    /// from zero afterwards.
    pub fn add_all(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            self.count = other.count;
            self.mean.reset_to(other.mean.total());
            self.sum_of_squares.reset_to(other.sum_of_squares.total());
            return;
        }
        let n1 = self.count as Real;
        let n2 = other.count as Real;
        let n = n1 + n2;
        let mean1 = self.mean.total();
        let mean2 = other.mean.total();
        let delta = mean2 - mean1;
        let mean = (mean1 * n1 + mean2 * n2) / n;
        let sum_of_squares =
            self.sum_of_squares.total() + other.sum_of_squares.total() + delta * delta * n1 * n2 / n;

        self.count += other.count;
        self.mean.reset_to(mean);
        self.sum_of_squares.reset_to(sum_of_squares);
    }

    /// Number of points absorbed so far.
    #[inline]
    pub fn count(&self) -> Count {
        self.count
    }

    /// Return `true` if no point has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The sum of squared deviations from the mean.
    #[inline]
    pub fn sum_of_squares(&self) -> Real {
        self.sum_of_squares.total()
    }

    /// The mean of the points added so far.
    pub fn mean(&self) -> Result<Real> {
        ensure_state!(self.count > 0, "mean of an empty data set");
        Ok(self.mean.total())
    }

    /// The variance, using this accumulator's correction.
    pub fn variance(&self) -> Result<Real> {
        ensure_state!(
            self.count >= E::MIN_COUNT,
            "{} variance needs at least {} points, got {}",
            E::NAME,
            E::MIN_COUNT,
            self.count
        );
        if let Some((count, variance)) = self.cached_variance.get() {
            if count == self.count {
                return Ok(variance);
            }
        }
        let variance =
            E::correction(self.count) * self.sum_of_squares.total() / self.count as Real;
        self.cached_variance.set(Some((self.count, variance)));
        Ok(variance)
    }

    /// The square root of [`variance`](Self::variance).
    pub fn standard_deviation(&self) -> Result<Real> {
        self.variance().map(Real::sqrt)
    }

    /// Discard every point.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<E: Estimator> Merge for BasicStats<E> {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.add_all(other);
        Ok(())
    }
}

impl<E: Estimator> Extend<Real> for BasicStats<E> {
    fn extend<I: IntoIterator<Item = Real>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl<E: Estimator> FromIterator<Real> for BasicStats<E> {
    fn from_iter<I: IntoIterator<Item = Real>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

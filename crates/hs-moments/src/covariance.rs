//! Streaming covariance matrices.
//!
//! [`CovarianceMatrix`] keeps the running means of `n` variables and the
//! lower triangle of their population covariance. Each new vector updates
//!
//! ```text
//! M[i][j] += (count - 1) * d_i * d_j / count² - M[i][j] / count
//! ```
//!
//! where `d` is the deviation from the previous means. The upper triangle is
//! filled in only when the matrix is read. Once no further data will arrive,
//! [`CovarianceMatrix::complete`] seals the accumulator into a
//! [`CovarianceSummary`] whose matrix is handed out by reference.

use std::marker::PhantomData;

use hs_core::{ensure, ensure_state, errors::Result, kahan_sum, Count, KahanSum, Real, Size};
use nalgebra::DMatrix;

use crate::basic::{Estimator, Sample};
use crate::reduction::Merge;

/// Streaming covariance accumulator.
#[derive(Debug, Clone)]
pub struct CovarianceMatrix<E: Estimator = Sample> {
    count: Count,
    means: Vec<KahanSum>,
    // population covariance, lower triangle only
    lower: DMatrix<Real>,
    estimator: PhantomData<E>,
}

impl<E: Estimator> CovarianceMatrix<E> {
    /// An empty accumulator for `dimension` variables.
    pub fn new(dimension: Size) -> Self {
        Self {
            count: 0,
            means: vec![KahanSum::new(); dimension],
            lower: DMatrix::zeros(dimension, dimension),
            estimator: PhantomData,
        }
    }

    /// Build an accumulator from a complete batch of rows.
    ///
    /// Uses two passes: the means first, then deviations from those means
    /// with the usual shifted-sum correction for the residual rounding in
    /// the means.
    pub fn from_rows<R: AsRef<[Real]>>(dimension: Size, rows: &[R]) -> Result<Self> {
        let mut acc = Self::new(dimension);
        if rows.is_empty() {
            return Ok(acc);
        }
        for row in rows {
            let row = row.as_ref();
            ensure!(
                row.len() == dimension,
                "expected rows of length {dimension}, got {}",
                row.len()
            );
        }

        let n = rows.len() as Real;
        let means: Vec<Real> = (0..dimension)
            .map(|i| {
                let column: Vec<Real> = rows.iter().map(|r| r.as_ref()[i]).collect();
                kahan_sum(&column) / n
            })
            .collect();

        let mut shift = vec![0.0; dimension];
        for row in rows {
            for (s, (&x, &m)) in shift.iter_mut().zip(row.as_ref().iter().zip(&means)) {
                *s += x - m;
            }
        }
        for i in 0..dimension {
            for j in 0..=i {
                let cross: Real = rows
                    .iter()
                    .map(|r| {
                        let r = r.as_ref();
                        (r[i] - means[i]) * (r[j] - means[j])
                    })
                    .sum();
                acc.lower[(i, j)] = (cross - shift[i] * shift[j] / n) / n;
            }
        }

        acc.count = rows.len() as Count;
        acc.means = means.into_iter().map(KahanSum::with_total).collect();
        Ok(acc)
    }

    /// Number of variables.
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
        let dim = self.dimension();
        ensure!(
            x.len() == dim,
            "expected a vector of length {dim}, got {}",
            x.len()
        );
        let previous = self.count as Real;
        self.count += 1;
        let n = self.count as Real;

        let deltas: Vec<Real> = x
            .iter()
            .zip(&self.means)
            .map(|(&xi, mean)| xi - mean.total())
            .collect();
        for (mean, &d) in self.means.iter_mut().zip(&deltas) {
            mean.add(d / n);
        }
        let weight = previous / (n * n);
        for i in 0..dim {
            for j in 0..=i {
                let m = self.lower[(i, j)];
                self.lower[(i, j)] = m + weight * deltas[i] * deltas[j] - m / n;
            }
        }
        Ok(())
    }

    /// Absorb another covariance accumulator over the same variables.
    pub fn add_all(&mut self, other: &Self) -> Result<()> {
        ensure!(
            other.dimension() == self.dimension(),
            "cannot merge covariance accumulators of dimension {} and {}",
            other.dimension(),
            self.dimension()
        );
        if other.count == 0 {
            return Ok(());
        }
        if self.count == 0 {
            *self = other.clone();
            for mean in &mut self.means {
                mean.reset_to(mean.total());
            }
            return Ok(());
        }

        let n1 = self.count as Real;
        let n2 = other.count as Real;
        let n = n1 + n2;
        let deltas: Vec<Real> = self
            .means
            .iter()
            .zip(&other.means)
            .map(|(a, b)| b.total() - a.total())
            .collect();
        let cross = n1 * n2 / n;
        for i in 0..self.dimension() {
            for j in 0..=i {
                let t = self.lower[(i, j)] * n1
                    + other.lower[(i, j)] * n2
                    + cross * deltas[i] * deltas[j];
                self.lower[(i, j)] = t / n;
            }
        }
        for (mean, other_mean) in self.means.iter_mut().zip(&other.means) {
            let combined = (mean.total() * n1 + other_mean.total() * n2) / n;
            mean.reset_to(combined);
        }
        self.count += other.count;
        Ok(())
    }

    /// Per-variable means.
    pub fn means(&self) -> Result<Vec<Real>> {
        ensure_state!(self.count > 0, "mean of an empty data set");
        Ok(self.means.iter().map(KahanSum::total).collect())
    }

    /// The full symmetric covariance matrix, using this accumulator's
    /// correction.
    pub fn matrix(&self) -> Result<DMatrix<Real>> {
        ensure_state!(
            self.count >= E::MIN_COUNT,
            "{} covariance needs at least {} points, got {}",
            E::NAME,
            E::MIN_COUNT,
            self.count
        );
        let correction = E::correction(self.count);
        let dim = self.dimension();
        Ok(DMatrix::from_fn(dim, dim, |i, j| {
            let (r, c) = if j <= i { (i, j) } else { (j, i) };
            self.lower[(r, c)] * correction
        }))
    }

    /// The correlation matrix.
    ///
    /// The diagonal is always 1. Off-diagonal entries involving a variable
    /// with zero variance are `NaN`.
    pub fn correlation_matrix(&self) -> Result<DMatrix<Real>> {
        Ok(correlation_from(&self.matrix()?))
    }

    /// Seal the accumulator.
    ///
    /// The compensation state and lower-triangle storage are dropped; the
    /// returned summary exposes the finished matrix by reference.
    pub fn complete(self) -> Result<CovarianceSummary> {
        let matrix = self.matrix()?;
        Ok(CovarianceSummary {
            count: self.count,
            means: self.means.iter().map(KahanSum::total).collect(),
            matrix,
        })
    }
}

impl<E: Estimator> Merge for CovarianceMatrix<E> {
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.add_all(other)
    }
}

fn correlation_from(cov: &DMatrix<Real>) -> DMatrix<Real> {
    let sd: Vec<Real> = cov.diagonal().iter().map(|v| v.sqrt()).collect();
    DMatrix::from_fn(cov.nrows(), cov.ncols(), |i, j| {
        if i == j {
            1.0
        } else if sd[i] == 0.0 || sd[j] == 0.0 {
            Real::NAN
        } else {
            cov[(i, j)] / (sd[i] * sd[j])
        }
    })
}

/// A sealed covariance computation.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceSummary {
    count: Count,
    means: Vec<Real>,
    matrix: DMatrix<Real>,
}

impl CovarianceSummary {
    /// Number of vectors that went into the summary.
    pub fn count(&self) -> Count {
        self.count
    }

    /// Per-variable means.
    pub fn means(&self) -> &[Real] {
        &self.means
    }

    /// The covariance matrix.
    pub fn matrix(&self) -> &DMatrix<Real> {
        &self.matrix
    }

    /// Take ownership of the covariance matrix.
    pub fn into_matrix(self) -> DMatrix<Real> {
        self.matrix
    }

    /// The correlation matrix.
    pub fn correlation_matrix(&self) -> DMatrix<Real> {
        correlation_from(&self.matrix)
    }
}

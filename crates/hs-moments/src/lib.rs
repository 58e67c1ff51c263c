//! # hs-moments
//!
//! Single-pass, mergeable accumulators for means, variances, and covariance
//! matrices, plus batch location estimates (median, trimmed means).
//!
//! Every accumulator implements [`Merge`], so a stream may be partitioned
//! across workers, accumulated independently, and combined in any order.
//! [`Reduction`] supplies the identity element for such folds.
//!
//! ```
//! use hs_moments::{Merge, SampleStats};
//!
//! let mut left = SampleStats::from_values(&[1.0, 2.0, 3.0]);
//! let right = SampleStats::from_values(&[4.0, 5.0]);
//! left.merge(&right).unwrap();
//! assert_eq!(left.count(), 5);
//! assert!((left.variance().unwrap() - 2.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Scalar accumulators and variance estimators.
pub mod basic;

/// Covariance matrix accumulator.
pub mod covariance;

/// Vector accumulator with per-coordinate moments.
pub mod multivariate;

/// Mean, median, and trimmed means of a batch.
pub mod quantiles;

/// The merge contract and reduction identity.
pub mod reduction;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use basic::{BasicStats, Estimator, Population, PopulationStats, Sample, SampleStats};
pub use covariance::{CovarianceMatrix, CovarianceSummary};
pub use multivariate::MultiStats;
pub use quantiles::{mean, median, trimmed_mean, trimmed_mean_ratio};
pub use reduction::{Merge, Reduction};

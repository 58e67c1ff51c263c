//! # hs-statistics
//!
//! Test statistics built on the moment accumulators and distributions of
//! hypostat: Student's t (two-sample, one-sample, paired, slope), Welch's t,
//! the variance-ratio F, Levene's test, Pearson's chi-square, and the
//! Kolmogorov-Smirnov statistic.
//!
//! Every statistic implements [`Statistic`], which derives p-values,
//! critical values, power, and type II error probabilities from the value
//! and the sampling distribution.
//!
//! ```
//! use hs_statistics::{PValueMode, Statistic, TwoSampleT};
//!
//! let t = TwoSampleT::from_samples(&[10.0, 12.0, 11.0, 13.0], &[20.0, 22.0, 21.0, 23.0]);
//! let p = t.p_value(Some(PValueMode::TwoSided)).unwrap();
//! assert!(p < 0.001);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Pearson's chi-square statistic.
pub mod chi_square;

/// Variance-ratio F and Levene's test.
pub mod f_tests;

/// The one-sample Kolmogorov-Smirnov statistic.
pub mod kolmogorov_smirnov;

/// The statistic trait, p-value modes, and rejection regions.
pub mod statistic;


/// Welch's unequal-variance t statistic.
pub mod welch;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use chi_square::ChiSquareStat;
pub use f_tests::{Levene, LeveneCenter, VarianceRatioF};
pub use kolmogorov_smirnov::KolmogorovSmirnov;
pub use statistic::{DegreesOfFreedom, PValueMode, Rejection, Statistic};
pub use t_tests::{OneSampleT, PairedDifferenceT, SlopeT, TwoSampleT};
pub use welch::WelchT;

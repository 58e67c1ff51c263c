//! # hs-distributions
//!
//! Probability distributions for hypothesis testing: Gaussian, chi-square,
//! F and Student's t (each with an optional noncentrality parameter), and
//! Kolmogorov's distribution of the Kolmogorov-Smirnov statistic.
//!
//! Every distribution implements [`ProbDistribution`]. Quantiles come from
//! closed forms where they exist and otherwise from a shared
//! bracket-then-Brent inversion of the cdf.
//!
//! ```
//! use hs_distributions::{ChiSquareDistribution, ProbDistribution};
//!
//! let chi2 = ChiSquareDistribution::new(3).unwrap();
//! let critical = chi2.inverse_ccdf(0.05).unwrap();
//! assert!((chi2.ccdf(critical) - 0.05).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Chi-square distribution.
pub mod chi_square;

/// Closed sum type over all distributions.
pub mod distribution;

/// Supports of distributions.
pub mod domain;

/// F distribution.
pub mod f;

/// Normal distribution.
pub mod gaussian;

/// Kolmogorov's distribution.
pub mod kolmogorov;

/// Student's t distribution.
pub mod student_t;

/// The distribution trait.
pub mod traits;

mod inverse;
mod mixture;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use chi_square::ChiSquareDistribution;
pub use distribution::Distribution;
pub use domain::Domain;
pub use f::FDistribution;
pub use gaussian::GaussianDistribution;
pub use kolmogorov::KolmogorovDistribution;
pub use student_t::StudentsTDistribution;
pub use traits::ProbDistribution;

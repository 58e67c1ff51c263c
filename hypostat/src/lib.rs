//! # hypostat
//!
//! Streaming moment accumulators, central and noncentral probability
//! distributions, and hypothesis-test statistics.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `hs-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! hypostat = "0.1"
//! ```
//!
//! ```rust
//! use hypostat::moments::{Merge, SampleStats};
//! use hypostat::statistics::{OneSampleT, Statistic};
//!
//! let mut left = SampleStats::from_values(&[5.0, 3.0]);
//! left.merge(&SampleStats::from_values(&[6.0, 2.0])).unwrap();
//!
//! let t = OneSampleT::from_summary(
//!     6.08,
//!     left.mean().unwrap(),
//!     left.variance().unwrap(),
//!     left.count(),
//! )
//! .unwrap();
//! assert!(t.p_value(None).unwrap() > 0.05);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, error definitions, and settings.
pub use hs_core as core;

/// Special functions, root finding, and floating-point comparison.
pub use hs_math as math;

/// Mergeable mean, variance, and covariance accumulators.
pub use hs_moments as moments;

/// Probability distributions.
pub use hs_distributions as distributions;

/// Test statistics.
pub use hs_statistics as statistics;

//! # hs-math
//!
//! Numerical building blocks for the hypostat distributions: special
//! functions (via statrs), bracketing root finders, and floating-point
//! comparison helpers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// 1D root-finding solvers.
pub mod solvers1d;

/// Gamma, beta, error, and hypergeometric functions.
pub mod special;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::{close, close_enough, next_after};
pub use solvers1d::{bisection, brent};

//! # hs-core
//!
//! Core types, error definitions, and shared numerics for hypostat.
//!
//! This crate provides the foundational building blocks shared across all
//! other crates in the workspace – type aliases, the error hierarchy, the
//! process-wide `Settings`, and Kahan compensated summation.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `ensure_state!` / `unsupported!` / `fail!`
/// macros.
pub mod errors;

/// Kahan compensated summation.
pub mod kahan;

/// Global library settings.
pub mod settings;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// A probability in `[0, 1]`.
pub type Probability = Real;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// Number of points absorbed by an accumulator.
pub type Count = u64;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use kahan::{kahan_sum, KahanSum};
pub use settings::{Settings, DEFAULT_KOLMOGOROV_THRESHOLD};

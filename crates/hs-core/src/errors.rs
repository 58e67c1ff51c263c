//! Error types for hypostat.
//!
//! Every fallible operation in the workspace reports one of four conditions:
//! wrong usage, not enough information yet, a missing capability, or a
//! numerical iteration that ran past its bound. The `ensure!`,
//! `ensure_state!`, `unsupported!`, and `fail!` macros defined here are the
//! usual way to raise them.

use thiserror::Error;

/// The top-level error type used throughout hypostat.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An argument was out of range or inconsistent with other arguments
    /// (non-positive bin counts, mismatched lengths, probabilities outside
    /// `[0, 1]`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The receiver cannot answer yet or can no longer be mutated: too few
    /// data points, degrees of freedom exhausted by constraints, or a frozen
    /// statistic.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The operation is not meaningful for this object (for example a
    /// symmetric-interval probability of an asymmetric distribution).
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A bounded numerical iteration did not converge.
    #[error("failed to converge: {0}")]
    Convergence(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },
}

impl Error {
    /// Return `true` for [`Error::InvalidState`].
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Error::InvalidState(_))
    }

    /// Return `true` for [`Error::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Return `true` for [`Error::Unsupported`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}

/// Shorthand `Result` type used throughout hypostat.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidArgument(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use hs_core::{ensure, errors::Error};
/// fn positive(x: f64) -> hs_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidArgument(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidArgument(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::InvalidState(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use hs_core::{ensure_state, errors::Error};
/// fn variance(count: u64) -> hs_core::errors::Result<()> {
///     ensure_state!(count >= 2, "data set too small: {count} points");
///     Ok(())
/// }
/// assert!(variance(2).is_ok());
/// assert!(matches!(variance(1), Err(Error::InvalidState(_))));
/// ```
#[macro_export]
macro_rules! ensure_state {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidState(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Unsupported(...))` immediately.
///
/// # Example
/// ```
/// use hs_core::{unsupported, errors::Error};
/// fn interval() -> hs_core::errors::Result<f64> {
///     unsupported!("distribution is not symmetric");
/// }
/// assert!(matches!(interval(), Err(Error::Unsupported(_))));
/// ```
#[macro_export]
macro_rules! unsupported {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Unsupported(format!($($msg)*)))
    };
}

/// Returns `Err(Error::Convergence(...))` immediately.
///
/// # Example
/// ```
/// use hs_core::{fail, errors::Error};
/// fn always_err() -> hs_core::errors::Result<()> {
///     fail!("no bracket after {} steps", 10);
/// }
/// assert!(matches!(always_err(), Err(Error::Convergence(_))));
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Convergence(format!($($msg)*)))
    };
}

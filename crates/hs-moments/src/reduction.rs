//! Merging accumulators and the identity element of a parallel reduction.

use hs_core::errors::Result;

/// An accumulator that can absorb another accumulator of the same kind.
///
/// Merging must be associative and commutative up to rounding, so a stream
/// may be split across workers and the partial results combined in any
/// order.
pub trait Merge {
    /// Absorb `other` as if its points had been added to `self`.
    fn merge(&mut self, other: &Self) -> Result<()>;
}

/// The running value of a reduction over accumulators.
///
/// `Empty` is the identity: it holds no data, and combining it with an
/// accumulator yields a copy of that accumulator. Use it as the seed of a
/// fold whose inputs have not been seen yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction<A> {
    /// Nothing combined yet.
    Empty,
    /// At least one accumulator combined.
    Populated(A),
}

impl<A: Merge + Clone> Reduction<A> {
    /// The identity element.
    pub fn identity() -> Self {
        Reduction::Empty
    }

    /// Combine with one accumulator.
    pub fn absorb(self, other: &A) -> Result<Self> {
        match self {
            Reduction::Empty => Ok(Reduction::Populated(other.clone())),
            Reduction::Populated(mut acc) => {
                acc.merge(other)?;
                Ok(Reduction::Populated(acc))
            }
        }
    }

    /// Combine two partial reductions.
    pub fn combine(self, other: Self) -> Result<Self> {
        match (self, other) {
            (Reduction::Empty, rhs) => Ok(rhs),
            (lhs, Reduction::Empty) => Ok(lhs),
            (Reduction::Populated(mut lhs), Reduction::Populated(rhs)) => {
                lhs.merge(&rhs)?;
                Ok(Reduction::Populated(lhs))
            }
        }
    }

    /// Return `true` while nothing has been combined.
    pub fn is_empty(&self) -> bool {
        matches!(self, Reduction::Empty)
    }

    /// The combined accumulator, if any.
    pub fn get(&self) -> Option<&A> {
        match self {
            Reduction::Empty => None,
            Reduction::Populated(acc) => Some(acc),
        }
    }

    /// Consume the reduction, returning the combined accumulator.
    pub fn into_inner(self) -> Option<A> {
        match self {
            Reduction::Empty => None,
            Reduction::Populated(acc) => Some(acc),
        }
    }
}

impl<A> Default for Reduction<A> {
    fn default() -> Self {
        Reduction::Empty
    }
}

impl<A> From<A> for Reduction<A> {
    fn from(acc: A) -> Self {
        Reduction::Populated(acc)
    }
}

//! The support of a distribution.

use hs_core::Real;

/// An interval of the real line with independently open or closed ends.
///
/// Infinite endpoints are always open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Lower bound.
    pub min: Real,
    /// Whether `min` itself belongs to the domain.
    pub min_closed: bool,
    /// Upper bound.
    pub max: Real,
    /// Whether `max` itself belongs to the domain.
    pub max_closed: bool,
}

impl Domain {
    /// `(-∞, ∞)`.
    pub const REAL_LINE: Domain = Domain {
        min: Real::NEG_INFINITY,
        min_closed: false,
        max: Real::INFINITY,
        max_closed: false,
    };

    /// `[0, ∞)`.
    pub const NON_NEGATIVE: Domain = Domain {
        min: 0.0,
        min_closed: true,
        max: Real::INFINITY,
        max_closed: false,
    };

    /// The closed interval `[min, max]`.
    pub const fn closed(min: Real, max: Real) -> Self {
        Domain {
            min,
            min_closed: true,
            max,
            max_closed: true,
        }
    }

    /// Return `true` if `x` lies in the domain.
    pub fn contains(&self, x: Real) -> bool {
        let above_min = if self.min_closed { x >= self.min } else { x > self.min };
        let below_max = if self.max_closed { x <= self.max } else { x < self.max };
        above_min && below_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        assert!(Domain::NON_NEGATIVE.contains(0.0));
        assert!(!Domain::NON_NEGATIVE.contains(-1e-300));
        assert!(!Domain::NON_NEGATIVE.contains(Real::INFINITY));
        assert!(Domain::REAL_LINE.contains(-1e300));
        assert!(!Domain::REAL_LINE.contains(Real::NAN));
        assert!(Domain::closed(0.0, 1.0).contains(1.0));
    }
}

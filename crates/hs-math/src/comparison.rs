//! Floating-point comparison helpers.

use hs_core::Real;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}

/// Return `true` if `a` and `b` agree to within `n` ulps of the larger
/// magnitude.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= a.abs().max(b.abs()) * Real::EPSILON * Real::from(n)
}

/// The next representable value after `x` in the direction of `toward`.
pub fn next_after(x: Real, toward: Real) -> Real {
    if x.is_nan() || toward.is_nan() {
        return Real::NAN;
    }
    if x == toward {
        return toward;
    }
    if x == 0.0 {
        let tiny = Real::from_bits(1);
        return if toward > 0.0 { tiny } else { -tiny };
    }
    let bits = x.to_bits();
    let up = (toward > x) == (x > 0.0);
    Real::from_bits(if up { bits + 1 } else { bits - 1 })
}

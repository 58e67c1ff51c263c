//! Kahan compensated summation.
//!
//! A [`KahanSum`] carries the running total together with the rounding error
//! lost by the last addition, and feeds that error back into the next one.
//! The accumulated error of `n` additions stays O(1) ulps instead of O(n).

use num_traits::Float;

/// A running sum with a Kahan compensation term.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KahanSum<T: Float = f64> {
    total: T,
    compensation: T,
}

impl<T: Float> Default for KahanSum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> KahanSum<T> {
    /// An empty sum.
    pub fn new() -> Self {
        Self::with_total(T::zero())
    }

    /// A sum starting at `total` with no pending compensation.
    pub fn with_total(total: T) -> Self {
        Self {
            total,
            compensation: T::zero(),
        }
    }

    /// Add `value`, compensating for the rounding error of previous steps.
    #[inline]
    pub fn add(&mut self, value: T) {
        let y = value - self.compensation;
        let t = self.total + y;
        self.compensation = (t - self.total) - y;
        self.total = t;
    }

    /// The current total.
    #[inline]
    pub fn total(&self) -> T {
        self.total
    }

    /// The pending compensation term.
    #[inline]
    pub fn compensation(&self) -> T {
        self.compensation
    }

    /// Overwrite the total and drop the compensation term.
    ///
    /// Used after an algebraic update that is not itself a compensated
    /// addition.
    pub fn reset_to(&mut self, total: T) {
        self.total = total;
        self.compensation = T::zero();
    }
}

impl<T: Float> Extend<T> for KahanSum<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: Float> FromIterator<T> for KahanSum<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sum = Self::new();
        sum.extend(iter);
        sum
    }
}

/// Compensated sum of a slice.
pub fn kahan_sum<T: Float>(values: &[T]) -> T {
    values.iter().copied().collect::<KahanSum<T>>().total()
}

//! Global library settings.
//!
//! [`Settings`] holds process-wide numerical defaults. It is a singleton
//! accessed via a `std::sync::OnceLock`; values are stored behind a `Mutex`
//! so they can be changed from any thread. Objects that depend on a setting
//! copy it when they are constructed, so a later change never alters an
//! existing object.

use std::sync::{Mutex, OnceLock};

use crate::Real;

/// Default `n·x` threshold above which the Kolmogorov distribution switches
/// from the exact recurrence to the limiting form.
pub const DEFAULT_KOLMOGOROV_THRESHOLD: Real = 256.0;

/// Process-wide settings used by the hypostat crates.
pub struct Settings {
    kolmogorov_threshold: Mutex<Real>,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();

impl Settings {
    /// Return a reference to the global singleton.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(|| Settings {
            kolmogorov_threshold: Mutex::new(DEFAULT_KOLMOGOROV_THRESHOLD),
        })
    }

    /// The `n·x` value above which Kolmogorov probabilities use the limiting
    /// form.
    pub fn kolmogorov_threshold(&self) -> Real {
        *self
            .kolmogorov_threshold
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Set the Kolmogorov switch threshold.
    ///
    /// Non-positive or non-finite values restore
    /// [`DEFAULT_KOLMOGOROV_THRESHOLD`].
    pub fn set_kolmogorov_threshold(&self, threshold: Real) {
        let value = if threshold > 0.0 && threshold.is_finite() {
            threshold
        } else {
            DEFAULT_KOLMOGOROV_THRESHOLD
        };
        tracing::debug!(threshold = value, "kolmogorov threshold updated");
        *self
            .kolmogorov_threshold
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
    }

    /// Restore every setting to its default.
    pub fn reset(&self) {
        self.set_kolmogorov_threshold(DEFAULT_KOLMOGOROV_THRESHOLD);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_rejects_non_positive_values() {
        let settings = Settings::instance();
        settings.set_kolmogorov_threshold(-3.0);
        assert_eq!(settings.kolmogorov_threshold(), DEFAULT_KOLMOGOROV_THRESHOLD);
        settings.set_kolmogorov_threshold(f64::NAN);
        assert_eq!(settings.kolmogorov_threshold(), DEFAULT_KOLMOGOROV_THRESHOLD);
        settings.reset();
    }
}

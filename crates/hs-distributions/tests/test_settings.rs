//! The Kolmogorov switch threshold is snapshotted from the global settings.
//!
//! Kept in its own test binary so no other test observes the changed value.

use hs_core::{Settings, DEFAULT_KOLMOGOROV_THRESHOLD};
use hs_distributions::{KolmogorovDistribution, ProbDistribution};

#[test]
fn threshold_is_copied_at_construction() {
    let settings = Settings::instance();
    let before = KolmogorovDistribution::new(40).unwrap();
    assert_eq!(before.threshold(), DEFAULT_KOLMOGOROV_THRESHOLD);

    settings.set_kolmogorov_threshold(2.0);
    let after = KolmogorovDistribution::new(40).unwrap();
    assert_eq!(after.threshold(), 2.0);
    assert_eq!(before.threshold(), DEFAULT_KOLMOGOROV_THRESHOLD);

    // n·d = 8 lies above the new threshold only
    let d = 0.2;
    assert_eq!(after.cdf(d), after.limiting_cdf(d));
    assert_ne!(before.cdf(d), before.limiting_cdf(d));

    settings.reset();
    assert_eq!(settings.kolmogorov_threshold(), DEFAULT_KOLMOGOROV_THRESHOLD);
}

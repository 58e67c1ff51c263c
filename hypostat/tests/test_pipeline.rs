//! End to end: shard a stream across threads, merge the partial moments, and
//! test the merged summary.

use std::thread;

use approx::assert_abs_diff_eq;
use hypostat::moments::{Reduction, SampleStats};
use hypostat::statistics::{OneSampleT, PValueMode, Statistic, TwoSampleT};

#[test]
fn sharded_moments_feed_a_t_test() {
    let data: Vec<f64> = (0..4000).map(|i| ((i * 37) % 101) as f64 / 10.0).collect();

    let partials: Vec<SampleStats> = thread::scope(|s| {
        let handles: Vec<_> = data
            .chunks(1000)
            .map(|chunk| s.spawn(move || SampleStats::from_values(chunk)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut merged = Reduction::identity();
    for partial in partials.iter().rev() {
        merged = merged.absorb(partial).unwrap();
    }
    let merged = merged.into_inner().unwrap();

    let sharded = OneSampleT::from_summary(
        5.0,
        merged.mean().unwrap(),
        merged.variance().unwrap(),
        merged.count(),
    )
    .unwrap();
    let direct = OneSampleT::from_values(5.0, &data);
    assert_abs_diff_eq!(sharded.value().unwrap(), direct.value().unwrap(), epsilon = 1e-9);
    assert_abs_diff_eq!(
        sharded.p_value(Some(PValueMode::TwoSided)).unwrap(),
        direct.p_value(Some(PValueMode::TwoSided)).unwrap(),
        epsilon = 1e-9
    );
}

#[test]
fn errors_distinguish_usage_from_missing_data() {
    let empty = TwoSampleT::new();
    assert!(empty.value().unwrap_err().is_invalid_state());
    let t = TwoSampleT::from_samples(&[1.0, 2.0, 4.0], &[2.0, 3.0, 7.0]);
    assert!(t.critical_value(None, 0.0).unwrap_err().is_invalid_argument());
}

//! Covariance and correlation matrices with degenerate columns.

use approx::assert_abs_diff_eq;
use hs_moments::{CovarianceMatrix, Sample};

#[test]
fn constant_column_keeps_unit_diagonal() {
    let rows = [[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
    let acc = CovarianceMatrix::<Sample>::from_rows(2, &rows).unwrap();
    let cov = acc.matrix().unwrap();
    assert_abs_diff_eq!(cov[(0, 0)], 1.0, epsilon = 1e-14);
    assert_eq!(cov[(1, 1)], 0.0);

    let corr = acc.correlation_matrix().unwrap();
    assert_eq!(corr[(0, 0)], 1.0);
    assert_eq!(corr[(1, 1)], 1.0);
    assert!(corr[(0, 1)].is_nan());
    assert!(corr[(1, 0)].is_nan());

    let sealed = acc.complete().unwrap().correlation_matrix();
    assert_eq!(sealed[(1, 1)], 1.0);
    assert!(sealed[(0, 1)].is_nan());
}

#[test]
fn streamed_constant_column_matches_batch() {
    let mut acc = CovarianceMatrix::<Sample>::new(3);
    for row in [[0.5, -2.0, 7.0], [1.5, -1.0, 7.0], [2.5, 3.0, 7.0], [4.0, 0.0, 7.0]] {
        acc.add(&row).unwrap();
    }
    let corr = acc.correlation_matrix().unwrap();
    for i in 0..3 {
        assert_eq!(corr[(i, i)], 1.0);
    }
    assert!(corr[(0, 1)].is_finite());
    assert!(corr[(0, 2)].is_nan() && corr[(2, 1)].is_nan());
}

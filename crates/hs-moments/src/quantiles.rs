//! Location estimates over a fully materialized data set.

use hs_core::{
    ensure,
    errors::{Error, Result},
    Real,
};

use crate::basic::PopulationStats;

fn sorted(data: &[Real]) -> Result<Vec<Real>> {
    ensure!(!data.is_empty(), "empty data set");
    let mut data = data.to_vec();
    data.sort_by(Real::total_cmp);
    Ok(data)
}

fn window_mean(data: &[Real], trim: usize) -> Option<Real> {
    let end = data.len().checked_sub(trim)?;
    if trim >= end {
        return None;
    }
    PopulationStats::from_values(&data[trim..end]).mean().ok()
}

fn trimmed_window_mean(data: &[Real], trim: usize) -> Result<Real> {
    window_mean(data, trim)
        .ok_or_else(|| Error::InvalidArgument("trimming removes every element".into()))
}

/// Blend the means trimmed by `trim` and `trim + 1` elements per side.
fn interpolated_mean(data: &[Real], trim: usize, t: Real) -> Result<Real> {
    let inner = trimmed_window_mean(data, trim)?;
    let t = t.clamp(0.0, 1.0);
    match window_mean(data, trim + 1) {
        Some(outer) => Ok(outer * t + inner * (1.0 - t)),
        None => Ok(inner),
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// The arithmetic mean of `data`.
pub fn mean(data: &[Real]) -> Result<Real> {
    ensure!(!data.is_empty(), "empty data set");
    PopulationStats::from_values(data).mean()
}

/// The median of `data`: the middle element, or the average of the two
/// middle elements for an even length.
pub fn median(data: &[Real]) -> Result<Real> {
    let data = sorted(data)?;
    let mid = data.len() / 2;
    if data.len() % 2 == 1 {
        Ok(data[mid])
    } else {
        Ok(0.5 * (data[mid - 1] + data[mid]))
    }
}

/// Trimmed mean dropping one of `bins` equal bins from each end.
///
/// With `len` points, `len / bins` points are removed per side. When `bins`
/// does not divide `len`, the means trimmed by `⌊len/bins⌋` and
/// `⌊len/bins⌋ + 1` points are blended linearly by the fractional part of
/// `len / bins`.
pub fn trimmed_mean(data: &[Real], bins: u32) -> Result<Real> {
    ensure!(bins > 0, "number of bins must be positive, got {bins}");
    let data = sorted(data)?;
    let len = data.len();
    let bins = bins as usize;
    let trim = len / bins;
    if len % bins == 0 {
        return trimmed_window_mean(&data, trim);
    }
    let ratio = len as Real / bins as Real;
    interpolated_mean(&data, trim, ratio - ratio.floor())
}

/// Trimmed mean dropping the fraction `numerator / denominator` of the
/// points from each end.
///
/// The trim boundary is found in integer arithmetic, so for example
/// `trimmed_mean_ratio(data, 125, 1000)` trims exactly 12.5%.
pub fn trimmed_mean_ratio(data: &[Real], numerator: u32, denominator: u32) -> Result<Real> {
    ensure!(
        numerator > 0 && denominator > 0,
        "trim ratio {numerator}/{denominator} must have positive terms"
    );
    let divisor = gcd(u64::from(numerator), u64::from(denominator));
    let numerator = u64::from(numerator) / divisor;
    let denominator = u64::from(denominator) / divisor;

    let data = sorted(data)?;
    let scaled = data.len() as u64 * numerator;
    let trim = (scaled / denominator) as usize;
    let remainder = scaled - trim as u64 * denominator;
    if remainder == 0 {
        return trimmed_window_mean(&data, trim);
    }
    interpolated_mean(&data, trim, remainder as Real / denominator as Real)
}

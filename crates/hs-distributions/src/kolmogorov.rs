//! Kolmogorov's distribution of the one-sample Kolmogorov-Smirnov statistic.
//!
//! `P(D_n ≤ d)` is evaluated exactly with the Marsaglia-Tsang-Wang
//! recurrence while `n·d` stays below a threshold, and with the limiting
//! distribution of `√n·D_n` above it. The recurrence keeps the working
//! vector inside range by rescaling with powers of `1e140`.

use std::f64::consts::PI;

use hs_core::{ensure, errors::Result, Real, Settings};
use tracing::trace;

use crate::domain::Domain;
use crate::traits::ProbDistribution;

const RESCALE: Real = 1.0e140;
const RESCALE_INV: Real = 1.0e-140;

/// Relative size at which the limiting-form series stop.
const SERIES_TOLERANCE: Real = 1e-15;

/// Step used for the numerical derivative of the exact cdf.
const DIFFERENCE_STEP: Real = 1e-6;

/// Distribution of the Kolmogorov-Smirnov statistic `D_n` for `n` samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KolmogorovDistribution {
    n: u64,
    threshold: Real,
}

impl KolmogorovDistribution {
    /// Distribution for `n` samples, using the global switch threshold
    /// current at construction.
    pub fn new(n: u64) -> Result<Self> {
        Self::with_threshold(n, Settings::instance().kolmogorov_threshold())
    }

    /// Distribution for `n` samples switching to the limiting form when
    /// `n·d > threshold`.
    pub fn with_threshold(n: u64, threshold: Real) -> Result<Self> {
        ensure!(n >= 1, "sample count must be positive, got {n}");
        ensure!(
            threshold > 0.0 && threshold.is_finite(),
            "threshold must be positive, got {threshold}"
        );
        Ok(Self { n, threshold })
    }

    /// The number of samples.
    pub fn sample_count(&self) -> u64 {
        self.n
    }

    /// The `n·d` value above which the limiting form is used.
    pub fn threshold(&self) -> Real {
        self.threshold
    }

    fn uses_limiting_form(&self, d: Real) -> bool {
        let limiting = self.n as Real * d > self.threshold;
        trace!(n = self.n, d, limiting, "kolmogorov algorithm selected");
        limiting
    }

    /// `lim P(√n·D_n ≤ √n·d)`, the asymptotic cdf.
    pub fn limiting_cdf(&self, d: Real) -> Real {
        limiting_cdf(d * (self.n as Real).sqrt())
    }

    /// Density of the asymptotic distribution, with respect to `d`.
    pub fn limiting_pdf(&self, d: Real) -> Real {
        let rn = (self.n as Real).sqrt();
        limiting_pdf(d * rn) * rn
    }
}

/// `Σ_{k≥1} (-1)^{k-1} k^power e^{-2k²x²}`.
fn alternating_sum(x: Real, power: i32) -> Real {
    let x2 = x * x;
    let mut sum = 0.0;
    let mut sign = 1.0;
    let mut k = 1_u32;
    loop {
        let k2 = (k * k) as Real;
        let term = sign * k2.powi(power / 2) * (-2.0 * k2 * x2).exp();
        sum += term;
        if term == 0.0 || (term / sum).abs() <= SERIES_TOLERANCE {
            return sum;
        }
        sign = -sign;
        k += 1;
    }
}

/// `Σ_{k≥1} f^power e^{-f²π²/(8x²)}` with `f = 2k - 1`.
fn odd_sum(x: Real, power: i32) -> Real {
    let x2 = x * x;
    let limit = (x * SERIES_TOLERANCE).min(SERIES_TOLERANCE);
    let mut sum = 0.0;
    let mut k = 1_u32;
    loop {
        let f = (2 * k - 1) as Real;
        let term = f.powi(power) * (-f * f * PI * PI / (8.0 * x2)).exp();
        sum += term;
        if term <= limit {
            return sum;
        }
        k += 1;
    }
}

/// Kolmogorov's limiting cdf `K(x)`.
fn limiting_cdf(x: Real) -> Real {
    if x <= 0.0 {
        0.0
    } else if x > 0.5 {
        1.0 - 2.0 * alternating_sum(x, 0)
    } else {
        (2.0 * PI).sqrt() * odd_sum(x, 0) / x
    }
}

fn limiting_ccdf(x: Real) -> Real {
    if x > 0.5 {
        2.0 * alternating_sum(x, 0)
    } else {
        1.0 - limiting_cdf(x)
    }
}

/// `K'(x)`.
fn limiting_pdf(x: Real) -> Real {
    if x <= 0.0 {
        0.0
    } else if x > 0.5 {
        8.0 * x * alternating_sum(x, 2)
    } else {
        let x2 = x * x;
        (2.0 * PI).sqrt() * (PI * PI / 4.0 * odd_sum(x, 2) / x2 - odd_sum(x, 0)) / x2
    }
}

/// Exact `P(D_n ≤ d)` via the Marsaglia-Tsang-Wang matrix recurrence.
///
/// Only the first row of the upper-Hessenberg matrix `H` and the column
/// vector `q` are stored; each of the `n` steps multiplies `q` by `H` and
/// scales by `i/n`.
fn exact_cdf(d: Real, n: u64) -> Real {
    let nd = n as Real * d;
    let k = nd as usize + 1;
    let h = k as Real - nd;
    let m = 2 * k - 1;

    // v: first column of H, w: the 1/j! entries shared by the sub-diagonals
    let mut v = vec![0.0; m];
    let mut w = vec![0.0; m.saturating_sub(2)];
    let mut h_pow = 1.0;
    let mut inv_fact = 1.0;
    for j in 0..m - 1 {
        inv_fact /= (j + 1) as Real;
        h_pow *= h;
        if j < m - 2 {
            w[j] = inv_fact;
        }
        v[j] = (1.0 - h_pow) * inv_fact;
    }
    let corner = if h > 0.5 { (2.0 * h - 1.0).powi(m as i32) } else { 0.0 };
    v[m - 1] = (1.0 - 2.0 * h_pow * h + corner) * inv_fact / m as Real;

    let mut q = vec![0.0; m];
    q[k - 1] = 1.0;
    let mut exponent: i32 = 0;
    let last = m - 1;
    for i in 1..=n {
        let s = i as Real / n as Real;
        let mut carry = q[0];
        q[0] = dot(&v, &q) * s;
        if m > 1 {
            for j in 1..last {
                let previous = carry;
                carry = q[j];
                let tail = last - j;
                q[j] = (dot(&w[..tail], &q[j..j + tail]) + v[tail] * q[last] + previous) * s;
            }
            q[last] = (v[0] * q[last] + carry) * s;
        }
        if q[k - 1] > RESCALE {
            q.iter_mut().for_each(|x| *x *= RESCALE_INV);
            exponent += 1;
        } else if q[k - 1] < RESCALE_INV {
            q.iter_mut().for_each(|x| *x *= RESCALE);
            exponent -= 1;
        }
    }
    q[k - 1] * RESCALE.powi(exponent)
}

fn dot(a: &[Real], b: &[Real]) -> Real {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl ProbDistribution for KolmogorovDistribution {
    fn domain(&self) -> Domain {
        Domain::closed(0.0, 1.0)
    }

    fn pdf(&self, d: Real) -> Real {
        let n = self.n as Real;
        if d <= 0.5 / n || d >= 1.0 {
            return 0.0;
        }
        if self.uses_limiting_form(d) {
            return self.limiting_pdf(d);
        }
        let lo = (d - DIFFERENCE_STEP).max(0.0);
        let hi = (d + DIFFERENCE_STEP).min(1.0);
        (exact_cdf(hi, self.n) - exact_cdf(lo, self.n)) / (hi - lo)
    }

    fn cdf(&self, d: Real) -> Real {
        let n = self.n as Real;
        if d <= 0.5 / n {
            return 0.0;
        }
        if d >= 1.0 {
            return 1.0;
        }
        if self.uses_limiting_form(d) {
            self.limiting_cdf(d)
        } else {
            exact_cdf(d, self.n).clamp(0.0, 1.0)
        }
    }

    fn ccdf(&self, d: Real) -> Real {
        let n = self.n as Real;
        if d <= 0.5 / n {
            return 1.0;
        }
        if d >= 1.0 {
            return 0.0;
        }
        if self.uses_limiting_form(d) {
            limiting_ccdf(d * n.sqrt())
        } else {
            1.0 - exact_cdf(d, self.n).clamp(0.0, 1.0)
        }
    }
}

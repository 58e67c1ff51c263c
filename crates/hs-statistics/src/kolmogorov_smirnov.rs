//! The one-sample Kolmogorov-Smirnov statistic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use hs_core::{ensure, ensure_state, errors::Result, Count, Real};
use hs_distributions::{Distribution, KolmogorovDistribution, ProbDistribution};
use tracing::debug;

use crate::statistic::{DegreesOfFreedom, Statistic};

/// A finite observation ordered by `total_cmp`.
#[derive(Debug, Clone, Copy)]
struct Observation(Real);

impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Observation {}

impl PartialOrd for Observation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Observation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Default)]
struct Pending {
    heap: BinaryHeap<Observation>,
    sealed: bool,
}

type ReferenceCdf = Box<dyn Fn(Real) -> Real + Send + Sync>;

/// `D = sup_x |F_n(x) - F(x)|` between the empirical distribution of the
/// observations and a reference cdf `F`.
///
/// Observations may be added through a shared reference from several
/// threads; additions are serialized by an internal lock. The value is
/// computed once, on first query, after which the statistic is sealed and
/// [`add`](Self::add) fails.
pub struct KolmogorovSmirnov {
    reference: ReferenceCdf,
    pending: Mutex<Pending>,
    summary: OnceLock<(Real, Count)>,
}

impl fmt::Debug for KolmogorovSmirnov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KolmogorovSmirnov")
            .field("summary", &self.summary.get())
            .finish_non_exhaustive()
    }
}

impl KolmogorovSmirnov {
    /// A statistic against the reference cdf `cdf`.
    pub fn new<F>(cdf: F) -> Self
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        Self {
            reference: Box::new(cdf),
            pending: Mutex::new(Pending::default()),
            summary: OnceLock::new(),
        }
    }

    /// A statistic against the cdf of `distribution`.
    pub fn from_distribution<D>(distribution: D) -> Self
    where
        D: ProbDistribution + Send + Sync + 'static,
    {
        Self::new(move |x| distribution.cdf(x))
    }

    /// Build from a batch of observations.
    pub fn with_values<F>(cdf: F, values: &[Real]) -> Result<Self>
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        let stat = Self::new(cdf);
        for &x in values {
            stat.add(x)?;
        }
        Ok(stat)
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an observation.
    ///
    /// Fails with an invalid-state error once the value has been computed.
    pub fn add(&self, x: Real) -> Result<()> {
        ensure!(!x.is_nan(), "observation must not be NaN");
        let mut pending = self.lock();
        ensure_state!(
            !pending.sealed,
            "cannot add to a Kolmogorov-Smirnov statistic after its value was computed"
        );
        pending.heap.push(Observation(x));
        Ok(())
    }

    /// Return `true` once the value has been computed.
    pub fn is_sealed(&self) -> bool {
        self.summary.get().is_some()
    }

    /// Number of observations.
    pub fn size(&self) -> Count {
        match self.summary.get() {
            Some(&(_, n)) => n,
            None => self.lock().heap.len() as Count,
        }
    }

    fn summary(&self) -> Result<(Real, Count)> {
        if let Some(&summary) = self.summary.get() {
            return Ok(summary);
        }
        let mut pending = self.lock();
        if let Some(&summary) = self.summary.get() {
            return Ok(summary);
        }
        ensure_state!(
            !pending.heap.is_empty(),
            "Kolmogorov-Smirnov statistic has no observations"
        );
        pending.sealed = true;
        let sorted = std::mem::take(&mut pending.heap).into_sorted_vec();

        let n = sorted.len() as Real;
        let mut d: Real = 0.0;
        for (i, Observation(x)) in sorted.iter().enumerate() {
            let f = (self.reference)(*x);
            let above = (i + 1) as Real / n - f;
            let below = f - i as Real / n;
            d = d.max(above).max(below);
        }
        let summary = (d, sorted.len() as Count);
        debug!(observations = summary.1, value = d, "computed Kolmogorov-Smirnov statistic");
        // the lock is held, so no other thread can have set it
        let _ = self.summary.set(summary);
        Ok(summary)
    }
}

impl Statistic for KolmogorovSmirnov {
    fn value(&self) -> Result<Real> {
        self.summary().map(|(d, _)| d)
    }

    fn distribution(&self) -> Result<Distribution> {
        let (_, n) = self.summary()?;
        Ok(KolmogorovDistribution::new(n)?.into())
    }

    fn degrees_of_freedom(&self) -> Result<DegreesOfFreedom> {
        self.summary().map(|(_, n)| DegreesOfFreedom::Integer(n))
    }
}

//! An ordered, strictly increasing grid of simulation times.
//!
//! Lookup by time returns an explicit [`TimeIndexResult`] rather than the
//! classical "negative index encodes the insertion point" convention, so
//! callers recover the preceding or following grid point without sign
//! arithmetic.

use irmc_core::{ensure, Result, Time};

/// Tolerance used when matching a query time against a grid point.
const TIME_TOLERANCE: Time = 1e-12;

// ─── TimeIndexResult ──────────────────────────────────────────────────────────

/// The outcome of locating a time on a [`TimeDiscretization`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeIndexResult {
    /// The time coincides (up to tolerance) with the grid point at this index.
    Exact(usize),
    /// The time lies strictly between `preceding` and `preceding + 1`.
    Within {
        /// Index of the closest grid point before the queried time.
        preceding: usize,
    },
    /// The time lies strictly before the first grid point.
    Before,
    /// The time lies strictly after the last grid point, at index `last`.
    After {
        /// Index of the last grid point.
        last: usize,
    },
}

impl TimeIndexResult {
    /// The exact index, if the time was a grid point.
    pub fn exact(self) -> Option<usize> {
        match self {
            TimeIndexResult::Exact(i) => Some(i),
            _ => None,
        }
    }

    /// Index of the grid point at or before the queried time.
    ///
    /// `None` if the time precedes the whole grid.
    pub fn preceding(self) -> Option<usize> {
        match self {
            TimeIndexResult::Exact(i) => Some(i),
            TimeIndexResult::Within { preceding } => Some(preceding),
            TimeIndexResult::Before => None,
            TimeIndexResult::After { last } => Some(last),
        }
    }

    /// Index of the grid point at or after the queried time.
    ///
    /// `None` if the time follows the whole grid.
    pub fn following(self) -> Option<usize> {
        match self {
            TimeIndexResult::Exact(i) => Some(i),
            TimeIndexResult::Within { preceding } => Some(preceding + 1),
            TimeIndexResult::Before => Some(0),
            TimeIndexResult::After { .. } => None,
        }
    }

    /// Index of the nearest grid point at or before the queried time,
    /// clamped into the valid range (never extrapolating).
    pub fn clamped(self) -> usize {
        match self {
            TimeIndexResult::Exact(i) => i,
            TimeIndexResult::Within { preceding } => preceding,
            TimeIndexResult::Before => 0,
            TimeIndexResult::After { last } => last,
        }
    }
}

// ─── TimeDiscretization ───────────────────────────────────────────────────────

/// An ordered, strictly increasing sequence of times.
///
/// Immutable once built.  Time steps are cached at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDiscretization {
    times: Vec<Time>,
    dts: Vec<Time>,
}

impl TimeDiscretization {
    /// Create a time discretization from an ordered sequence of times.
    ///
    /// Fails if the sequence is empty or not strictly increasing.
    pub fn new(times: Vec<Time>) -> Result<Self> {
        ensure!(!times.is_empty(), "time discretization must not be empty");
        for w in times.windows(2) {
            ensure!(
                w[1] > w[0] + TIME_TOLERANCE,
                "times must be strictly increasing, got {} before {}",
                w[0],
                w[1]
            );
        }
        let dts = times.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self { times, dts })
    }

    /// Create a uniform grid `first, first + dt, ..., first + steps * dt`.
    pub fn uniform(first: Time, steps: usize, dt: Time) -> Result<Self> {
        ensure!(dt > 0.0, "time step must be positive, got {dt}");
        let times = (0..=steps).map(|i| first + i as Time * dt).collect();
        Self::new(times)
    }

    /// Number of grid points (= steps + 1).
    pub fn number_of_times(&self) -> usize {
        self.times.len()
    }

    /// Number of time steps (= grid points − 1).
    pub fn number_of_time_steps(&self) -> usize {
        self.dts.len()
    }

    /// Time at index `i`.
    ///
    /// Panics if `i` is out of range; an out-of-range index is a programming
    /// error, not a recoverable condition.
    pub fn time(&self, i: usize) -> Time {
        self.times[i]
    }

    /// Time step between index `i` and `i + 1`.
    pub fn time_step(&self, i: usize) -> Time {
        self.dts[i]
    }

    /// First grid point.
    pub fn first_time(&self) -> Time {
        self.times[0]
    }

    /// Last grid point.
    pub fn last_time(&self) -> Time {
        *self.times.last().expect("grid is non-empty")
    }

    /// All grid points.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Locate `t` on the grid.
    pub fn time_index(&self, t: Time) -> TimeIndexResult {
        let last = self.times.len() - 1;
        if t < self.times[0] - TIME_TOLERANCE {
            return TimeIndexResult::Before;
        }
        if t > self.times[last] + TIME_TOLERANCE {
            return TimeIndexResult::After { last };
        }
        // Binary search for the insertion point.
        let i = self
            .times
            .partition_point(|&grid_time| grid_time < t - TIME_TOLERANCE);
        if i <= last && (self.times[i] - t).abs() <= TIME_TOLERANCE {
            TimeIndexResult::Exact(i)
        } else {
            TimeIndexResult::Within { preceding: i - 1 }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid() -> TimeDiscretization {
        TimeDiscretization::new(vec![0.0, 0.5, 1.0, 2.0, 3.5]).unwrap()
    }

    #[test]
    fn construction_validates_monotonicity() {
        assert!(TimeDiscretization::new(vec![]).is_err());
        assert!(TimeDiscretization::new(vec![0.0, 1.0, 1.0]).is_err());
        assert!(TimeDiscretization::new(vec![0.0, 2.0, 1.0]).is_err());
        assert!(TimeDiscretization::new(vec![0.0]).is_ok());
    }

    #[test]
    fn uniform_grid() {
        let g = TimeDiscretization::uniform(0.0, 4, 0.25).unwrap();
        assert_eq!(g.number_of_times(), 5);
        assert_eq!(g.number_of_time_steps(), 4);
        assert!((g.time(3) - 0.75).abs() < 1e-15);
        assert!((g.time_step(0) - 0.25).abs() < 1e-15);
        assert!((g.last_time() - 1.0).abs() < 1e-15);
        assert!(TimeDiscretization::uniform(0.0, 4, 0.0).is_err());
    }

    #[test]
    fn exact_lookup() {
        let g = grid();
        assert_eq!(g.time_index(0.0), TimeIndexResult::Exact(0));
        assert_eq!(g.time_index(2.0), TimeIndexResult::Exact(3));
        assert_eq!(g.time_index(3.5), TimeIndexResult::Exact(4));
        // Within tolerance counts as exact
        assert_eq!(g.time_index(1.0 + 1e-14), TimeIndexResult::Exact(2));
    }

    #[test]
    fn interior_lookup() {
        let g = grid();
        let r = g.time_index(0.75);
        assert_eq!(r, TimeIndexResult::Within { preceding: 1 });
        assert_eq!(r.preceding(), Some(1));
        assert_eq!(r.following(), Some(2));
        assert_eq!(r.clamped(), 1);
    }

    #[test]
    fn out_of_range_lookup() {
        let g = grid();
        let before = g.time_index(-0.5);
        assert_eq!(before, TimeIndexResult::Before);
        assert_eq!(before.preceding(), None);
        assert_eq!(before.following(), Some(0));
        assert_eq!(before.clamped(), 0);

        let after = g.time_index(10.0);
        assert_eq!(after, TimeIndexResult::After { last: 4 });
        assert_eq!(after.preceding(), Some(4));
        assert_eq!(after.following(), None);
        assert_eq!(after.clamped(), 4);
    }

    proptest! {
        #[test]
        fn lookup_is_consistent_with_order(t in -1.0f64..5.0) {
            let g = grid();
            match g.time_index(t) {
                TimeIndexResult::Exact(i) => {
                    prop_assert!((g.time(i) - t).abs() <= 1e-12);
                }
                TimeIndexResult::Within { preceding } => {
                    prop_assert!(g.time(preceding) < t);
                    prop_assert!(t < g.time(preceding + 1));
                }
                TimeIndexResult::Before => prop_assert!(t < g.first_time()),
                TimeIndexResult::After { last } => {
                    prop_assert_eq!(last, g.number_of_times() - 1);
                    prop_assert!(t > g.last_time());
                }
            }
        }

        #[test]
        fn every_grid_point_is_found_exactly(i in 0usize..5) {
            let g = grid();
            prop_assert_eq!(g.time_index(g.time(i)), TimeIndexResult::Exact(i));
        }
    }
}

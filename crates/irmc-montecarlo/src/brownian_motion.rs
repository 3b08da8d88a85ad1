//! The Brownian-increment driver.
//!
//! A driver hands out the increments `ΔW(tᵢ)` of a multi-factor Brownian
//! motion on a fixed time grid.  Increments for distinct factors are
//! independent; an increment over `[tᵢ, tᵢ₊₁]` is distributed
//! `N(0, Δtᵢ)` on every path.
//!
//! The table of increments is generated lazily on first access and is then
//! immutable, so concurrent reads after initialisation are lock-free.  For
//! a fixed (grid, factors, paths, seed) the table is bit-identical across
//! runs and platforms: uniform deviates are drawn path-outer, then time,
//! then factor, from a single Mersenne Twister stream.

use irmc_core::{Error, Result, Time};
use irmc_math::distributions::normal_inverse_cdf;
use irmc_math::{MersenneTwisterUniformRng, RandomVariable};
use irmc_time::TimeDiscretization;
use std::sync::{Arc, OnceLock};

/// A source of Brownian increments on a time grid.
pub trait StochasticDriver: Send + Sync {
    /// The grid the increments live on.
    fn time_discretization(&self) -> &TimeDiscretization;

    /// The number of independent factors.
    fn number_of_factors(&self) -> usize;

    /// The number of simulation paths.
    fn number_of_paths(&self) -> usize;

    /// The increment `ΔW(tᵢ)` of the given factor over
    /// `[tᵢ, tᵢ₊₁]`, one realization per path.
    fn increment(&self, time_index: usize, factor: usize) -> Result<RandomVariable>;

    /// An otherwise identical driver with a different seed, for seed
    /// studies and antithetic-style error estimates.
    fn clone_with_modified_seed(&self, seed: u64) -> Arc<dyn StochasticDriver>;
}

/// A Brownian driver whose increment table is generated once, on first
/// access.
pub struct BrownianMotionLazyInit {
    time_discretization: TimeDiscretization,
    number_of_factors: usize,
    number_of_paths: usize,
    seed: u64,
    // increments[time_index][factor], filled on first access
    increments: OnceLock<Vec<Vec<RandomVariable>>>,
}

impl BrownianMotionLazyInit {
    /// Create a driver for the given grid, factor count, path count and
    /// seed.  No random numbers are drawn until the first increment is
    /// requested.
    pub fn new(
        time_discretization: TimeDiscretization,
        number_of_factors: usize,
        number_of_paths: usize,
        seed: u64,
    ) -> Self {
        Self {
            time_discretization,
            number_of_factors,
            number_of_paths,
            seed,
            increments: OnceLock::new(),
        }
    }

    /// The seed this driver was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn table(&self) -> &Vec<Vec<RandomVariable>> {
        self.increments.get_or_init(|| self.generate())
    }

    fn generate(&self) -> Vec<Vec<RandomVariable>> {
        let steps = self.time_discretization.number_of_time_steps();
        let factors = self.number_of_factors;
        let paths = self.number_of_paths;

        let sqrt_dt: Vec<Time> = (0..steps)
            .map(|i| self.time_discretization.time_step(i).sqrt())
            .collect();

        // Path-outer draw order fixes the stream layout: changing the
        // number of paths changes every increment, changing the number of
        // time steps or factors only appends draws within each path.
        let mut rng = MersenneTwisterUniformRng::new(self.seed);
        let mut values = vec![vec![vec![0.0; paths]; factors]; steps];
        for path in 0..paths {
            for (i, row) in values.iter_mut().enumerate() {
                for factor_values in row.iter_mut() {
                    factor_values[path] = normal_inverse_cdf(rng.next_real()) * sqrt_dt[i];
                }
            }
        }

        values
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let time = self.time_discretization.time(i + 1);
                row.into_iter()
                    .map(|factor_values| RandomVariable::from_vec(time, factor_values))
                    .collect()
            })
            .collect()
    }
}

impl StochasticDriver for BrownianMotionLazyInit {
    fn time_discretization(&self) -> &TimeDiscretization {
        &self.time_discretization
    }

    fn number_of_factors(&self) -> usize {
        self.number_of_factors
    }

    fn number_of_paths(&self) -> usize {
        self.number_of_paths
    }

    fn increment(&self, time_index: usize, factor: usize) -> Result<RandomVariable> {
        let steps = self.time_discretization.number_of_time_steps();
        if time_index >= steps {
            return Err(Error::IndexOutOfRange {
                index: time_index,
                size: steps,
            });
        }
        if factor >= self.number_of_factors {
            return Err(Error::IndexOutOfRange {
                index: factor,
                size: self.number_of_factors,
            });
        }
        Ok(self.table()[time_index][factor].clone())
    }

    fn clone_with_modified_seed(&self, seed: u64) -> Arc<dyn StochasticDriver> {
        Arc::new(Self::new(
            self.time_discretization.clone(),
            self.number_of_factors,
            self.number_of_paths,
            seed,
        ))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> TimeDiscretization {
        TimeDiscretization::uniform(0.0, 10, 0.5).unwrap()
    }

    #[test]
    fn increments_have_zero_mean_and_dt_variance() {
        let driver = BrownianMotionLazyInit::new(grid(), 1, 100_000, 3141);
        let dw = driver.increment(0, 0).unwrap();
        assert_relative_eq!(dw.average(), 0.0, epsilon = 0.01);
        assert_relative_eq!(dw.variance(), 0.5, epsilon = 0.01);
    }

    #[test]
    fn factors_are_uncorrelated() {
        let driver = BrownianMotionLazyInit::new(grid(), 2, 100_000, 3141);
        let a = driver.increment(3, 0).unwrap();
        let b = driver.increment(3, 1).unwrap();
        let covariance = a.mult(&b).average() - a.average() * b.average();
        assert_relative_eq!(covariance, 0.0, epsilon = 0.01);
    }

    #[test]
    fn identical_configuration_reproduces_bit_identical_increments() {
        let a = BrownianMotionLazyInit::new(grid(), 2, 1_000, 1234);
        let b = BrownianMotionLazyInit::new(grid(), 2, 1_000, 1234);
        for time_index in 0..grid().number_of_time_steps() {
            for factor in 0..2 {
                let x = a.increment(time_index, factor).unwrap();
                let y = b.increment(time_index, factor).unwrap();
                for path in 0..1_000 {
                    assert_eq!(x.get(path).to_bits(), y.get(path).to_bits());
                }
            }
        }
    }

    #[test]
    fn repeated_queries_return_the_same_realizations() {
        let driver = BrownianMotionLazyInit::new(grid(), 1, 100, 7);
        let first = driver.increment(2, 0).unwrap();
        let second = driver.increment(2, 0).unwrap();
        for path in 0..100 {
            assert_eq!(first.get(path).to_bits(), second.get(path).to_bits());
        }
    }

    #[test]
    fn modified_seed_changes_the_draws() {
        let a = BrownianMotionLazyInit::new(grid(), 1, 100, 1);
        let b = a.clone_with_modified_seed(2);
        let x = a.increment(0, 0).unwrap();
        let y = b.increment(0, 0).unwrap();
        let differs = (0..100).any(|p| x.get(p) != y.get(p));
        assert!(differs);
    }

    #[test]
    fn increment_carries_the_step_end_time() {
        let driver = BrownianMotionLazyInit::new(grid(), 1, 10, 1);
        assert_relative_eq!(driver.increment(0, 0).unwrap().time(), 0.5);
        assert_relative_eq!(driver.increment(9, 0).unwrap().time(), 5.0);
    }

    #[test]
    fn out_of_range_indices_are_errors() {
        let driver = BrownianMotionLazyInit::new(grid(), 2, 10, 1);
        assert!(matches!(
            driver.increment(10, 0),
            Err(Error::IndexOutOfRange { index: 10, size: 10 })
        ));
        assert!(matches!(
            driver.increment(0, 2),
            Err(Error::IndexOutOfRange { index: 2, size: 2 })
        ));
    }
}

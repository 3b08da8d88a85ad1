//! The product-facing simulation surface.
//!
//! Products never see a model or a process directly; they price against the
//! narrow [`MonteCarloSimulation`] view (numéraire, weights, grid) plus the
//! term-structure observables of [`TermStructureMonteCarloSimulation`].

use crate::model::ShortRateModel;
use crate::process::EulerScheme;
use crate::StochasticDriver;
use irmc_core::{Real, Result, Time};
use irmc_math::RandomVariable;
use irmc_time::{TimeDiscretization, TimeIndexResult};
use std::sync::Arc;

/// The minimal surface a Monte Carlo valuation needs.
pub trait MonteCarloSimulation: Send + Sync {
    /// The simulation time grid.
    fn time_discretization(&self) -> &TimeDiscretization;

    /// The grid time at `time_index`.
    fn time(&self, time_index: usize) -> Time {
        self.time_discretization().time(time_index)
    }

    /// Locate `time` on the grid.
    fn time_index(&self, time: Time) -> TimeIndexResult {
        self.time_discretization().time_index(time)
    }

    /// The number of simulation paths.
    fn number_of_paths(&self) -> usize;

    /// The pathwise numéraire `N(time)`.
    fn numeraire(&self, time: Time) -> Result<RandomVariable>;

    /// The Monte Carlo weight of each path at `time_index`.
    fn monte_carlo_weights(&self, time_index: usize) -> Result<RandomVariable>;

    /// Lift a constant into the simulation's value space.
    fn random_variable_for_constant(&self, value: Real) -> RandomVariable {
        RandomVariable::constant(value)
    }
}

/// A simulation exposing term-structure observables.
pub trait TermStructureMonteCarloSimulation: MonteCarloSimulation {
    /// The time-`time` price of the zero-coupon bond maturing at
    /// `maturity`, pathwise.
    fn zero_coupon_bond(&self, time: Time, maturity: Time) -> Result<RandomVariable>;

    /// The forward rate observed at `time` for `[period_start, period_end]`.
    fn libor(&self, time: Time, period_start: Time, period_end: Time)
        -> Result<RandomVariable>;
}

/// A Monte Carlo simulation of a short-rate model: the model's observables
/// evaluated on an Euler-discretized path ensemble.
pub struct ShortRateMonteCarloSimulation {
    model: Arc<dyn ShortRateModel>,
    process: EulerScheme,
}

impl ShortRateMonteCarloSimulation {
    /// Simulate the given model over the given driver.
    pub fn new(model: Arc<dyn ShortRateModel>, driver: Arc<dyn StochasticDriver>) -> Self {
        let process = EulerScheme::new(model.clone(), driver);
        Self { model, process }
    }

    /// The model being simulated.
    pub fn model(&self) -> &Arc<dyn ShortRateModel> {
        &self.model
    }

    /// The underlying process.
    pub fn process(&self) -> &EulerScheme {
        &self.process
    }

    /// An otherwise identical simulation driven by a different seed.
    pub fn clone_with_modified_seed(&self, seed: u64) -> Self {
        Self::new(
            self.model.clone(),
            self.process.driver().clone_with_modified_seed(seed),
        )
    }
}

impl MonteCarloSimulation for ShortRateMonteCarloSimulation {
    fn time_discretization(&self) -> &TimeDiscretization {
        self.process.time_discretization()
    }

    fn number_of_paths(&self) -> usize {
        self.process.number_of_paths()
    }

    fn numeraire(&self, time: Time) -> Result<RandomVariable> {
        self.model.numeraire(&self.process, time)
    }

    fn monte_carlo_weights(&self, time_index: usize) -> Result<RandomVariable> {
        self.process.monte_carlo_weights(time_index)
    }
}

impl TermStructureMonteCarloSimulation for ShortRateMonteCarloSimulation {
    fn zero_coupon_bond(&self, time: Time, maturity: Time) -> Result<RandomVariable> {
        self.model.zero_coupon_bond(&self.process, time, maturity)
    }

    fn libor(
        &self,
        time: Time,
        period_start: Time,
        period_end: Time,
    ) -> Result<RandomVariable> {
        self.model.libor(&self.process, time, period_start, period_end)
    }
}

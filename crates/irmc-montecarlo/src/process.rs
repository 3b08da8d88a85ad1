//! The Euler process integrator.
//!
//! Steps a [`ProcessModel`] forward on the driver's time grid:
//!
//! ```text
//! X(tᵢ₊₁) = X(tᵢ) + µ(tᵢ)·Δtᵢ + λ(tᵢ)·ΔW(tᵢ)
//! ```
//!
//! The realized state is computed once, lazily, on first access, and is
//! immutable afterwards.  Every process instance carries a unique
//! generation id drawn from a global counter; caches keyed on simulated
//! state (e.g. a model's numéraire cache) store the id and discard their
//! contents when it changes.

use crate::brownian_motion::StochasticDriver;
use crate::model::ProcessModel;
use irmc_core::{Error, Real, Result, Time};
use irmc_math::RandomVariable;
use irmc_time::{TimeDiscretization, TimeIndexResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A log-free Euler discretization of a process model over a stochastic
/// driver.
pub struct EulerScheme {
    model: Arc<dyn ProcessModel>,
    driver: Arc<dyn StochasticDriver>,
    generation: u64,
    // states[time_index][component], filled on first access
    states: OnceLock<Result<Vec<Vec<RandomVariable>>>>,
}

impl EulerScheme {
    /// Create a process for the given model and driver.  Nothing is
    /// simulated until the first state query.
    pub fn new(model: Arc<dyn ProcessModel>, driver: Arc<dyn StochasticDriver>) -> Self {
        Self {
            model,
            driver,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            states: OnceLock::new(),
        }
    }

    /// The unique id of this process instance.  Two processes never share
    /// an id, including a process rebuilt with identical inputs.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The simulation time grid.
    pub fn time_discretization(&self) -> &TimeDiscretization {
        self.driver.time_discretization()
    }

    /// The grid time at `time_index`.
    pub fn time(&self, time_index: usize) -> Time {
        self.time_discretization().time(time_index)
    }

    /// Locate `time` on the grid.
    pub fn time_index(&self, time: Time) -> TimeIndexResult {
        self.time_discretization().time_index(time)
    }

    /// The number of simulation paths.
    pub fn number_of_paths(&self) -> usize {
        self.driver.number_of_paths()
    }

    /// The number of driving factors.
    pub fn number_of_factors(&self) -> usize {
        self.driver.number_of_factors()
    }

    /// The underlying driver.
    pub fn driver(&self) -> &Arc<dyn StochasticDriver> {
        &self.driver
    }

    /// The realized value of `component` at grid index `time_index`.
    pub fn process_value(&self, time_index: usize, component: usize) -> Result<RandomVariable> {
        let states = self.states()?;
        let state = states.get(time_index).ok_or(Error::IndexOutOfRange {
            index: time_index,
            size: states.len(),
        })?;
        state
            .get(component)
            .cloned()
            .ok_or(Error::IndexOutOfRange {
                index: component,
                size: state.len(),
            })
    }

    /// The Monte Carlo weight of each path at `time_index`.  Paths are
    /// equally weighted, so this is the constant `1/paths`.
    pub fn monte_carlo_weights(&self, time_index: usize) -> Result<RandomVariable> {
        let size = self.time_discretization().number_of_times();
        if time_index >= size {
            return Err(Error::IndexOutOfRange {
                index: time_index,
                size,
            });
        }
        Ok(RandomVariable::constant(
            1.0 / self.number_of_paths() as Real,
        ))
    }

    fn states(&self) -> Result<&Vec<Vec<RandomVariable>>> {
        self.states
            .get_or_init(|| self.compute_states())
            .as_ref()
            .map_err(Error::clone)
    }

    fn compute_states(&self) -> Result<Vec<Vec<RandomVariable>>> {
        let grid = self.time_discretization();
        let components = self.model.number_of_components();
        let factors = self.model.number_of_factors();

        let mut states = Vec::with_capacity(grid.number_of_times());
        states.push(self.model.initial_state(self)?);

        for time_index in 0..grid.number_of_time_steps() {
            let dt = grid.time_step(time_index);
            let current = &states[time_index];
            let drift = self.model.drift(self, time_index, current)?;

            let mut next = Vec::with_capacity(components);
            for component in 0..components {
                let loading =
                    self.model
                        .factor_loading(self, time_index, component, current)?;
                let mut value = current[component].add(&drift[component].mult_scalar(dt));
                for (factor, lambda) in loading.iter().enumerate().take(factors) {
                    let dw = self.driver.increment(time_index, factor)?;
                    value = value.add(&lambda.mult(&dw));
                }
                next.push(value);
            }
            states.push(next);
        }
        Ok(states)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brownian_motion::BrownianMotionLazyInit;
    use approx::assert_relative_eq;

    /// dX = µ dt + σ dW with constant coefficients.
    struct ArithmeticBrownianMotion {
        initial_value: Real,
        mu: Real,
        sigma: Real,
    }

    impl ProcessModel for ArithmeticBrownianMotion {
        fn number_of_components(&self) -> usize {
            1
        }

        fn number_of_factors(&self) -> usize {
            1
        }

        fn initial_state(&self, _process: &EulerScheme) -> Result<Vec<RandomVariable>> {
            Ok(vec![RandomVariable::constant(self.initial_value)])
        }

        fn drift(
            &self,
            _process: &EulerScheme,
            _time_index: usize,
            _realization: &[RandomVariable],
        ) -> Result<Vec<RandomVariable>> {
            Ok(vec![RandomVariable::constant(self.mu)])
        }

        fn factor_loading(
            &self,
            _process: &EulerScheme,
            _time_index: usize,
            _component: usize,
            _realization: &[RandomVariable],
        ) -> Result<Vec<RandomVariable>> {
            Ok(vec![RandomVariable::constant(self.sigma)])
        }
    }

    fn process(paths: usize, seed: u64) -> EulerScheme {
        let grid = TimeDiscretization::uniform(0.0, 20, 0.25).unwrap();
        let driver = Arc::new(BrownianMotionLazyInit::new(grid, 1, paths, seed));
        let model = Arc::new(ArithmeticBrownianMotion {
            initial_value: 0.02,
            mu: 0.01,
            sigma: 0.1,
        });
        EulerScheme::new(model, driver)
    }

    #[test]
    fn initial_state_is_returned_at_index_zero() {
        let p = process(100, 1);
        let x0 = p.process_value(0, 0).unwrap();
        assert!(x0.is_deterministic());
        assert_relative_eq!(x0.get(0), 0.02);
    }

    #[test]
    fn mean_and_variance_match_the_dynamics() {
        let p = process(200_000, 31415);
        // X(5) ~ N(x0 + µ·5, σ²·5)
        let x = p.process_value(20, 0).unwrap();
        assert_relative_eq!(x.average(), 0.02 + 0.01 * 5.0, epsilon = 2e-3);
        assert_relative_eq!(x.variance(), 0.1 * 0.1 * 5.0, epsilon = 2e-3);
    }

    #[test]
    fn weights_are_the_constant_reciprocal_path_count() {
        let p = process(400, 1);
        let w = p.monte_carlo_weights(5).unwrap();
        assert!(w.is_deterministic());
        assert_relative_eq!(w.get(0), 1.0 / 400.0);
        assert!(p.monte_carlo_weights(21).is_err());
    }

    #[test]
    fn generations_are_unique() {
        let a = process(10, 1);
        let b = process(10, 1);
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    fn out_of_range_queries_are_errors() {
        let p = process(10, 1);
        assert!(matches!(
            p.process_value(999, 0),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            p.process_value(0, 1),
            Err(Error::IndexOutOfRange { .. })
        ));
    }
}

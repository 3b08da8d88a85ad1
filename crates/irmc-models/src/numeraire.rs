//! The shared numéraire accumulation and cache of the short-rate models.
//!
//! The numéraire under the simulated measure is
//! `N(tᵢ) = exp(Σ_{j<i} r(tⱼ)·Δtⱼ)`, accumulated once per grid point and
//! cached.  The cache stores the generation id of the process it was
//! filled from; a query from a different process clears and repopulates
//! it, so a stale ensemble can never leak into a valuation.

use irmc_core::{fail, Result, Time};
use irmc_curves::DiscountCurve;
use irmc_math::RandomVariable;
use irmc_montecarlo::EulerScheme;
use irmc_time::TimeIndexResult;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CacheState {
    generation: u64,
    values: HashMap<usize, RandomVariable>,
}

/// A per-model numéraire cache keyed by grid index.
pub(crate) struct NumeraireCache {
    state: Mutex<CacheState>,
}

impl NumeraireCache {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
        }
    }

    /// The pathwise numéraire at `time`, with the deterministic adjustment
    /// to `discount_curve` applied when one is given.
    ///
    /// Off-grid times are bridged from the preceding grid point with a
    /// piecewise-constant short rate over the gap.
    pub(crate) fn numeraire(
        &self,
        process: &EulerScheme,
        time: Time,
        discount_curve: Option<&Arc<dyn DiscountCurve>>,
    ) -> Result<RandomVariable> {
        if time == process.time(0) {
            return Ok(RandomVariable::constant(1.0));
        }

        let preceding = match process.time_index(time) {
            TimeIndexResult::Exact(time_index) => {
                return self.numeraire_on_grid(process, time, time_index, discount_curve);
            }
            TimeIndexResult::Before => {
                fail!(
                    "numeraire requested at {time}, before the first simulation time {}",
                    process.time(0)
                );
            }
            TimeIndexResult::Within { preceding } => preceding,
            TimeIndexResult::After { last } => last,
        };

        // Bridge from the preceding grid point with the short rate held
        // constant over the gap.
        let previous_time = process.time(preceding);
        let rate = process.process_value(preceding, 0)?;
        let integrated_rate = rate.mult_scalar(time - previous_time);
        Ok(self
            .numeraire(process, previous_time, discount_curve)?
            .mult(&integrated_rate.exp()))
    }

    fn numeraire_on_grid(
        &self,
        process: &EulerScheme,
        time: Time,
        time_index: usize,
        discount_curve: Option<&Arc<dyn DiscountCurve>>,
    ) -> Result<RandomVariable> {
        let mut state = self.state.lock().map_err(|_| {
            irmc_core::Error::Calculation("numeraire cache lock poisoned".into())
        })?;
        if state.generation != process.generation() {
            state.values.clear();
            state.generation = process.generation();
        }

        let mut numeraire = match state.values.get(&time_index) {
            Some(cached) => cached.clone(),
            None => {
                let grid = process.time_discretization();
                let mut integrated_rate = RandomVariable::constant(0.0);
                let mut numeraire = RandomVariable::constant(1.0);
                for i in 0..time_index {
                    let rate = process.process_value(i, 0)?;
                    integrated_rate = integrated_rate.add_product(&rate, grid.time_step(i));
                    numeraire = integrated_rate.exp();
                    state.values.insert(i + 1, numeraire.clone());
                }
                numeraire
            }
        };
        drop(state);

        // Deterministic adjustment: matches E[1/N(t)] to the discount
        // curve, so zero bonds reprice exactly.
        if let Some(curve) = discount_curve {
            let adjustment = numeraire.invert().average() / curve.discount_factor(time)?;
            numeraire = numeraire.mult_scalar(adjustment);
        }

        Ok(numeraire)
    }
}

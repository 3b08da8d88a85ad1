//! Model capability traits consumed by the Euler integrator.
//!
//! A process model supplies the local dynamics (initial state, drift and
//! factor loadings per time step); the integrator owns the realized state
//! and passes it back into the model on every step.  The model never holds
//! a reference to the process, which keeps the model ↔ process relationship
//! acyclic: a model instance can serve any number of processes.

use crate::process::EulerScheme;
use irmc_math::RandomVariable;
use irmc_core::{ensure, Result, Time};

/// The local dynamics of a simulated Markov process.
///
/// During stepping the model must read the state only through the
/// `realization` argument, never back through `process` (whose state is
/// still being built at that point).  The `process` argument carries the
/// time grid and path/factor configuration.
pub trait ProcessModel: Send + Sync {
    /// The number of simulated components.
    fn number_of_components(&self) -> usize;

    /// The number of driving Brownian factors.
    fn number_of_factors(&self) -> usize;

    /// The state at the first grid time, one value per component.
    fn initial_state(&self, process: &EulerScheme) -> Result<Vec<RandomVariable>>;

    /// The drift µ(tᵢ) of every component, given the realized state at tᵢ.
    fn drift(
        &self,
        process: &EulerScheme,
        time_index: usize,
        realization: &[RandomVariable],
    ) -> Result<Vec<RandomVariable>>;

    /// The factor loading λ(tᵢ) of the given component onto every factor,
    /// given the realized state at tᵢ.
    fn factor_loading(
        &self,
        process: &EulerScheme,
        time_index: usize,
        component: usize,
        realization: &[RandomVariable],
    ) -> Result<Vec<RandomVariable>>;
}

/// A short-rate model: a [`ProcessModel`] whose single component is the
/// short rate, with closed-form observables on top of the simulated paths.
pub trait ShortRateModel: ProcessModel {
    /// The numéraire `N(t)` under the simulated measure, pathwise,
    /// including any deterministic adjustment to the model's discount
    /// curve.
    fn numeraire(&self, process: &EulerScheme, time: Time) -> Result<RandomVariable>;

    /// The time-`t` price of the zero-coupon bond maturing at `maturity`,
    /// pathwise, from the model's closed-form bond formula.
    fn zero_coupon_bond(
        &self,
        process: &EulerScheme,
        time: Time,
        maturity: Time,
    ) -> Result<RandomVariable>;

    /// The forward rate observed at `time` for accrual over
    /// `[period_start, period_end]`:
    /// `(P(time, start)/P(time, end) − 1) / (end − start)`.
    fn libor(
        &self,
        process: &EulerScheme,
        time: Time,
        period_start: Time,
        period_end: Time,
    ) -> Result<RandomVariable> {
        ensure!(
            period_end > period_start,
            "period end ({period_end}) must be after period start ({period_start})"
        );
        let bond_start = self.zero_coupon_bond(process, time, period_start)?;
        let bond_end = self.zero_coupon_bond(process, time, period_end)?;
        Ok(bond_start
            .div(&bond_end)
            .sub_scalar(1.0)
            .div_scalar(period_end - period_start))
    }
}

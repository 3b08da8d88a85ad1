//! The Bermudan swaption.
//!
//! A schedule of swap periods, a subset of whose start dates carry an
//! exercise right.  Valuation walks the schedule backwards, accumulating
//! the discounted payoffs, and at every exercise date compares continuing
//! against exercising.  The exercise decision must not peek into the
//! future, so the trigger (continuation minus exercise value) is replaced
//! by its regression-based conditional expectation before the comparison;
//! the pathwise cashflows themselves stay untouched, keeping the
//! estimator unbiased up to the regression error.

use crate::product::MonteCarloProduct;
use irmc_core::{ensure, Rate, Real, Result, Time};
use irmc_math::{ConditionalExpectationRegression, RandomVariable};
use irmc_montecarlo::TermStructureMonteCarloSimulation;

/// The labeled outcome of a Bermudan valuation.
pub struct BermudanSwaptionValues {
    /// The pathwise value, discounted to the evaluation time.  The price
    /// is its average.
    pub value: RandomVariable,
    /// The Monte Carlo standard error of the price.
    pub error: Real,
    /// The exercise time per path; `+∞` on paths that never exercise.
    pub exercise_time: RandomVariable,
}

/// A Bermudan swaption over an explicit swap schedule.
///
/// `is_callable` selects the payoff convention: the right to *enter* the
/// remaining swap (callable), or a running swap with the right to
/// *terminate* it (cancelable).
pub struct BermudanSwaption {
    is_exercise_date: Vec<bool>,
    fixing_dates: Vec<Time>,
    period_lengths: Vec<Time>,
    payment_dates: Vec<Time>,
    notionals: Vec<Real>,
    swap_rates: Vec<Rate>,
    is_callable: bool,
}

impl BermudanSwaption {
    /// Create a Bermudan swaption from parallel schedule vectors.
    ///
    /// All vectors must have the same non-zero length; fixing dates must
    /// be non-decreasing and each payment date must not precede its
    /// fixing date.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        is_exercise_date: Vec<bool>,
        fixing_dates: Vec<Time>,
        period_lengths: Vec<Time>,
        payment_dates: Vec<Time>,
        notionals: Vec<Real>,
        swap_rates: Vec<Rate>,
        is_callable: bool,
    ) -> Result<Self> {
        let n = fixing_dates.len();
        ensure!(n > 0, "the swap schedule must contain at least one period");
        for (name, len) in [
            ("exercise flags", is_exercise_date.len()),
            ("period lengths", period_lengths.len()),
            ("payment dates", payment_dates.len()),
            ("notionals", notionals.len()),
            ("swap rates", swap_rates.len()),
        ] {
            ensure!(
                len == n,
                "{name} length ({len}) must match the number of fixing dates ({n})"
            );
        }
        for w in fixing_dates.windows(2) {
            ensure!(
                w[1] >= w[0],
                "fixing dates must be non-decreasing, got {} before {}",
                w[0],
                w[1]
            );
        }
        for (i, (&fixing, &payment)) in fixing_dates.iter().zip(&payment_dates).enumerate() {
            ensure!(
                payment >= fixing,
                "payment date ({payment}) precedes fixing date ({fixing}) in period {i}"
            );
        }
        Ok(Self {
            is_exercise_date,
            fixing_dates,
            period_lengths,
            payment_dates,
            notionals,
            swap_rates,
            is_callable,
        })
    }

    /// The pathwise value plus standard error and exercise-time
    /// distribution.
    pub fn values(
        &self,
        evaluation_time: Time,
        simulation: &dyn TermStructureMonteCarloSimulation,
    ) -> Result<BermudanSwaptionValues> {
        // After the last period the product is worth zero.
        let mut values = simulation.random_variable_for_constant(0.0);
        let mut values_underlying = simulation.random_variable_for_constant(0.0);
        let mut exercise_time = simulation.random_variable_for_constant(Real::INFINITY);

        for period in (0..self.fixing_dates.len()).rev() {
            let fixing_date = self.fixing_dates[period];
            let period_length = self.period_lengths[period];
            let payment_date = self.payment_dates[period];
            let notional = self.notionals[period];
            let swap_rate = self.swap_rates[period];

            // The floating rate fixing in this period, observed at its
            // fixing date.
            let libor =
                simulation.libor(fixing_date, fixing_date, fixing_date + period_length)?;
            let payoff = libor
                .sub_scalar(swap_rate)
                .mult_scalar(period_length)
                .mult_scalar(notional);

            let numeraire = simulation.numeraire(payment_date)?;
            let weights = simulation
                .monte_carlo_weights(simulation.time_index(payment_date).clamped())?;
            let payoff = payoff.div(&numeraire).mult(&weights);

            if self.is_callable {
                values_underlying = values_underlying.add(&payoff);
            } else {
                values = values.add(&payoff);
            }

            if self.is_exercise_date[period] {
                let trigger_discounted = values.sub(&values_underlying);

                // Remove foresight: regress the trigger onto time-t
                // observables.  No numeraire division is needed, the
                // accumulated values are already relative prices.
                let regression =
                    ConditionalExpectationRegression::new(self.basis_functions(fixing_date, simulation)?)?;
                let trigger = regression.conditional_expectation(&trigger_discounted)?;

                values = trigger.choose(&values, &values_underlying);
                exercise_time = trigger.choose(
                    &exercise_time,
                    &RandomVariable::constant_at(fixing_date, fixing_date),
                );
            }
        }

        // Undo the weighting and express the relative price in units of
        // the evaluation-time numeraire.
        let numeraire_at_evaluation = simulation.numeraire(evaluation_time)?;
        let weights_at_evaluation = simulation
            .monte_carlo_weights(simulation.time_index(evaluation_time).clamped())?;
        let values = values
            .mult(&numeraire_at_evaluation)
            .div(&weights_at_evaluation);

        Ok(BermudanSwaptionValues {
            error: values.standard_error(),
            value: values,
            exercise_time,
        })
    }

    /// The regression basis at `fixing_date`: a constant, the discount
    /// factor over the current period and its square, the discount factor
    /// to the final maturity and its square, and the inverse numeraire.
    fn basis_functions(
        &self,
        fixing_date: Time,
        simulation: &dyn TermStructureMonteCarloSimulation,
    ) -> Result<Vec<RandomVariable>> {
        let mut basis = Vec::with_capacity(6);
        basis.push(RandomVariable::constant(1.0));

        // Index of the period whose fixing date is at or next after the
        // conditioning time, clamped to the schedule.
        let index = self
            .fixing_dates
            .partition_point(|&t| t < fixing_date)
            .min(self.fixing_dates.len() - 1);

        // Discounting over the current period.
        let rate_short =
            simulation.libor(fixing_date, fixing_date, self.payment_dates[index])?;
        let discount_short = rate_short
            .mult_scalar(self.payment_dates[index] - fixing_date)
            .add_scalar(1.0)
            .invert();
        basis.push(discount_short.clone());
        basis.push(discount_short.pow(2.0));

        // Discounting to the end of the product.
        let final_maturity = self.final_maturity();
        let rate_long =
            simulation.libor(fixing_date, self.fixing_dates[index], final_maturity)?;
        let discount_long = rate_long
            .mult_scalar(final_maturity - self.fixing_dates[index])
            .add_scalar(1.0)
            .invert();
        basis.push(discount_long.clone());
        basis.push(discount_long.pow(2.0));

        basis.push(simulation.numeraire(fixing_date)?.invert());

        Ok(basis)
    }

    /// The fixing dates carrying an exercise right.
    pub fn exercise_times(&self) -> Vec<Time> {
        self.fixing_dates
            .iter()
            .zip(&self.is_exercise_date)
            .filter(|(_, &is_exercise)| is_exercise)
            .map(|(&t, _)| t)
            .collect()
    }

    /// The fixing dates at or after `evaluation_time`.
    pub fn remaining_fixing_dates(&self, evaluation_time: Time) -> Vec<Time> {
        self.fixing_dates
            .iter()
            .copied()
            .filter(|&t| t >= evaluation_time)
            .collect()
    }

    /// The last payment date of the schedule.
    pub fn final_maturity(&self) -> Time {
        *self
            .payment_dates
            .last()
            .expect("schedule is validated non-empty")
    }

    /// The payment dates.
    pub fn payment_dates(&self) -> &[Time] {
        &self.payment_dates
    }

    /// The period notionals.
    pub fn notionals(&self) -> &[Real] {
        &self.notionals
    }

    /// The period swap rates (strikes).
    pub fn swap_rates(&self) -> &[Rate] {
        &self.swap_rates
    }

    /// The period lengths.
    pub fn period_lengths(&self) -> &[Time] {
        &self.period_lengths
    }

    /// Whether the product is callable (right to enter) rather than
    /// cancelable (right to terminate).
    pub fn is_callable(&self) -> bool {
        self.is_callable
    }
}

impl MonteCarloProduct for BermudanSwaption {
    fn value(
        &self,
        evaluation_time: Time,
        simulation: &dyn TermStructureMonteCarloSimulation,
    ) -> Result<RandomVariable> {
        Ok(self.values(evaluation_time, simulation)?.value)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

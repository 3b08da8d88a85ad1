//! The product valuation trait.

use irmc_core::{Result, Time};
use irmc_math::RandomVariable;
use irmc_montecarlo::TermStructureMonteCarloSimulation;

/// A product that can be valued against a term-structure Monte Carlo
/// simulation.
pub trait MonteCarloProduct {
    /// The pathwise value of the product, discounted to `evaluation_time`.
    ///
    /// Cashflows prior to `evaluation_time` are not considered.  The
    /// price is the average of the returned realization.
    fn value(
        &self,
        evaluation_time: Time,
        simulation: &dyn TermStructureMonteCarloSimulation,
    ) -> Result<RandomVariable>;
}

//! The piecewise-constant forward-rate volatility structure.
//!
//! The instantaneous volatility of the forward rate fixing at `Tⱼ`,
//! observed at simulation time `t`, is constant on the cells of a
//! (simulation time × time to maturity) lattice.  Cells whose simulation
//! time plus time to maturity exceeds the longest tenor can never be
//! observed and carry no parameter; the remaining cells are numbered
//! row by row into a flat parameter vector.

use irmc_core::{Error, Rate, Result, Size, Time, Volatility};
use irmc_time::TimeDiscretization;
use std::collections::HashMap;

/// Piecewise-constant forward-rate volatility on a
/// (simulation time × time to maturity) lattice.
#[derive(Debug, Clone)]
pub struct LiborVolatilityPiecewiseConstant {
    tenor_discretization: TimeDiscretization,
    simulation_time_discretization: TimeDiscretization,
    time_to_maturity_discretization: TimeDiscretization,
    // (simulation time index, time-to-maturity index) -> parameter index
    index_map: HashMap<(usize, usize), usize>,
    volatility: Vec<Volatility>,
}

impl LiborVolatilityPiecewiseConstant {
    /// Create a structure over the given lattices.
    ///
    /// `volatility` must hold either a single value, broadcast to every
    /// included cell, or exactly one value per included cell.
    pub fn new(
        tenor_discretization: TimeDiscretization,
        simulation_time_discretization: TimeDiscretization,
        time_to_maturity_discretization: TimeDiscretization,
        volatility: Vec<Volatility>,
    ) -> Result<Self> {
        let max_maturity = tenor_discretization.last_time();

        let mut index_map = HashMap::new();
        let mut parameter_count = 0;
        for simulation_time in 0..simulation_time_discretization.number_of_times() {
            for time_to_maturity in 0..time_to_maturity_discretization.number_of_times() {
                if simulation_time_discretization.time(simulation_time)
                    + time_to_maturity_discretization.time(time_to_maturity)
                    > max_maturity
                {
                    continue;
                }
                index_map.insert((simulation_time, time_to_maturity), parameter_count);
                parameter_count += 1;
            }
        }

        let volatility = if volatility.len() == 1 {
            vec![volatility[0]; parameter_count]
        } else if volatility.len() == parameter_count {
            volatility
        } else {
            return Err(Error::Precondition(format!(
                "volatility vector length ({}) does not match the number of free parameters ({parameter_count})",
                volatility.len()
            )));
        };

        Ok(Self {
            tenor_discretization,
            simulation_time_discretization,
            time_to_maturity_discretization,
            index_map,
            volatility,
        })
    }

    /// The number of free parameters (included lattice cells).
    pub fn number_of_parameters(&self) -> Size {
        self.volatility.len()
    }

    /// The flat parameter vector.
    pub fn parameters(&self) -> &[Volatility] {
        &self.volatility
    }

    /// An otherwise identical structure with a new parameter vector.
    pub fn clone_with_modified_parameter(&self, volatility: Vec<Volatility>) -> Result<Self> {
        Self::new(
            self.tenor_discretization.clone(),
            self.simulation_time_discretization.clone(),
            self.time_to_maturity_discretization.clone(),
            volatility,
        )
    }

    /// The simulation-time lattice.
    pub fn simulation_time_discretization(&self) -> &TimeDiscretization {
        &self.simulation_time_discretization
    }

    /// The time-to-maturity lattice.
    pub fn time_to_maturity_discretization(&self) -> &TimeDiscretization {
        &self.time_to_maturity_discretization
    }

    /// The volatility of the forward rate fixing at `maturity`, observed
    /// at simulation time `time`.
    ///
    /// An already-fixed forward (`maturity <= time`) has zero volatility.
    /// Lattice lookups snap down to the cell containing the point and
    /// clamp at both ends, so the structure extrapolates flat.
    pub fn volatility(&self, time: Time, maturity: Time) -> Result<Volatility> {
        let time_to_maturity = maturity - time;
        if time_to_maturity <= 0.0 {
            return Ok(0.0);
        }

        let simulation_index = self.simulation_time_discretization.time_index(time).clamped();
        let maturity_index = self
            .time_to_maturity_discretization
            .time_index(time_to_maturity)
            .clamped();

        let parameter_index = self
            .index_map
            .get(&(simulation_index, maturity_index))
            .ok_or_else(|| {
                Error::Calculation(format!(
                    "no volatility cell for simulation time {time} and time to maturity {time_to_maturity} (beyond the longest tenor)"
                ))
            })?;
        Ok(self.volatility[*parameter_index])
    }

    /// Convenience lookup by tenor index: the volatility of the forward
    /// over the tenor period starting at `tenor_index`, observed at `time`.
    pub fn volatility_for_tenor(&self, time: Time, tenor_index: usize) -> Result<Rate> {
        let size = self.tenor_discretization.number_of_times();
        if tenor_index >= size {
            return Err(Error::IndexOutOfRange {
                index: tenor_index,
                size,
            });
        }
        self.volatility(time, self.tenor_discretization.time(tenor_index))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

//! Short-rate volatility structures.
//!
//! A short-rate model with time-dependent coefficients reads its mean
//! reversion speed `a(t)` and instantaneous volatility `σ(t)` from an
//! object implementing [`ShortRateVolatilityModel`]; both are piecewise
//! constant on the structure's own time grid.

use irmc_core::{ensure, Real, Result, Volatility};
use irmc_time::TimeDiscretization;

/// Mean reversion speed and instantaneous short-rate volatility, both
/// piecewise constant on a common time grid.
pub trait ShortRateVolatilityModel: Send + Sync {
    /// The grid the coefficients are constant between.
    fn time_discretization(&self) -> &TimeDiscretization;

    /// The volatility σ on the interval starting at grid point `time_index`.
    fn volatility(&self, time_index: usize) -> Volatility;

    /// The mean reversion a on the interval starting at grid point
    /// `time_index`.
    fn mean_reversion(&self, time_index: usize) -> Real;
}

/// A [`ShortRateVolatilityModel`] given by explicit per-interval values.
#[derive(Debug, Clone)]
pub struct PiecewiseConstantShortRateVolatility {
    time_discretization: TimeDiscretization,
    volatility: Vec<Volatility>,
    mean_reversion: Vec<Real>,
}

impl PiecewiseConstantShortRateVolatility {
    /// Create a structure from per-grid-point coefficient vectors.
    ///
    /// Both vectors must have one entry per grid point.  Volatilities must
    /// be non-negative; mean reversions must be non-zero, since the model
    /// formulas divide by them.
    pub fn new(
        time_discretization: TimeDiscretization,
        mean_reversion: Vec<Real>,
        volatility: Vec<Volatility>,
    ) -> Result<Self> {
        let n = time_discretization.number_of_times();
        ensure!(
            mean_reversion.len() == n,
            "mean reversion vector length ({}) must match the number of grid points ({n})",
            mean_reversion.len()
        );
        ensure!(
            volatility.len() == n,
            "volatility vector length ({}) must match the number of grid points ({n})",
            volatility.len()
        );
        for (i, &sigma) in volatility.iter().enumerate() {
            ensure!(
                sigma >= 0.0,
                "volatility must be non-negative, got {sigma} at index {i}"
            );
        }
        for (i, &a) in mean_reversion.iter().enumerate() {
            ensure!(
                a != 0.0,
                "mean reversion must be non-zero (it is used as a divisor), index {i}"
            );
        }
        Ok(Self {
            time_discretization,
            volatility,
            mean_reversion,
        })
    }
}

impl ShortRateVolatilityModel for PiecewiseConstantShortRateVolatility {
    fn time_discretization(&self) -> &TimeDiscretization {
        &self.time_discretization
    }

    fn volatility(&self, time_index: usize) -> Volatility {
        self.volatility[time_index]
    }

    fn mean_reversion(&self, time_index: usize) -> Real {
        self.mean_reversion[time_index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_validates_lengths_and_signs() {
        let grid = TimeDiscretization::new(vec![0.0, 1.0, 2.0]).unwrap();
        assert!(PiecewiseConstantShortRateVolatility::new(
            grid.clone(),
            vec![0.1; 3],
            vec![0.01; 3]
        )
        .is_ok());
        assert!(PiecewiseConstantShortRateVolatility::new(
            grid.clone(),
            vec![0.1; 2],
            vec![0.01; 3]
        )
        .is_err());
        assert!(PiecewiseConstantShortRateVolatility::new(
            grid.clone(),
            vec![0.1; 3],
            vec![-0.01; 3]
        )
        .is_err());
        assert!(
            PiecewiseConstantShortRateVolatility::new(grid, vec![0.0; 3], vec![0.01; 3]).is_err()
        );
    }

    #[test]
    fn coefficients_are_read_per_interval() {
        let grid = TimeDiscretization::new(vec![0.0, 1.0, 2.0]).unwrap();
        let model = PiecewiseConstantShortRateVolatility::new(
            grid,
            vec![0.1, 0.2, 0.3],
            vec![0.01, 0.02, 0.03],
        )
        .unwrap();
        assert_eq!(model.mean_reversion(1), 0.2);
        assert_eq!(model.volatility(2), 0.03);
    }
}

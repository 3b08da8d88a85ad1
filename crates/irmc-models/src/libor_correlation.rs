//! The three-parameter exponential-decay forward-rate correlation model.
//!
//! Instantaneous correlation between the forwards over tenor periods
//! starting at `Tᵢ` and `Tⱼ`:
//!
//! ```text
//! ρ̃ᵢⱼ = b + (1 − b)·exp(−a·|Tᵢ − Tⱼ| − c·max(Tᵢ, Tⱼ))
//! ```
//!
//! The matrix is factor-reduced to `number_of_factors` Brownian drivers;
//! the model then reports the factor loadings and the correlation implied
//! by them (exact only when no reduction takes place).  Both matrices are
//! computed once, lazily.

use irmc_core::{ensure, Real, Result, Size};
use irmc_math::linear_algebra::{correlation_from_factors, factor_reduction};
use irmc_time::TimeDiscretization;
use nalgebra::DMatrix;
use std::sync::OnceLock;

/// Time-homogeneous exponential-decay correlation with factor reduction.
pub struct LiborCorrelationThreeParameterExponentialDecay {
    tenor_discretization: TimeDiscretization,
    number_of_factors: Size,
    a: Real,
    b: Real,
    c: Real,
    // (factor loadings, reduced correlation), computed on first access
    matrices: OnceLock<(DMatrix<Real>, DMatrix<Real>)>,
}

impl LiborCorrelationThreeParameterExponentialDecay {
    /// Create a correlation model over the forwards of
    /// `tenor_discretization` (one component per tenor period).
    ///
    /// Out-of-range parameters are clamped at evaluation: `a ≥ 0`,
    /// `0 ≤ b ≤ 1`, `c ≥ 0`.
    pub fn new(
        tenor_discretization: TimeDiscretization,
        number_of_factors: Size,
        a: Real,
        b: Real,
        c: Real,
    ) -> Result<Self> {
        let components = tenor_discretization.number_of_time_steps();
        ensure!(
            components > 0,
            "the tenor discretization must contain at least one period"
        );
        ensure!(
            (1..=components).contains(&number_of_factors),
            "number of factors ({number_of_factors}) must be in 1..={components}"
        );
        Ok(Self {
            tenor_discretization,
            number_of_factors,
            a,
            b,
            c,
            matrices: OnceLock::new(),
        })
    }

    /// The number of correlated components (tenor periods).
    pub fn number_of_components(&self) -> Size {
        self.tenor_discretization.number_of_time_steps()
    }

    /// The number of Brownian factors after reduction.
    pub fn number_of_factors(&self) -> Size {
        self.number_of_factors
    }

    /// The model parameters (a, b, c), unclamped.
    pub fn parameters(&self) -> (Real, Real, Real) {
        (self.a, self.b, self.c)
    }

    /// An otherwise identical model with new parameters.
    pub fn clone_with_modified_parameter(&self, a: Real, b: Real, c: Real) -> Result<Self> {
        Self::new(
            self.tenor_discretization.clone(),
            self.number_of_factors,
            a,
            b,
            c,
        )
    }

    fn matrices(&self) -> &(DMatrix<Real>, DMatrix<Real>) {
        self.matrices.get_or_init(|| {
            let a = self.a.max(0.0);
            let b = self.b.clamp(0.0, 1.0);
            let c = self.c.max(0.0);

            let n = self.number_of_components();
            let full = DMatrix::from_fn(n, n, |row, col| {
                if row == col {
                    return 1.0;
                }
                let t1 = self.tenor_discretization.time(row);
                let t2 = self.tenor_discretization.time(col);
                b + (1.0 - b) * (-a * (t1 - t2).abs() - c * t1.max(t2)).exp()
            });

            // number_of_factors was validated at construction, so the
            // reduction cannot fail.
            let factors = factor_reduction(&full, self.number_of_factors)
                .unwrap_or_else(|_| DMatrix::identity(n, self.number_of_factors));
            let reduced = correlation_from_factors(&factors);
            (factors, reduced)
        })
    }

    /// The loading of `component` onto `factor` after reduction.
    pub fn factor_loading(&self, component: usize, factor: usize) -> Real {
        self.matrices().0[(component, factor)]
    }

    /// The correlation between two components implied by the reduced
    /// factor loadings.
    pub fn correlation(&self, component1: usize, component2: usize) -> Real {
        self.matrices().1[(component1, component2)]
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

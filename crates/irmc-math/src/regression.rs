//! Least-squares estimation of conditional expectations.
//!
//! The early-exercise engine needs, at each exercise date, a foresight-free
//! estimate of `E[value | F_t]` per path.  The estimator regresses the
//! realized value onto a set of basis functions evaluated at the
//! conditioning time and returns the fitted values: the projection of the
//! value onto the sigma-algebra generated by the basis.
//!
//! The fit is solved via SVD with small singular values thresholded, so a
//! (nearly) collinear basis degrades gracefully instead of blowing up.

use crate::random_variable::RandomVariable;
use irmc_core::{ensure, Error, Real, Result};
use nalgebra::{DMatrix, DVector};

/// A conditional-expectation estimator backed by linear regression on
/// pathwise basis functions.
///
/// Lifecycle: built per conditioning time from freshly evaluated basis
/// functions, used once, discarded.
pub struct ConditionalExpectationRegression {
    basis: Vec<RandomVariable>,
}

impl ConditionalExpectationRegression {
    /// Create an estimator from the given basis functions.
    pub fn new(basis: Vec<RandomVariable>) -> Result<Self> {
        ensure!(!basis.is_empty(), "regression basis must not be empty");
        Ok(Self { basis })
    }

    /// Number of basis functions.
    pub fn number_of_basis_functions(&self) -> usize {
        self.basis.len()
    }

    /// The pathwise conditional expectation of `value` given the basis.
    ///
    /// Fits `value ≈ Σ βⱼ φⱼ` across paths and returns the fitted values.
    /// A deterministic `value` is its own conditional expectation.
    pub fn conditional_expectation(&self, value: &RandomVariable) -> Result<RandomVariable> {
        let paths = value
            .path_count()
            .or_else(|| self.basis.iter().filter_map(|b| b.path_count()).max());
        let Some(n) = paths else {
            // Everything is deterministic; the projection is the identity.
            return Ok(value.clone());
        };
        let m = self.basis.len();
        ensure!(
            n >= m,
            "regression needs at least as many paths ({n}) as basis functions ({m})"
        );
        for b in &self.basis {
            if let Some(k) = b.path_count() {
                ensure!(
                    k == n,
                    "basis path count ({k}) does not match value path count ({n})"
                );
            }
        }

        let design = DMatrix::from_fn(n, m, |i, j| self.basis[j].get(i));
        let y = DVector::from_fn(n, |i, _| value.get(i));

        let svd = design.clone().svd(true, true);
        let sv_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
        let threshold = n.max(m) as Real * f64::EPSILON * sv_max;
        let beta = svd
            .solve(&y, threshold)
            .map_err(|e| Error::Calculation(format!("regression solve failed: {e}")))?;

        let fitted = design * beta;
        let time = self
            .basis
            .iter()
            .map(RandomVariable::time)
            .fold(Real::NEG_INFINITY, Real::max)
            .max(value.time());
        Ok(RandomVariable::from_vec(time, fitted.iter().copied().collect()))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_linear_combination_is_recovered() {
        let x: Vec<Real> = (0..50).map(|i| i as Real * 0.1).collect();
        let basis = vec![
            RandomVariable::constant(1.0),
            RandomVariable::from_vec(1.0, x.clone()),
        ];
        let value =
            RandomVariable::from_vec(1.0, x.iter().map(|&xi| 2.0 + 3.0 * xi).collect());

        let reg = ConditionalExpectationRegression::new(basis).unwrap();
        let fitted = reg.conditional_expectation(&value).unwrap();
        for i in 0..50 {
            assert_relative_eq!(fitted.get(i), value.get(i), epsilon = 1e-9);
        }
    }

    #[test]
    fn orthogonal_noise_projects_to_mean() {
        // Regressing pure alternating noise on a constant gives the mean.
        let noise: Vec<Real> = (0..100)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let value = RandomVariable::from_vec(1.0, noise);
        let reg =
            ConditionalExpectationRegression::new(vec![RandomVariable::constant(1.0)]).unwrap();
        let fitted = reg.conditional_expectation(&value).unwrap();
        for i in 0..100 {
            assert_relative_eq!(fitted.get(i), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn collinear_basis_degrades_gracefully() {
        // Duplicate basis functions must not blow up the solve.
        let x: Vec<Real> = (0..20).map(|i| i as Real).collect();
        let phi = RandomVariable::from_vec(1.0, x.clone());
        let basis = vec![
            RandomVariable::constant(1.0),
            phi.clone(),
            phi.clone(),
        ];
        let value = RandomVariable::from_vec(1.0, x.iter().map(|&xi| 1.0 + xi).collect());
        let reg = ConditionalExpectationRegression::new(basis).unwrap();
        let fitted = reg.conditional_expectation(&value).unwrap();
        for i in 0..20 {
            assert_relative_eq!(fitted.get(i), value.get(i), epsilon = 1e-8);
        }
    }

    #[test]
    fn deterministic_value_is_passed_through() {
        let reg =
            ConditionalExpectationRegression::new(vec![RandomVariable::constant(1.0)]).unwrap();
        let value = RandomVariable::constant(7.0);
        let fitted = reg.conditional_expectation(&value).unwrap();
        assert!(fitted.is_deterministic());
        assert_eq!(fitted.get(0), 7.0);
    }

    #[test]
    fn too_few_paths_is_an_error() {
        let basis = vec![
            RandomVariable::constant(1.0),
            RandomVariable::from_vec(1.0, vec![1.0]),
        ];
        let value = RandomVariable::from_vec(1.0, vec![2.0]);
        let reg = ConditionalExpectationRegression::new(basis).unwrap();
        assert!(reg.conditional_expectation(&value).is_err());
    }

    #[test]
    fn empty_basis_is_rejected() {
        assert!(ConditionalExpectationRegression::new(vec![]).is_err());
    }
}

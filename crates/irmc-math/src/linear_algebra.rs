//! Factor reduction of correlation matrices.
//!
//! A full rank-n correlation matrix is approximated by the `k` eigenvectors
//! carrying the largest eigenvalues.  The resulting factor matrix F (n × k)
//! has rows renormalised to unit Euclidean length so that F·Fᵀ keeps exact
//! ones on its diagonal, i.e. the reduced matrix is again a correlation
//! matrix.

use irmc_core::{ensure, Real, Result};
use nalgebra::{DMatrix, SymmetricEigen};

/// Reduce a symmetric correlation matrix to `number_of_factors` factors.
///
/// Returns the n × k factor loading matrix F with unit-length rows.
/// Negative eigenvalues (possible for an indefinite input) are clamped to
/// zero before taking square roots.
pub fn factor_reduction(
    correlation: &DMatrix<Real>,
    number_of_factors: usize,
) -> Result<DMatrix<Real>> {
    let n = correlation.nrows();
    ensure!(
        correlation.ncols() == n,
        "correlation matrix must be square, got {}x{}",
        n,
        correlation.ncols()
    );
    ensure!(n > 0, "correlation matrix must not be empty");
    ensure!(
        (1..=n).contains(&number_of_factors),
        "number of factors ({number_of_factors}) must be in 1..={n}"
    );

    let eigen = SymmetricEigen::new(correlation.clone());

    // Indices of the k largest eigenvalues.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(number_of_factors);

    let mut factors = DMatrix::zeros(n, number_of_factors);
    for (j, &col) in order.iter().enumerate() {
        let scale = eigen.eigenvalues[col].max(0.0).sqrt();
        for i in 0..n {
            factors[(i, j)] = eigen.eigenvectors[(i, col)] * scale;
        }
    }

    // Renormalise rows so the reduced matrix has unit diagonal.
    for i in 0..n {
        let norm = (0..number_of_factors)
            .map(|j| factors[(i, j)] * factors[(i, j)])
            .sum::<Real>()
            .sqrt();
        if norm > 0.0 {
            for j in 0..number_of_factors {
                factors[(i, j)] /= norm;
            }
        }
    }

    Ok(factors)
}

/// The correlation matrix implied by a factor loading matrix, F·Fᵀ.
pub fn correlation_from_factors(factors: &DMatrix<Real>) -> DMatrix<Real> {
    factors * factors.transpose()
}

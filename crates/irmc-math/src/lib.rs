//! # irmc-math
//!
//! Mathematical building blocks for the Monte Carlo engine: the immutable
//! pathwise [`RandomVariable`], the Mersenne-Twister uniform generator, the
//! inverse-normal transform, conditional-expectation regression, and the
//! eigen-based correlation factor reduction.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Normal distribution functions (CDF and inverse CDF).
pub mod distributions;

/// Correlation-matrix factor reduction.
pub mod linear_algebra;

/// The immutable pathwise random variable.
pub mod random_variable;

/// Uniform pseudo-random number generation.
pub mod random_numbers;

/// Least-squares conditional-expectation regression.
pub mod regression;

pub use random_numbers::MersenneTwisterUniformRng;
pub use random_variable::RandomVariable;
pub use regression::ConditionalExpectationRegression;

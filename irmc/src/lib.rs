//! # irmc
//!
//! Monte Carlo pricing of interest-rate derivatives with early exercise:
//! Hull-White short-rate simulation, LIBOR covariance building blocks,
//! and Longstaff-Schwartz style Bermudan swaption valuation.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `irmc-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! irmc = "0.1"
//! ```
//!
//! ```rust
//! use irmc::core::Real;
//! use irmc::math::RandomVariable;
//!
//! let payoff = RandomVariable::from_vec(1.0, vec![0.0, 2.0, 4.0]);
//! let price: Real = payoff.average();
//! assert!((price - 2.0).abs() < f64::EPSILON);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use irmc_core as core;

/// Time discretization grids and index lookup.
pub use irmc_time as time;

/// Random variables, random number generation, regression, and
/// factor reduction.
pub use irmc_math as math;

/// Discount and forward curves.
pub use irmc_curves as curves;

/// Brownian drivers, the Euler scheme, and simulation interfaces.
pub use irmc_montecarlo as montecarlo;

/// Short-rate models and LIBOR covariance components.
pub use irmc_models as models;

/// Products valued against a simulation.
pub use irmc_products as products;

//! # irmc-montecarlo
//!
//! The simulation machinery: the lazily initialised Brownian driver, the
//! log-free Euler integrator over an abstract [`ProcessModel`], and the
//! product-facing [`MonteCarloSimulation`] surface.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The Brownian-increment driver.
pub mod brownian_motion;

/// Model capability traits consumed by the integrator.
pub mod model;

/// The Euler process integrator.
pub mod process;

/// The product-facing simulation surface.
pub mod simulation;

pub use brownian_motion::{BrownianMotionLazyInit, StochasticDriver};
pub use model::{ProcessModel, ShortRateModel};
pub use process::EulerScheme;
pub use simulation::{
    MonteCarloSimulation, ShortRateMonteCarloSimulation, TermStructureMonteCarloSimulation,
};

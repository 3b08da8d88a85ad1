//! # irmc-time
//!
//! The simulation time discretization shared by the stochastic driver, the
//! process integrator, and the model observables.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The time grid and its lookup result type.
pub mod time_discretization;

pub use time_discretization::{TimeDiscretization, TimeIndexResult};

//! # irmc-products
//!
//! Products valued against a Monte Carlo interest-rate simulation,
//! foremost the Bermudan swaption with its Longstaff-Schwartz style
//! early-exercise estimation.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The Bermudan swaption.
pub mod bermudan_swaption;

/// The product valuation trait.
pub mod product;

pub use bermudan_swaption::{BermudanSwaption, BermudanSwaptionValues};
pub use product::MonteCarloProduct;

//! # irmc-models
//!
//! Interest-rate model implementations: the Hull-White short-rate model
//! with constant and with piecewise-constant coefficients, the
//! piecewise-constant short-rate volatility structure, and the
//! forward-rate volatility / correlation structures used for multi-factor
//! term-structure modelling.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The Hull-White model with piecewise-constant coefficients.
pub mod hull_white;

/// The Hull-White model with constant coefficients.
pub mod hull_white_constant;

/// The three-parameter exponential-decay forward-rate correlation model.
pub mod libor_correlation;

/// The piecewise-constant forward-rate volatility structure.
pub mod libor_volatility;

mod numeraire;

/// Short-rate volatility structures.
pub mod short_rate_volatility;

pub use hull_white::HullWhiteModel;
pub use hull_white_constant::HullWhiteModelConstantCoeff;
pub use libor_correlation::LiborCorrelationThreeParameterExponentialDecay;
pub use libor_volatility::LiborVolatilityPiecewiseConstant;
pub use short_rate_volatility::{PiecewiseConstantShortRateVolatility, ShortRateVolatilityModel};

//! # irmc-curves
//!
//! Deterministic market curves consumed by the simulation models: the
//! [`DiscountCurve`] and [`ForwardCurve`] capability traits, a flat-forward
//! implementation of both, a discount curve derived from a forward curve by
//! compounding, and the read-only [`AnalyticModel`] curve registry.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The read-only curve registry.
pub mod analytic_model;

/// Curve capability traits.
pub mod curve;

/// Discounting implied by compounding a forward curve.
pub mod discount_curve_from_forward_curve;

/// The flat-forward curve.
pub mod flat_forward;

pub use analytic_model::AnalyticModel;
pub use curve::{DiscountCurve, ForwardCurve};
pub use discount_curve_from_forward_curve::DiscountCurveFromForwardCurve;
pub use flat_forward::FlatForwardCurve;

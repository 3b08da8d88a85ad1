//! Capability traits for deterministic market curves.
//!
//! The simulation models only ever need two questions answered about the
//! market: the discount factor for a maturity and the forward rate fixing
//! at a time.  Each is its own narrow trait so a model can require exactly
//! the capability it uses.

use irmc_core::{DiscountFactor, Rate, Result, Time};

/// A deterministic discounting curve `t ↦ P(t)` observed today.
pub trait DiscountCurve: Send + Sync {
    /// The curve's name, used for registry lookups.
    fn name(&self) -> &str;

    /// The discount factor for maturity `time`.
    fn discount_factor(&self, time: Time) -> Result<DiscountFactor>;
}

/// A deterministic forward-rate curve `t ↦ f(t)` observed today.
///
/// The forward fixing at `t` accrues over `[t, t + payment_offset]`.
pub trait ForwardCurve: Send + Sync {
    /// The curve's name, used for registry lookups.
    fn name(&self) -> &str;

    /// The forward rate fixing at `time`.
    fn forward(&self, time: Time) -> Result<Rate>;

    /// The accrual period length of the forwards on this curve.
    fn payment_offset(&self) -> Time;
}

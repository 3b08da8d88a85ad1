//! A curve with a single continuously compounded flat rate.

use crate::curve::{DiscountCurve, ForwardCurve};
use irmc_core::{ensure, DiscountFactor, Rate, Result, Time};

/// A flat curve: constant forward rate `r`, discount factors `exp(-r·t)`.
///
/// Implements both curve capabilities, which makes it the workhorse of
/// model tests and the natural starting point for a single-curve setup.
#[derive(Debug, Clone)]
pub struct FlatForwardCurve {
    name: String,
    rate: Rate,
    payment_offset: Time,
}

impl FlatForwardCurve {
    /// Create a flat curve with the given continuously compounded rate.
    pub fn new(name: impl Into<String>, rate: Rate, payment_offset: Time) -> Result<Self> {
        ensure!(
            payment_offset > 0.0,
            "payment offset must be positive, got {payment_offset}"
        );
        Ok(Self {
            name: name.into(),
            rate,
            payment_offset,
        })
    }

    /// The flat rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl DiscountCurve for FlatForwardCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn discount_factor(&self, time: Time) -> Result<DiscountFactor> {
        ensure!(time >= 0.0, "maturity must be non-negative, got {time}");
        Ok((-self.rate * time).exp())
    }
}

impl ForwardCurve for FlatForwardCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, time: Time) -> Result<Rate> {
        ensure!(time >= 0.0, "fixing time must be non-negative, got {time}");
        Ok(self.rate)
    }

    fn payment_offset(&self) -> Time {
        self.payment_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn discount_factors_are_exponential() {
        let curve = FlatForwardCurve::new("EUR", 0.05, 0.5).unwrap();
        assert_relative_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(
            curve.discount_factor(2.0).unwrap(),
            (-0.1_f64).exp(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn forward_is_flat() {
        let curve = FlatForwardCurve::new("EUR", 0.03, 0.25).unwrap();
        assert_eq!(curve.forward(0.0).unwrap(), 0.03);
        assert_eq!(curve.forward(10.0).unwrap(), 0.03);
        assert_eq!(curve.payment_offset(), 0.25);
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert!(FlatForwardCurve::new("EUR", 0.03, 0.0).is_err());
        let curve = FlatForwardCurve::new("EUR", 0.03, 0.5).unwrap();
        assert!(curve.discount_factor(-1.0).is_err());
        assert!(curve.forward(-1.0).is_err());
    }
}

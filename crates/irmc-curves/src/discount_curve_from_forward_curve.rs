//! Discounting implied by compounding a forward curve.

use crate::curve::{DiscountCurve, ForwardCurve};
use irmc_core::{ensure, DiscountFactor, Result, Time};
use std::sync::Arc;

/// A discount curve derived from a forward curve by single-curve
/// compounding: `P(t) = Π 1/(1 + f(tᵢ)·Δ)` over the forward periods up
/// to `t`, with simple accrual over a trailing partial period.
pub struct DiscountCurveFromForwardCurve {
    name: String,
    forward_curve: Arc<dyn ForwardCurve>,
}

impl DiscountCurveFromForwardCurve {
    /// Derive a discount curve from the given forward curve.
    pub fn new(forward_curve: Arc<dyn ForwardCurve>) -> Self {
        let name = format!("DiscountCurveFromForwardCurve({})", forward_curve.name());
        Self {
            name,
            forward_curve,
        }
    }
}

impl DiscountCurve for DiscountCurveFromForwardCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn discount_factor(&self, time: Time) -> Result<DiscountFactor> {
        ensure!(time >= 0.0, "maturity must be non-negative, got {time}");
        let period = self.forward_curve.payment_offset();
        let mut df = 1.0;
        let mut t = 0.0;
        while t + period <= time {
            df /= 1.0 + self.forward_curve.forward(t)? * period;
            t += period;
        }
        if time > t {
            df /= 1.0 + self.forward_curve.forward(t)? * (time - t);
        }
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat_forward::FlatForwardCurve;
    use approx::assert_relative_eq;

    #[test]
    fn flat_forward_compounds_to_expected_discount_factors() {
        let forward = Arc::new(FlatForwardCurve::new("EUR", 0.04, 0.5).unwrap());
        let discount = DiscountCurveFromForwardCurve::new(forward);

        assert_relative_eq!(discount.discount_factor(0.0).unwrap(), 1.0);
        // Two full semiannual periods at 4% simple.
        assert_relative_eq!(
            discount.discount_factor(1.0).unwrap(),
            1.0 / (1.0f64 + 0.04 * 0.5).powi(2),
            epsilon = 1e-14
        );
        // One full period plus a quarter-year stub.
        assert_relative_eq!(
            discount.discount_factor(0.75).unwrap(),
            1.0 / (1.0 + 0.04 * 0.5) / (1.0 + 0.04 * 0.25),
            epsilon = 1e-14
        );
    }

    #[test]
    fn discount_factors_decrease_for_positive_rates() {
        let forward = Arc::new(FlatForwardCurve::new("EUR", 0.02, 0.25).unwrap());
        let discount = DiscountCurveFromForwardCurve::new(forward);
        let mut previous = 1.0;
        for i in 1..=20 {
            let df = discount.discount_factor(i as Time * 0.5).unwrap();
            assert!(df < previous);
            previous = df;
        }
    }
}

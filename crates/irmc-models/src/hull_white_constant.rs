//! The Hull-White model with constant coefficients.
//!
//! Short-rate dynamics `dr(t) = (θ(t) − a·r(t)) dt + σ dW(t)` under the
//! risk-neutral measure, with scalar mean reversion `a` and volatility
//! `σ`.  The drift θ is calibrated so today's zero-coupon bonds reprice
//! exactly; the Euler step is exact because the per-step coefficients are
//! replaced by their effective (integrated) counterparts.

use crate::numeraire::NumeraireCache;
use irmc_core::{ensure, fail, Error, Real, Result, Time, Volatility};
use irmc_curves::{DiscountCurve, DiscountCurveFromForwardCurve, ForwardCurve};
use irmc_math::RandomVariable;
use irmc_montecarlo::{EulerScheme, ProcessModel, ShortRateModel};
use std::sync::Arc;

/// Hull-White with scalar mean reversion and volatility.
pub struct HullWhiteModelConstantCoeff {
    forward_curve: Arc<dyn ForwardCurve>,
    discount_curve: Option<Arc<dyn DiscountCurve>>,
    discount_from_forward: DiscountCurveFromForwardCurve,
    mean_reversion: Real,
    volatility: Volatility,
    numeraire_cache: NumeraireCache,
}

impl HullWhiteModelConstantCoeff {
    /// Create a model calibrated to `forward_curve`.
    ///
    /// If `discount_curve` is given, numéraires carry the deterministic
    /// adjustment towards it (funding / collateralization discounting).
    pub fn new(
        forward_curve: Arc<dyn ForwardCurve>,
        discount_curve: Option<Arc<dyn DiscountCurve>>,
        mean_reversion: Real,
        volatility: Volatility,
    ) -> Result<Self> {
        ensure!(
            volatility >= 0.0,
            "volatility must be non-negative, got {volatility}"
        );
        let discount_from_forward = DiscountCurveFromForwardCurve::new(forward_curve.clone());
        Ok(Self {
            forward_curve,
            discount_curve,
            discount_from_forward,
            mean_reversion,
            volatility,
            numeraire_cache: NumeraireCache::new(),
        })
    }

    /// The mean reversion speed a.
    pub fn mean_reversion(&self) -> Real {
        self.mean_reversion
    }

    /// The short-rate volatility σ.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// The forward curve the model is calibrated to.
    pub fn forward_curve(&self) -> &Arc<dyn ForwardCurve> {
        &self.forward_curve
    }

    /// A parameter-modified clone.  Not supported by this implementation;
    /// rebuild the model instead.
    pub fn clone_with_modified_data(&self) -> Result<Self> {
        Err(Error::NotSupported(
            "HullWhiteModelConstantCoeff does not support parameter-modified clones".into(),
        ))
    }

    /// The model's named parameter export.  Not supported by this
    /// implementation.
    pub fn model_parameters(&self) -> Result<Vec<(String, RandomVariable)>> {
        Err(Error::NotSupported(
            "HullWhiteModelConstantCoeff does not export model parameters".into(),
        ))
    }

    /// `B(t,T) = (1 − exp(−a(T−t))) / a`.
    pub fn b(&self, time: Time, maturity: Time) -> Result<Real> {
        if self.mean_reversion == 0.0 {
            fail!("B(t,T) is undefined for zero mean reversion");
        }
        Ok((1.0 - (-self.mean_reversion * (maturity - time)).exp()) / self.mean_reversion)
    }

    /// The conditional variance `Var(r(T) | r(t))
    /// = σ²(1 − exp(−2a(T−t))) / (2a)`.
    pub fn short_rate_conditional_variance(&self, time: Time, maturity: Time) -> Result<Real> {
        if self.mean_reversion == 0.0 {
            fail!("the short-rate conditional variance is undefined for zero mean reversion");
        }
        Ok(self.volatility * self.volatility
            * (1.0 - (-2.0 * self.mean_reversion * (maturity - time)).exp())
            / (2.0 * self.mean_reversion))
    }

    /// `A(t,T)`, chosen so that today's bond prices are matched exactly:
    /// `A(t,T) = P(T)/P(t) · exp(B(t,T)·f(0,t) − ½·Var(r(t))·B(t,T)²)`.
    fn a(&self, process: &EulerScheme, time: Time, maturity: Time) -> Result<Real> {
        let grid = process.time_discretization();
        let time_index = grid
            .time_index(time)
            .exact()
            .ok_or_else(|| Error::Calculation(format!("{time} is not a simulation time")))?;
        if time_index >= grid.number_of_time_steps() {
            fail!("A(t,T) needs a forward step after t = {time}, which is the last grid point");
        }
        let dt = grid.time_step(time_index);

        let df_t = self.discount_from_forward.discount_factor(time)?;
        let df_t_next = self.discount_from_forward.discount_factor(time + dt)?;
        let zero_rate = -(df_t_next / df_t).ln() / dt;

        let b = self.b(time, maturity)?;
        let ln_a = (self.discount_from_forward.discount_factor(maturity)? / df_t).ln()
            + b * zero_rate
            - 0.5 * self.short_rate_conditional_variance(0.0, time)? * b * b;
        Ok(ln_a.exp())
    }

    fn short_rate(&self, process: &EulerScheme, time_index: usize) -> Result<RandomVariable> {
        process.process_value(time_index, 0)
    }
}

impl ProcessModel for HullWhiteModelConstantCoeff {
    fn number_of_components(&self) -> usize {
        1
    }

    fn number_of_factors(&self) -> usize {
        1
    }

    fn initial_state(&self, process: &EulerScheme) -> Result<Vec<RandomVariable>> {
        let dt = process.time_discretization().time_step(0);
        let r0 = (self.discount_from_forward.discount_factor(0.0)?
            / self.discount_from_forward.discount_factor(dt)?)
        .ln()
            / dt;
        Ok(vec![RandomVariable::constant(r0)])
    }

    fn drift(
        &self,
        process: &EulerScheme,
        time_index: usize,
        realization: &[RandomVariable],
    ) -> Result<Vec<RandomVariable>> {
        let grid = process.time_discretization();
        let t0 = grid.time(time_index);
        let t1 = grid.time(time_index + 1);
        // Past the end of the grid the last step is extended.
        let t2 = if time_index < grid.number_of_times() - 2 {
            grid.time(time_index + 2)
        } else {
            t1 + grid.time_step(time_index)
        };

        let df0 = self.discount_from_forward.discount_factor(t0)?;
        let df1 = self.discount_from_forward.discount_factor(t1)?;
        let df2 = self.discount_from_forward.discount_factor(t2)?;

        let forward = -(df1 / df0).ln() / (t1 - t0);
        let forward_next = -(df2 / df1).ln() / (t2 - t1);
        let forward_change = (forward_next - forward) / (t1 - t0);

        let b = self.b(t0, t1)?;
        let mean_reversion_effective = self.mean_reversion * b / (t1 - t0);
        let variance = self.short_rate_conditional_variance(0.0, t0)?;

        // θ removes the current forward from the mean-reversion pull,
        // steps the forward to the next period and adds the convexity
        // adjustment.
        let theta =
            forward_change + mean_reversion_effective * forward + variance * b / (t1 - t0);

        Ok(vec![realization[0]
            .mult_scalar(-mean_reversion_effective)
            .add_scalar(theta)])
    }

    fn factor_loading(
        &self,
        process: &EulerScheme,
        time_index: usize,
        _component: usize,
        _realization: &[RandomVariable],
    ) -> Result<Vec<RandomVariable>> {
        let grid = process.time_discretization();
        let dt = grid.time_step(time_index);
        if self.mean_reversion == 0.0 {
            fail!("the effective volatility is undefined for zero mean reversion");
        }
        let scaling =
            ((1.0 - (-2.0 * self.mean_reversion * dt).exp()) / (2.0 * self.mean_reversion * dt))
                .sqrt();
        Ok(vec![RandomVariable::constant(scaling * self.volatility)])
    }
}

impl ShortRateModel for HullWhiteModelConstantCoeff {
    fn numeraire(&self, process: &EulerScheme, time: Time) -> Result<RandomVariable> {
        self.numeraire_cache
            .numeraire(process, time, self.discount_curve.as_ref())
    }

    fn zero_coupon_bond(
        &self,
        process: &EulerScheme,
        time: Time,
        maturity: Time,
    ) -> Result<RandomVariable> {
        if maturity < time {
            fail!("bond maturity ({maturity}) lies before the observation time ({time})");
        }
        let grid = process.time_discretization();
        if maturity > grid.last_time() {
            fail!(
                "bond maturity ({maturity}) lies beyond the last simulation time ({})",
                grid.last_time()
            );
        }
        let time_index = grid
            .time_index(time)
            .exact()
            .ok_or_else(|| Error::Calculation(format!("{time} is not a simulation time")))?;

        let short_rate = self.short_rate(process, time_index)?;
        let a = self.a(process, time, maturity)?;
        let b = self.b(time, maturity)?;
        Ok(short_rate.mult_scalar(-b).exp().mult_scalar(a))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

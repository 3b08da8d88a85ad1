//! The Hull-White model with piecewise-constant coefficients.
//!
//! Short-rate dynamics `dr(t) = (θ(t) − a(t)·r(t)) dt + σ(t) dW(t)` with
//! mean reversion and volatility read from a [`ShortRateVolatilityModel`],
//! both piecewise constant on the structure's own grid.  All closed-form
//! quantities (`∫a`, `B`, the variance integrals `V` and `dV`, the
//! conditional variance) are accumulated segment by segment over that
//! grid, so the model is exact for any step placement relative to the
//! coefficient grid.

use crate::numeraire::NumeraireCache;
use crate::short_rate_volatility::ShortRateVolatilityModel;
use irmc_core::{ensure, fail, Error, Real, Result, Time};
use irmc_curves::{DiscountCurve, DiscountCurveFromForwardCurve, ForwardCurve};
use irmc_math::RandomVariable;
use irmc_montecarlo::{EulerScheme, ProcessModel, ShortRateModel};
use std::sync::Arc;

/// Hull-White with piecewise-constant mean reversion and volatility.
pub struct HullWhiteModel {
    forward_curve: Arc<dyn ForwardCurve>,
    discount_curve: Option<Arc<dyn DiscountCurve>>,
    discount_from_forward: DiscountCurveFromForwardCurve,
    volatility_model: Arc<dyn ShortRateVolatilityModel>,
    numeraire_cache: NumeraireCache,
}

impl HullWhiteModel {
    /// Create a model calibrated to `forward_curve`, with coefficients
    /// from `volatility_model`.
    pub fn new(
        forward_curve: Arc<dyn ForwardCurve>,
        discount_curve: Option<Arc<dyn DiscountCurve>>,
        volatility_model: Arc<dyn ShortRateVolatilityModel>,
    ) -> Result<Self> {
        ensure!(
            volatility_model.time_discretization().number_of_times() > 0,
            "the volatility model must carry a non-empty time discretization"
        );
        let discount_from_forward = DiscountCurveFromForwardCurve::new(forward_curve.clone());
        Ok(Self {
            forward_curve,
            discount_curve,
            discount_from_forward,
            volatility_model,
            numeraire_cache: NumeraireCache::new(),
        })
    }

    /// The coefficient structure.
    pub fn volatility_model(&self) -> &Arc<dyn ShortRateVolatilityModel> {
        &self.volatility_model
    }

    /// The forward curve the model is calibrated to.
    pub fn forward_curve(&self) -> &Arc<dyn ForwardCurve> {
        &self.forward_curve
    }

    /// A parameter-modified clone.  Not supported by this implementation;
    /// rebuild the model instead.
    pub fn clone_with_modified_data(&self) -> Result<Self> {
        Err(Error::NotSupported(
            "HullWhiteModel does not support parameter-modified clones".into(),
        ))
    }

    /// The model's named parameter export.  Not supported by this
    /// implementation.
    pub fn model_parameters(&self) -> Result<Vec<(String, RandomVariable)>> {
        Err(Error::NotSupported(
            "HullWhiteModel does not export model parameters".into(),
        ))
    }

    /// Segment indices of the coefficient grid covered by `[time, maturity]`:
    /// the first grid point strictly inside the interval and the grid point
    /// at or before `maturity`.
    fn segment_range(&self, time: Time, maturity: Time) -> (usize, usize) {
        let grid = self.volatility_model.time_discretization();
        let start = grid
            .time_index(time)
            .following()
            .unwrap_or(grid.number_of_times());
        let end = grid.time_index(maturity).clamped();
        (start, end)
    }

    /// The coefficient index in effect at `time` (snaps down, clamped).
    fn coefficient_index(&self, time: Time) -> usize {
        self.volatility_model
            .time_discretization()
            .time_index(time)
            .clamped()
    }

    /// `∫ₜᵀ a(s) ds`, accumulated over the coefficient segments.
    pub fn mean_reversion_integral(&self, time: Time, maturity: Time) -> Real {
        let grid = self.volatility_model.time_discretization();
        let (start, end) = self.segment_range(time, maturity);

        let mut integral = 0.0;
        let mut time_prev = time;
        for index in (start + 1)..=end {
            let time_next = grid.time(index);
            integral += self.volatility_model.mean_reversion(index - 1) * (time_next - time_prev);
            time_prev = time_next;
        }
        integral += self.volatility_model.mean_reversion(end) * (maturity - time_prev);
        integral
    }

    /// `B(t,T) = ∫ₜᵀ exp(−∫ₛᵀ a(τ) dτ) ds`.
    pub fn b(&self, time: Time, maturity: Time) -> Real {
        let grid = self.volatility_model.time_discretization();
        let (start, end) = self.segment_range(time, maturity);

        let mut integral = 0.0;
        let mut time_prev = time;
        for index in (start + 1)..=end {
            let time_next = grid.time(index);
            let a = self.volatility_model.mean_reversion(index - 1);
            integral += ((-self.mean_reversion_integral(time_next, maturity)).exp()
                - (-self.mean_reversion_integral(time_prev, maturity)).exp())
                / a;
            time_prev = time_next;
        }
        let a = self.volatility_model.mean_reversion(end);
        integral += ((-self.mean_reversion_integral(maturity, maturity)).exp()
            - (-self.mean_reversion_integral(time_prev, maturity)).exp())
            / a;
        integral
    }

    /// `V(t,T) = ∫ₜᵀ σ²(s)·B(s,T)² ds`, the log-numéraire variance
    /// contribution.
    pub fn v(&self, time: Time, maturity: Time) -> Real {
        if time == maturity {
            return 0.0;
        }
        let grid = self.volatility_model.time_discretization();
        let (start, end) = self.segment_range(time, maturity);

        let mut integral = 0.0;
        let mut time_prev = time;
        let segment = |time_prev: Time, time_next: Time, index: usize| {
            let a = self.volatility_model.mean_reversion(index);
            let sigma = self.volatility_model.volatility(index);
            let exp_next = (-self.mean_reversion_integral(time_next, maturity)).exp();
            let exp_prev = (-self.mean_reversion_integral(time_prev, maturity)).exp();
            let exp2_next = (-2.0 * self.mean_reversion_integral(time_next, maturity)).exp();
            let exp2_prev = (-2.0 * self.mean_reversion_integral(time_prev, maturity)).exp();
            sigma * sigma * (time_next - time_prev) / (a * a)
                - sigma * sigma * 2.0 * (exp_next - exp_prev) / (a * a * a)
                + sigma * sigma * (exp2_next - exp2_prev) / (2.0 * a * a * a)
        };
        for index in (start + 1)..=end {
            let time_next = grid.time(index);
            integral += segment(time_prev, time_next, index - 1);
            time_prev = time_next;
        }
        integral += segment(time_prev, maturity, end);
        integral
    }

    /// `dV(t,T) = ∫ₜᵀ σ²(s)·exp(−∫ₛᵀ a)·B(s,T) ds`, the cross term used
    /// by the drift calibration.
    pub fn dv(&self, time: Time, maturity: Time) -> Real {
        if time == maturity {
            return 0.0;
        }
        let grid = self.volatility_model.time_discretization();
        let (start, end) = self.segment_range(time, maturity);

        let mut integral = 0.0;
        let mut time_prev = time;
        let segment = |time_prev: Time, time_next: Time, index: usize| {
            let a = self.volatility_model.mean_reversion(index);
            let sigma = self.volatility_model.volatility(index);
            let exp_next = (-self.mean_reversion_integral(time_next, maturity)).exp();
            let exp_prev = (-self.mean_reversion_integral(time_prev, maturity)).exp();
            let exp2_next = (-2.0 * self.mean_reversion_integral(time_next, maturity)).exp();
            let exp2_prev = (-2.0 * self.mean_reversion_integral(time_prev, maturity)).exp();
            sigma * sigma * (exp_next - exp_prev) / (a * a)
                - sigma * sigma * (exp2_next - exp2_prev) / (2.0 * a * a)
        };
        for index in (start + 1)..=end {
            let time_next = grid.time(index);
            integral += segment(time_prev, time_next, index - 1);
            time_prev = time_next;
        }
        integral += segment(time_prev, maturity, end);
        integral
    }

    /// The conditional variance `Var(r(T) | r(t))
    /// = ∫ₜᵀ σ²(s)·exp(−2·∫ₛᵀ a(τ) dτ) ds`.
    pub fn short_rate_conditional_variance(&self, time: Time, maturity: Time) -> Real {
        let grid = self.volatility_model.time_discretization();
        let (start, end) = self.segment_range(time, maturity);

        let mut integral = 0.0;
        let mut time_prev = time;
        let segment = |time_prev: Time, time_next: Time, index: usize| {
            let a = self.volatility_model.mean_reversion(index);
            let sigma = self.volatility_model.volatility(index);
            sigma * sigma
                * ((-2.0 * self.mean_reversion_integral(time_next, maturity)).exp()
                    - (-2.0 * self.mean_reversion_integral(time_prev, maturity)).exp())
                / (2.0 * a)
        };
        for index in (start + 1)..=end {
            let time_next = grid.time(index);
            integral += segment(time_prev, time_next, index - 1);
            time_prev = time_next;
        }
        integral += segment(time_prev, maturity, end);
        integral
    }

    /// `A(t,T)`, chosen so that today's bond prices are matched exactly.
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

        let b = self.b(time, maturity);
        let ln_a = (self.discount_from_forward.discount_factor(maturity)? / df_t).ln()
            + b * zero_rate
            - 0.5 * self.short_rate_conditional_variance(0.0, time) * b * b;
        Ok(ln_a.exp())
    }
}

impl ProcessModel for HullWhiteModel {
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

        let a = self
            .volatility_model
            .mean_reversion(self.coefficient_index(t0));
        let mean_reversion_effective = a * self.b(t0, t1) / (t1 - t0);

        let phi =
            (self.dv(0.0, t1) - (-a * (t1 - t0)).exp() * self.dv(0.0, t0)) / (t1 - t0);

        let theta = forward_change + mean_reversion_effective * forward + phi;

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
        let t0 = grid.time(time_index);
        let dt = grid.time_step(time_index);

        let index = self.coefficient_index(t0);
        let a = self.volatility_model.mean_reversion(index);
        let sigma = self.volatility_model.volatility(index);
        let scaling = ((1.0 - (-2.0 * a * dt).exp()) / (2.0 * a * dt)).sqrt();
        Ok(vec![RandomVariable::constant(scaling * sigma)])
    }
}

impl ShortRateModel for HullWhiteModel {
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

        let short_rate = process.process_value(time_index, 0)?;
        let a = self.a(process, time, maturity)?;
        let b = self.b(time, maturity);
        Ok(short_rate.mult_scalar(-b).exp().mult_scalar(a))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

//! End-to-end valuation tests: Hull-White simulation plus the Bermudan
//! backward induction, checked against curve-implied values and
//! no-arbitrage orderings.

use approx::assert_relative_eq;
use irmc_core::{Rate, Real, Time};
use irmc_curves::{DiscountCurve, DiscountCurveFromForwardCurve, FlatForwardCurve};
use irmc_models::HullWhiteModelConstantCoeff;
use irmc_montecarlo::{
    BrownianMotionLazyInit, MonteCarloSimulation, ShortRateMonteCarloSimulation,
    StochasticDriver, TermStructureMonteCarloSimulation,
};
use irmc_products::{BermudanSwaption, MonteCarloProduct};
use irmc_time::TimeDiscretization;
use std::sync::Arc;

const FLAT_RATE: Rate = 0.03;
const MEAN_REVERSION: Real = 0.1;
const VOLATILITY: Real = 0.01;
const PATHS: usize = 10_000;
const SEED: u64 = 3141;

fn forward_curve() -> Arc<FlatForwardCurve> {
    Arc::new(FlatForwardCurve::new("EUR", FLAT_RATE, 0.5).unwrap())
}

fn driver() -> Arc<dyn StochasticDriver> {
    let grid = TimeDiscretization::uniform(0.0, 12, 0.5).unwrap();
    Arc::new(BrownianMotionLazyInit::new(grid, 1, PATHS, SEED))
}

fn simulation(driver: Arc<dyn StochasticDriver>) -> ShortRateMonteCarloSimulation {
    let forward = forward_curve();
    let discount: Arc<dyn DiscountCurve> =
        Arc::new(DiscountCurveFromForwardCurve::new(forward.clone()));
    let model = Arc::new(
        HullWhiteModelConstantCoeff::new(
            forward,
            Some(discount),
            MEAN_REVERSION,
            VOLATILITY,
        )
        .unwrap(),
    );
    ShortRateMonteCarloSimulation::new(model, driver)
}

fn discount_factor(time: Time) -> Real {
    DiscountCurveFromForwardCurve::new(forward_curve())
        .discount_factor(time)
        .unwrap()
}

/// The par rate of the five-period annual swap fixing at 1.0.
fn par_swap_rate() -> Rate {
    let annuity: Real = (1..=5).map(|i| discount_factor(i as Time + 1.0)).sum();
    (discount_factor(1.0) - discount_factor(6.0)) / annuity
}

fn bermudan(exercise: Vec<bool>, strike: Rate, is_callable: bool) -> BermudanSwaption {
    BermudanSwaption::new(
        exercise,
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
        vec![1.0; 5],
        vec![2.0, 3.0, 4.0, 5.0, 6.0],
        vec![1.0; 5],
        vec![strike; 5],
        is_callable,
    )
    .unwrap()
}

#[test]
fn adjusted_numeraire_reprices_zero_bonds_exactly() {
    let sim = simulation(driver());
    for maturity in [0.5, 1.0, 2.5, 6.0] {
        let expectation = sim.numeraire(maturity).unwrap().invert().average();
        assert_relative_eq!(expectation, discount_factor(maturity), epsilon = 1e-12);
    }
}

#[test]
fn simulated_bonds_reprice_todays_curve() {
    let sim = simulation(driver());
    for (time, maturity) in [(1.0, 2.0), (2.0, 6.0), (0.5, 4.5)] {
        let bond = sim.zero_coupon_bond(time, maturity).unwrap();
        let numeraire = sim.numeraire(time).unwrap();
        let price = bond.div(&numeraire).average();
        assert_relative_eq!(
            price,
            discount_factor(maturity),
            max_relative = 0.01
        );
    }
}

#[test]
fn cancelable_without_exercise_rights_is_the_running_swap() {
    let sim = simulation(driver());
    let strike = par_swap_rate() - 0.01;
    let product = bermudan(vec![false; 5], strike, false);
    let price = product.value(0.0, &sim).unwrap().average();

    // analytic payer swap value off today's curve
    let annuity: Real = (1..=5).map(|i| discount_factor(i as Time + 1.0)).sum();
    let analytic = (par_swap_rate() - strike) * annuity;
    assert_relative_eq!(price, analytic, epsilon = 3e-3);
}

#[test]
fn deep_out_of_the_money_callable_is_never_exercised() {
    let sim = simulation(driver());
    let product = bermudan(vec![true; 5], par_swap_rate() + 0.15, true);
    let values = product.values(0.0, &sim).unwrap();
    assert!(values.value.average().abs() < 1e-6);
    // no path exercises
    for path in 0..PATHS {
        assert_eq!(values.exercise_time.get(path), Real::INFINITY);
    }
}

#[test]
fn deep_in_the_money_cancelable_is_never_cancelled() {
    let shared = driver();
    let sim = simulation(shared);
    let strike = par_swap_rate() - 0.1;

    let with_rights = bermudan(vec![true; 5], strike, false);
    let without_rights = bermudan(vec![false; 5], strike, false);

    let cancelable = with_rights.value(0.0, &sim).unwrap().average();
    let swap = without_rights.value(0.0, &sim).unwrap().average();
    assert_relative_eq!(cancelable, swap, epsilon = 1e-6);
}

#[test]
fn bermudan_dominates_the_european_and_stays_bounded() {
    let shared = driver();
    let sim = simulation(shared);
    let strike = par_swap_rate();

    let bermudan_product = bermudan(vec![true; 5], strike, true);
    let european_product =
        bermudan(vec![true, false, false, false, false], strike, true);

    let bermudan_values = bermudan_product.values(0.0, &sim).unwrap();
    let european_values = european_product.values(0.0, &sim).unwrap();

    let bermudan_price = bermudan_values.value.average();
    let european_price = european_values.value.average();

    assert!(european_price > 0.0);
    // More exercise rights are worth at least as much, up to a small
    // regression tolerance on identical paths.
    assert!(bermudan_price + 1e-4 >= european_price);
    // An at-the-money option on a unit notional five-year swap is worth
    // far less than the notional.
    assert!(bermudan_price < 1.0);
    assert!(bermudan_values.error > 0.0);
    assert!(bermudan_values.error < bermudan_price);
}

#[test]
fn exercise_times_are_exercise_dates_or_infinity() {
    let sim = simulation(driver());
    let product = bermudan(vec![true; 5], par_swap_rate(), true);
    let values = product.values(0.0, &sim).unwrap();

    let mut exercised = 0usize;
    for path in 0..PATHS {
        let t = values.exercise_time.get(path);
        if t.is_finite() {
            exercised += 1;
            assert!(
                [1.0, 2.0, 3.0, 4.0, 5.0].contains(&t),
                "unexpected exercise time {t}"
            );
        }
    }
    // At the money, some but not all paths exercise.
    assert!(exercised > 0);
    assert!(exercised < PATHS);
}

#[test]
fn reseeded_simulation_agrees_within_the_monte_carlo_error() {
    let sim = simulation(driver());
    let reseeded = sim.clone_with_modified_seed(2718);
    let product = bermudan(vec![true; 5], par_swap_rate(), true);

    let a = product.values(0.0, &sim).unwrap();
    let b = product.values(0.0, &reseeded).unwrap();

    let price_a = a.value.average();
    let price_b = b.value.average();
    assert_ne!(price_a, price_b);
    assert!((price_a - price_b).abs() < 4.0 * (a.error + b.error));
}

//! End-to-end properties of the lattice pricers and calibrators.

use approx::assert_abs_diff_eq;
use binolattice::prelude::*;
use binolattice::methods::{discount_bond_lattice, Lattice};
use proptest::prelude::*;
use statrs::distribution::{Binomial, Discrete};

fn params(dividend: Real) -> Parameters {
    Parameters::new(100.0, 100.0, 0.0, 1.0, 0.05, dividend, 0.2).unwrap()
}

/// Discounted expectation of the payoff under the terminal binomial law.
fn crr_reference(model: &BinomialTreeModel, option_type: OptionType) -> Real {
    let tree = model.tree();
    let n = tree.steps() as u64;
    // Node j has j down moves, so the number of up moves is n - j.
    let law = Binomial::new(tree.probability_up(), n).unwrap();
    let k = model.parameters().strike();
    let expectation: Real = (0..=n)
        .map(|ups| {
            let s = tree.underlying(n as usize, (n - ups) as usize);
            let intrinsic = match option_type {
                OptionType::Call => (s - k).max(0.0),
                OptionType::Put => (k - s).max(0.0),
            };
            law.pmf(ups) * intrinsic
        })
        .sum();
    expectation * (-model.parameters().rate() * model.parameters().tau()).exp()
}

fn assert_recombines(l: &Lattice, step_up: impl Fn(Real) -> Real, step_down: impl Fn(Real) -> Real) {
    for i in 0..l.steps() {
        for j in 0..=i {
            let v = l.value(i, j);
            let tol = 1e-9 * v.abs().max(1.0);
            assert!((step_up(v) - l.value(i + 1, j)).abs() < tol, "up from ({i}, {j})");
            assert!((step_down(v) - l.value(i + 1, j + 1)).abs() < tol, "down from ({i}, {j})");
        }
    }
}

// ───── recombination ─────

#[test]
fn crr_lattice_recombines() {
    let model = BinomialTreeModel::new(params(0.0), 25).unwrap();
    let (u, d) = (model.tree().up(), model.tree().down());
    assert_recombines(&model.stock_lattice(), |s| s * u, |s| s * d);
}

#[test]
fn short_rate_lattices_recombine_in_state() {
    let zcb = [0.99, 0.97, 0.94, 0.90, 0.86, 0.82];
    let cal = RateCalibration::new(HoLee::new(0.01).unwrap(), &zcb, 6.0).unwrap();
    let shock = 0.01;
    // Columns differ by the drift, so compare neighbours within a column.
    for i in 1..=cal.rates().steps() {
        let col = cal.rates().column(i);
        for w in col.windows(2) {
            assert_abs_diff_eq!(w[0] - w[1], 2.0 * shock, epsilon = 1e-12);
        }
    }

    let bdt = RateCalibration::new(BlackDermanToy::new(0.2).unwrap(), &zcb, 6.0).unwrap();
    for i in 1..=bdt.rates().steps() {
        let col = bdt.rates().column(i);
        for w in col.windows(2) {
            assert_abs_diff_eq!((w[0] / w[1]).ln(), 0.4, epsilon = 1e-12);
        }
    }
}

// ───── CRR consistency ─────

#[test]
fn crr_up_down_product_is_one() {
    for steps in [1, 3, 50, 500] {
        let model = BinomialTreeModel::new(params(0.02), steps).unwrap();
        assert_abs_diff_eq!(model.tree().up() * model.tree().down(), 1.0, epsilon = 1e-14);
        assert!(model.arbitrage_warning().is_none());
    }
}

// ───── American ≥ European ─────

proptest! {
    #[test]
    fn american_never_below_european(
        spot in 50.0f64..150.0,
        strike in 50.0f64..150.0,
        rate in 0.0f64..0.1,
        dividend in 0.0f64..0.08,
        vol in 0.05f64..0.6,
        steps in 1usize..80,
    ) {
        let p = Parameters::new(spot, strike, 0.0, 1.0, rate, dividend, vol).unwrap();
        let model = BinomialTreeModel::new(p, steps).unwrap();
        for option_type in [OptionType::Call, OptionType::Put] {
            let eu = model.npv(option_type, ExerciseType::European);
            let am = model.npv(option_type, ExerciseType::American);
            prop_assert!(am >= eu - 1e-10, "{option_type}: american {am} < european {eu}");
        }
    }
}

// ───── put-call parity ─────

#[test]
fn european_put_call_parity() {
    for dividend in [0.0, 0.03] {
        let p = params(dividend);
        let model = BinomialTreeModel::new(p, 400).unwrap();
        let call = model.npv(OptionType::Call, ExerciseType::European);
        let put = model.npv(OptionType::Put, ExerciseType::European);
        let forward = p.spot() * (-p.dividend() * p.tau()).exp() - p.strike() * (-p.rate() * p.tau()).exp();
        assert_abs_diff_eq!(call - put, forward, epsilon = 1e-8);
    }
}

// ───── calibration round-trip ─────

#[test]
fn calibration_reprices_generated_curve() {
    let dt = 0.5;
    let thetas = [0.01, 0.006, 0.004, 0.0, -0.002, 0.001, 0.003];
    let model = HoLee::new(0.012).unwrap();
    let x0 = model.state(0.025).unwrap();
    let rates = model.rate_lattice(x0, dt, &thetas);
    let zcb: Vec<Real> = (0..=thetas.len())
        .map(|k| discount_bond_lattice(&rates.truncated(k).unwrap(), dt).root())
        .collect();

    let cal = RateCalibration::new(model, &zcb, dt * zcb.len() as Real).unwrap();
    for (fit, truth) in cal.thetas().iter().zip(thetas) {
        assert!((fit - truth).abs() < 1e-6, "{fit} vs {truth}");
    }
    for (p, z) in cal.model_discount_factors().unwrap().iter().zip(&zcb) {
        assert!((p - z).abs() < 1e-6);
    }
}

#[test]
fn bdt_calibration_reprices_market_curve() {
    let zcb = [97.0, 93.5, 90.0, 86.2, 82.5];
    let cal = RateCalibration::new(BlackDermanToy::new(0.18).unwrap(), &zcb, 5.0).unwrap();
    for (p, z) in cal.model_discount_factors().unwrap().iter().zip(zcb) {
        assert!((p - z / 100.0).abs() < 1e-6, "{p} vs {z}");
    }
}

// ───── rate positivity ─────

#[test]
fn bdt_rates_stay_positive_ho_lee_may_not() {
    let zcb = [0.998, 0.996, 0.994, 0.993, 0.992, 0.991, 0.990, 0.989];
    let bdt = RateCalibration::new(BlackDermanToy::new(0.5).unwrap(), &zcb, 8.0).unwrap();
    assert!(bdt.rates().nodes().all(|(_, _, r)| r >= 0.0));

    let ho_lee = RateCalibration::new(HoLee::new(0.02).unwrap(), &zcb, 8.0).unwrap();
    assert!(ho_lee.rates().nodes().any(|(_, _, r)| r < 0.0));
}

// ───── fair swap rate ─────

#[test]
fn fair_swap_rate_three_periods() {
    let zcb = [0.99, 0.97, 0.94];
    let cal = RateCalibration::new(HoLee::new(0.01).unwrap(), &zcb, 3.0).unwrap();
    let engine = TreeRateDerivativeEngine::new(&cal, 3).unwrap();
    let reference = (1.0 - 0.94) / (0.99 + 0.97 + 0.94);
    assert_abs_diff_eq!(engine.swap_rate(), reference, epsilon = 1e-15);
    assert_abs_diff_eq!(engine.swap_rate(), 0.020_689_655_172_413_8, epsilon = 1e-12);

    let numeric = engine.fit_swap_rate(&Solver1D::default()).unwrap();
    assert_abs_diff_eq!(numeric, reference, epsilon = 1e-6);
}

// ───── padding ─────

#[test]
fn dense_views_are_zero_below_diagonal() {
    let model = BinomialTreeModel::new(params(0.0), 6).unwrap();
    let all = model.price_all();
    let cal = RateCalibration::new(HoLee::new(0.01).unwrap(), &[0.99, 0.97, 0.94, 0.90], 4.0).unwrap();
    let engine = TreeRateDerivativeEngine::new(&cal, 4).unwrap();

    let lattices = [
        all.stock,
        all.european_call,
        all.american_put,
        cal.rates().clone(),
        cal.bond_lattice(),
        engine.fair_swap(),
        engine.swaption(2, None).unwrap(),
    ];
    for l in &lattices {
        for (node, row) in l.to_dense().iter().enumerate() {
            for (step, v) in row.iter().enumerate().take(node) {
                assert_eq!(*v, 0.0, "({node}, {step})");
            }
        }
    }
}

// ───── known CRR example ─────

#[test]
fn three_step_crr_call_matches_binomial_reference() {
    let model = BinomialTreeModel::new(params(0.0), 3).unwrap();
    let call = model.npv(OptionType::Call, ExerciseType::European);
    assert_abs_diff_eq!(call, crr_reference(&model, OptionType::Call), epsilon = 1e-2);
    assert_abs_diff_eq!(call, 11.0439, epsilon = 1e-2);

    let put = model.npv(OptionType::Put, ExerciseType::European);
    assert_abs_diff_eq!(put, crr_reference(&model, OptionType::Put), epsilon = 1e-10);
}

#[test]
fn fine_crr_converges_to_black_scholes() {
    let model = BinomialTreeModel::new(params(0.0), 500).unwrap();
    let call = model.npv(OptionType::Call, ExerciseType::European);
    assert_abs_diff_eq!(call, crr_reference(&model, OptionType::Call), epsilon = 1e-8);
    // Black-Scholes 10.4506
    assert_abs_diff_eq!(call, 10.4506, epsilon = 0.02);
}

// ───── diagnostics ─────

#[test]
fn arbitrage_is_observable_not_fatal() {
    let p = Parameters::new(100.0, 100.0, 0.0, 1.0, 4.0, 0.0, 0.01).unwrap();
    let model = BinomialTreeModel::new(p, 1).unwrap();
    let warning = model.arbitrage_warning().expect("p > 1 expected");
    assert!(warning.probability > 1.0);
    assert!(model.npv(OptionType::Call, ExerciseType::European).is_finite());
}

#[test]
fn swaption_beyond_horizon_fails() {
    let cal = RateCalibration::new(HoLee::new(0.01).unwrap(), &[0.99, 0.97, 0.94], 3.0).unwrap();
    let engine = TreeRateDerivativeEngine::new(&cal, 3).unwrap();
    assert!(matches!(engine.swaption(3, None), Err(Error::OutOfRange { .. })));
    assert!(engine.swaption(2, None).is_ok());
}

#[test]
fn rate_derivative_names_parse() {
    assert_eq!("Cap".parse::<RateDerivativeType>().unwrap(), RateDerivativeType::Cap);
    assert_eq!(" floor ".parse::<RateDerivativeType>().unwrap(), RateDerivativeType::Floor);
    assert!(matches!(
        "collar".parse::<RateDerivativeType>(),
        Err(Error::InvalidParameter(_))
    ));
}

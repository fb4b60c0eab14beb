//! Exact fit of a short-rate lattice to a zero-coupon bond curve.
//!
//! # Algorithm
//!
//! With `n` quotes over `T` years, `Δt = T / n` and the root rate is read
//! off the shortest bond, `r0 = −ln Z₀ / Δt`. Each later quote `Z_k` then
//! fixes one drift: `θ_k` is the root of
//!
//! ```text
//! f(θ) = P(r0; θ_1, …, θ_{k−1}, θ) − Z_k
//! ```
//!
//! where `P` forward-builds the rate lattice and rolls a unit bond back
//! under ½/½ probabilities. The thetas already fitted stay fixed, so the
//! whole calibration is `n − 1` one-dimensional solves.

use crate::short_rate_model::ShortRateDynamics;
use bl_core::{
    ensure,
    errors::{Error, Result},
    DiscountFactor, Rate, Real, Time,
};
use bl_math::Solver1D;
use bl_methods::{discount_bond_lattice, Lattice};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Root-finding settings for [`RateCalibration`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConfig {
    /// Solver used for every per-step fit.
    pub solver: Solver1D,
    /// Starting point of each theta search.
    pub initial_guess: Real,
    /// Half-width of the first bracket around `initial_guess`.
    pub bracket_step: Real,
    /// Largest accepted `|P − Z_k|` after the solve.
    pub residual_tolerance: Real,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            solver: Solver1D::default(),
            initial_guess: 0.001,
            bracket_step: 0.01,
            residual_tolerance: 1.0e-9,
        }
    }
}

impl CalibrationConfig {
    /// Replace the solver.
    pub fn with_solver(mut self, solver: Solver1D) -> Self {
        self.solver = solver;
        self
    }

    /// Set the starting point of each theta search.
    pub fn with_initial_guess(mut self, guess: Real) -> Self {
        self.initial_guess = guess;
        self
    }

    /// Set the initial bracket half-width.
    pub fn with_bracket_step(mut self, step: Real) -> Self {
        self.bracket_step = step;
        self
    }

    /// Set the accepted repricing residual.
    pub fn with_residual_tolerance(mut self, tolerance: Real) -> Self {
        self.residual_tolerance = tolerance;
        self
    }
}

// ── Calibrated lattice ────────────────────────────────────────────────────────

/// A short-rate lattice that reprices a zero-coupon curve.
///
/// Only calibrated instances exist: [`RateCalibration::new`] either fits
/// every theta or returns the error of the first step that failed. The
/// rate lattice is read-only afterwards and may be shared by any number of
/// pricers.
#[derive(Debug, Clone)]
pub struct RateCalibration<M> {
    model: M,
    discount_factors: Vec<DiscountFactor>,
    tenor: Time,
    dt: Time,
    thetas: Vec<Real>,
    rates: Lattice,
}

impl<M: ShortRateDynamics> RateCalibration<M> {
    /// Calibrate `model` to `zcb` with the default [`CalibrationConfig`].
    ///
    /// `zcb[k]` is the bond maturing at `(k + 1) · tenor / zcb.len()`.
    /// Quotes per 100 (last quote above 1) are rescaled to unit face.
    ///
    /// # Errors
    /// See [`RateCalibration::with_config`].
    pub fn new(model: M, zcb: &[Real], tenor: Time) -> Result<Self> {
        Self::with_config(model, zcb, tenor, &CalibrationConfig::default())
    }

    /// Calibrate `model` to `zcb` with explicit solver settings.
    ///
    /// # Errors
    /// * `InvalidParameter` for an empty curve, non-positive or non-finite
    ///   quotes, a non-positive tenor, or a root rate the model cannot
    ///   represent.
    /// * `CalibrationDivergence` when a theta cannot be fitted within the
    ///   configured tolerance.
    pub fn with_config(
        model: M,
        zcb: &[Real],
        tenor: Time,
        config: &CalibrationConfig,
    ) -> Result<Self> {
        ensure!(!zcb.is_empty(), "zero-coupon curve must not be empty");
        ensure!(tenor > 0.0, "tenor must be positive, got {tenor}");
        ensure!(
            zcb.iter().all(|z| z.is_finite() && *z > 0.0),
            "zero-coupon prices must be positive and finite"
        );

        let discount_factors = normalize_quotes(zcb);
        let dt = tenor / discount_factors.len() as Real;
        let r0 = -discount_factors[0].ln() / dt;
        let x0 = model.state(r0)?;

        let thetas = fit_thetas(&model, x0, dt, &discount_factors, config)?;
        let rates = model.rate_lattice(x0, dt, &thetas);

        tracing::info!(
            model = model.name(),
            steps = thetas.len(),
            r0,
            dt,
            "short-rate lattice calibrated"
        );

        Ok(Self {
            model,
            discount_factors,
            tenor,
            dt,
            thetas,
            rates,
        })
    }

    /// The calibrated model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Discount factors the lattice was fitted to (unit face).
    pub fn discount_factors(&self) -> &[DiscountFactor] {
        &self.discount_factors
    }

    /// Total horizon in years.
    pub fn tenor(&self) -> Time {
        self.tenor
    }

    /// Period length.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Number of quoted periods (= number of discount factors).
    pub fn periods(&self) -> usize {
        self.discount_factors.len()
    }

    /// Initial short rate.
    pub fn r0(&self) -> Rate {
        self.rates.root()
    }

    /// Fitted drifts, `θ_1 … θ_{n−1}` in maturity order.
    pub fn thetas(&self) -> &[Real] {
        &self.thetas
    }

    /// The calibrated short-rate lattice (`periods − 1` steps).
    pub fn rates(&self) -> &Lattice {
        &self.rates
    }

    /// Bond lattice of the longest quoted maturity under the final fit.
    pub fn bond_lattice(&self) -> Lattice {
        discount_bond_lattice(&self.rates, self.dt)
    }

    /// Discount factors repriced on the calibrated lattice, one per quote.
    pub fn model_discount_factors(&self) -> Result<Vec<DiscountFactor>> {
        (0..self.periods())
            .map(|k| Ok(discount_bond_lattice(&self.rates.truncated(k)?, self.dt).root()))
            .collect()
    }
}

/// Rescale per-100 quotes to unit face.
fn normalize_quotes(zcb: &[Real]) -> Vec<DiscountFactor> {
    match zcb.last() {
        Some(&last) if last > 1.0 => zcb.iter().map(|z| z / 100.0).collect(),
        _ => zcb.to_vec(),
    }
}

// ── Per-step fit ──────────────────────────────────────────────────────────────

/// Fit one theta per discount factor after the first.
///
/// `x0` is the root *state* (see [`ShortRateDynamics::state`]). The
/// returned vector has `discount_factors.len() − 1` entries.
///
/// # Errors
/// `CalibrationDivergence` for the first step that cannot be fitted.
pub fn fit_thetas<M>(
    model: &M,
    x0: Real,
    dt: Time,
    discount_factors: &[DiscountFactor],
    config: &CalibrationConfig,
) -> Result<Vec<Real>>
where
    M: ShortRateDynamics + ?Sized,
{
    let mut thetas = Vec::with_capacity(discount_factors.len().saturating_sub(1));
    for (step, &target) in discount_factors.iter().enumerate().skip(1) {
        let theta = fit_step(model, x0, dt, &thetas, step, target, config)?;
        thetas.push(theta);
    }
    Ok(thetas)
}

/// Solve for the drift of `step` with the earlier drifts held fixed.
fn fit_step<M>(
    model: &M,
    x0: Real,
    dt: Time,
    fitted: &[Real],
    step: usize,
    target: DiscountFactor,
    config: &CalibrationConfig,
) -> Result<Real>
where
    M: ShortRateDynamics + ?Sized,
{
    let residual = |theta: Real| bond_price(model, x0, dt, fitted, theta) - target;
    let divergence = |residual: Real, reason: String| Error::CalibrationDivergence {
        step,
        maturity: (step + 1) as Real * dt,
        target,
        residual,
        reason,
    };

    let theta = config
        .solver
        .solve(&residual, config.initial_guess, config.bracket_step)
        .map_err(|e| match e {
            Error::NoConvergence { .. } | Error::Precondition(_) => divergence(Real::NAN, e.to_string()),
            other => other,
        })?;

    let r = residual(theta);
    if !(r.abs() <= config.residual_tolerance) {
        return Err(divergence(
            r,
            format!("residual above tolerance {:e}", config.residual_tolerance),
        ));
    }
    tracing::debug!(step, theta, residual = r, "theta fitted");
    Ok(theta)
}

/// Model price of the bond maturing one period after the trial step.
fn bond_price<M>(model: &M, x0: Real, dt: Time, fitted: &[Real], theta: Real) -> DiscountFactor
where
    M: ShortRateDynamics + ?Sized,
{
    let mut trial = Vec::with_capacity(fitted.len() + 1);
    trial.extend_from_slice(fitted);
    trial.push(theta);
    discount_bond_lattice(&model.rate_lattice(x0, dt, &trial), dt).root()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

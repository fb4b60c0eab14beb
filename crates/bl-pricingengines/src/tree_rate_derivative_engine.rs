//! Caps, floors, swaps and swaptions on a calibrated short-rate lattice.
//!
//! Cash flows are fixed at each node from the node rate converted to
//! continuous compounding, [`ctns_rate`], and paid one period later. The
//! rollback always uses the model's ½/½ branch probabilities, never a CRR
//! risk-neutral `p`.

use bl_core::{
    ensure,
    errors::{Error, Result},
    DiscountFactor, Rate, Real, Time,
};
use bl_instruments::RateDerivativeType;
use bl_math::Solver1D;
use bl_methods::{discounted_cash_flow_lattice, discounted_payoff_lattice, Lattice};
use bl_models::{RateCalibration, ShortRateDynamics};

/// Notional used by [`TreeRateDerivativeEngine::fair_swap`].
pub const DEFAULT_NOTIONAL: Real = 100.0;

/// Starting point of the numeric swap-rate search.
const SWAP_RATE_GUESS: Rate = 0.001;
const SWAP_RATE_STEP: Real = 0.01;

/// Continuous-compounding equivalent `(e^{rΔt} − 1) / Δt` of a period rate.
pub fn ctns_rate(rate: Rate, dt: Time) -> Rate {
    (rate * dt).exp_m1() / dt
}

/// Par swap rate `(1 − Z_{k−1}) / (Δt · Σ Z_i)` over the given discount
/// factors.
///
/// # Errors
/// `InvalidParameter` for an empty curve or non-positive `dt`.
pub fn fair_swap_rate(discount_factors: &[DiscountFactor], dt: Time) -> Result<Rate> {
    ensure!(dt > 0.0, "period length must be positive, got {dt}");
    let last = match discount_factors.last() {
        Some(&z) => z,
        None => return Err(Error::InvalidParameter("empty discount curve".into())),
    };
    let annuity: Real = discount_factors.iter().sum();
    Ok((1.0 - last) / (dt * annuity))
}

/// Interest-rate derivative pricer over a fixed horizon.
///
/// Holds the calibrated rate lattice cut to the horizon, the matching
/// discount factors, and the analytic par swap rate computed once on
/// construction.
#[derive(Debug, Clone)]
pub struct TreeRateDerivativeEngine {
    rates: Lattice,
    discount_factors: Vec<DiscountFactor>,
    dt: Time,
    swap_rate: Rate,
}

impl TreeRateDerivativeEngine {
    /// Engine pricing over the first `periods` periods of `calibration`.
    ///
    /// # Errors
    /// * `InvalidParameter` if `periods == 0`.
    /// * `OutOfRange` if `periods` exceeds the calibrated curve.
    pub fn new<M: ShortRateDynamics>(calibration: &RateCalibration<M>, periods: usize) -> Result<Self> {
        ensure!(periods > 0, "pricing horizon must cover at least one period");
        if periods > calibration.periods() {
            return Err(Error::OutOfRange {
                requested: periods,
                available: calibration.periods(),
            });
        }
        let dt = calibration.dt();
        let rates = calibration.rates().truncated(periods - 1)?;
        let discount_factors = calibration.discount_factors()[..periods].to_vec();
        let swap_rate = fair_swap_rate(&discount_factors, dt)?;
        tracing::debug!(periods, swap_rate, "rate derivative engine ready");
        Ok(Self {
            rates,
            discount_factors,
            dt,
            swap_rate,
        })
    }

    /// Number of accrual periods in the horizon.
    pub fn periods(&self) -> usize {
        self.rates.size()
    }

    /// Period length.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// The rate lattice over the horizon.
    pub fn rates(&self) -> &Lattice {
        &self.rates
    }

    /// Discount factors over the horizon.
    pub fn discount_factors(&self) -> &[DiscountFactor] {
        &self.discount_factors
    }

    /// Analytic par swap rate, the default strike of swaps and swaptions.
    pub fn swap_rate(&self) -> Rate {
        self.swap_rate
    }

    /// Per-node cash flows of `kind` struck at `strike`.
    pub fn cash_flows(&self, kind: RateDerivativeType, strike: Rate, notional: Real) -> Lattice {
        let dt = self.dt;
        Lattice::from_fn(self.rates.steps(), |i, j| {
            kind.cash_flow(ctns_rate(self.rates.value(i, j), dt), strike, dt, notional)
        })
    }

    /// Value lattice of `kind` struck at `strike`.
    pub fn option(&self, kind: RateDerivativeType, strike: Rate, notional: Real) -> Lattice {
        let cash_flows = self.cash_flows(kind, strike, notional);
        let values = discounted_cash_flow_lattice(&self.rates, &cash_flows, self.dt);
        tracing::debug!(%kind, strike, notional, npv = values.root(), "rate derivative priced");
        values
    }

    /// Value of `kind` at the root.
    pub fn npv(&self, kind: RateDerivativeType, strike: Rate, notional: Real) -> Real {
        self.option(kind, strike, notional).root()
    }

    /// Value lattice of the par swap on [`DEFAULT_NOTIONAL`].
    pub fn fair_swap(&self) -> Lattice {
        self.option(RateDerivativeType::Swap, self.swap_rate, DEFAULT_NOTIONAL)
    }

    /// European swaption on the par swap, exercisable at step `expiry`.
    ///
    /// The payoff at `expiry` is `max(V_swap − K, 0)` with `K` defaulting to
    /// [`swap_rate`](Self::swap_rate); it is rolled back on the rate lattice.
    ///
    /// # Errors
    /// `OutOfRange` if `expiry` is beyond the last lattice step.
    pub fn swaption(&self, expiry: usize, strike: Option<Real>) -> Result<Lattice> {
        if expiry > self.rates.steps() {
            return Err(Error::OutOfRange {
                requested: expiry,
                available: self.rates.steps(),
            });
        }
        let strike = strike.unwrap_or(self.swap_rate);
        let swap = self.fair_swap();
        let payoff = swap
            .column(expiry)
            .iter()
            .map(|v| (v - strike).max(0.0))
            .collect();
        let values = discounted_payoff_lattice(&self.rates.truncated(expiry)?, payoff, self.dt);
        tracing::debug!(expiry, strike, npv = values.root(), "swaption priced");
        Ok(values)
    }

    /// Fixed rate that zeroes the swap value on the lattice.
    ///
    /// Needs no discount curve; agrees with [`swap_rate`](Self::swap_rate)
    /// up to the calibration residual.
    ///
    /// # Errors
    /// Propagates solver failures.
    pub fn fit_swap_rate(&self, solver: &Solver1D) -> Result<Rate> {
        solver.solve(
            |c| self.npv(RateDerivativeType::Swap, c, 1.0),
            SWAP_RATE_GUESS,
            SWAP_RATE_STEP,
        )
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

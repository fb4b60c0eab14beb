//! Additive short-rate lattices and their rollbacks.
//!
//! The Ho-Lee and Black-Derman-Toy trees share one forward build in a
//! *state* variable `x` (the rate itself for Ho-Lee, its logarithm for
//! BDT):
//!
//! ```text
//! x(i+1, 0) = x(i, 0) + θ_i·Δt + σ√Δt
//! x(i+1, j) = x(i+1, 0) − 2·j·σ√Δt
//! ```
//!
//! Every column is shifted down by a constant increment instead of being
//! scaled by `u`/`d`. Rollbacks on these trees always use the equal
//! branch probability [`EQUAL_PROBABILITY`].

use super::{backward_induction, Lattice};
use bl_core::{Real, Time, Volatility};

/// Branch probability of the short-rate trees (both branches).
pub const EQUAL_PROBABILITY: Real = 0.5;

/// Forward-build the state lattice from `x0` with one drift per step.
///
/// The result has `thetas.len()` steps.
pub fn additive_lattice(x0: Real, sigma: Volatility, dt: Time, thetas: &[Real]) -> Lattice {
    let shock = sigma * dt.sqrt();
    let mut lattice = Lattice::new(thetas.len());
    lattice.set(0, 0, x0);
    let mut top = x0;
    for (i, theta) in thetas.iter().enumerate() {
        top += theta * dt + shock;
        for (j, x) in lattice.column_mut(i + 1).iter_mut().enumerate() {
            *x = top - 2.0 * j as Real * shock;
        }
    }
    lattice
}

/// Price lattice of the zero-coupon bond paying 1 one period after the
/// last column of `rates`.
///
/// The result has `rates.steps() + 1` steps and a terminal column of ones;
/// its root is the model discount factor for maturity
/// `(rates.steps() + 1) · dt`.
pub fn discount_bond_lattice(rates: &Lattice, dt: Time) -> Lattice {
    backward_induction(vec![1.0; rates.size() + 1], |i, j, up, down| {
        (-rates.value(i, j) * dt).exp() * EQUAL_PROBABILITY * (up + down)
    })
}

/// Value lattice of a strip of per-node cash flows paid in arrears.
///
/// Each cash flow fixed at `(i, j)` is discounted over its own period with
/// the node rate; earlier nodes add the expected discounted continuation:
///
/// ```text
/// V(n, j) = e^{−r(n,j)Δt} · cf(n, j)
/// V(i, j) = e^{−r(i,j)Δt} · (½ V(i+1, j) + ½ V(i+1, j+1) + cf(i, j))
/// ```
///
/// # Panics
/// Panics if `cash_flows` and `rates` have different step counts.
pub fn discounted_cash_flow_lattice(rates: &Lattice, cash_flows: &Lattice, dt: Time) -> Lattice {
    assert_eq!(
        rates.steps(),
        cash_flows.steps(),
        "rate and cash-flow lattices must have the same number of steps"
    );
    let n = rates.steps();
    let terminal = rates
        .terminal()
        .iter()
        .zip(cash_flows.terminal())
        .map(|(r, cf)| (-r * dt).exp() * cf)
        .collect();
    backward_induction(terminal, |i, j, up, down| {
        debug_assert!(i < n);
        (-rates.value(i, j) * dt).exp()
            * (EQUAL_PROBABILITY * up + (1.0 - EQUAL_PROBABILITY) * down + cash_flows.value(i, j))
    })
}

/// Value lattice of a payoff received at the last column of `rates`.
///
/// The payoff itself is the terminal column (no discounting at expiry);
/// earlier nodes are `e^{−r(i,j)Δt} · (½ V(i+1, j) + ½ V(i+1, j+1))`.
///
/// # Panics
/// Panics if `payoff.len() != rates.size()`.
pub fn discounted_payoff_lattice(rates: &Lattice, payoff: Vec<Real>, dt: Time) -> Lattice {
    assert_eq!(
        payoff.len(),
        rates.size(),
        "payoff must cover the terminal column"
    );
    backward_induction(payoff, |i, j, up, down| {
        (-rates.value(i, j) * dt).exp()
            * (EQUAL_PROBABILITY * up + (1.0 - EQUAL_PROBABILITY) * down)
    })
}

//! Recombining multiplicative binomial trees.
//!
//! Two parameterisations are available:
//!
//! | Constructor | Up / down | Probability |
//! |---|---|---|
//! | [`BinomialTree::cox_ross_rubinstein`] | `u = e^{σ√Δt}`, `d = 1/u` | `(e^{(r−q)Δt} − d) / (u − d)` |
//! | [`BinomialTree::with_factors`] | supplied | `(1 + r − d) / (u − d)` |
//!
//! Node `(i, j)` holds `x0 · u^(i−j) · d^j`.

use super::Lattice;
use bl_core::{ensure, errors::Result, ArbitrageWarning, Rate, Real, Time, Volatility};

/// A recombining multiplicative binomial tree.
///
/// The tree has `steps + 1` time layers, with layer `i` having `i + 1`
/// nodes. Construction never fails on an arbitrage-admitting probability;
/// the condition is logged and kept in [`BinomialTree::arbitrage_warning`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinomialTree {
    x0: Real,
    dt: Time,
    steps: usize,
    up: Real,
    down: Real,
    pu: Real,
    warning: Option<ArbitrageWarning>,
}

impl BinomialTree {
    // ── Named constructors ───────────────────────────────────────────────

    /// Cox-Ross-Rubinstein tree over `tenor` years.
    ///
    /// `u = exp(σ√Δt)`, `d = 1/u`, `p = (exp((r − q)Δt) − d) / (u − d)`.
    ///
    /// # Errors
    /// `InvalidParameter` if `steps == 0`, `tenor <= 0` or `volatility <= 0`.
    pub fn cox_ross_rubinstein(
        x0: Real,
        rate: Rate,
        dividend: Rate,
        volatility: Volatility,
        tenor: Time,
        steps: usize,
    ) -> Result<Self> {
        ensure!(steps > 0, "number of steps must be positive");
        ensure!(tenor > 0.0, "tenor must be positive, got {tenor}");
        ensure!(volatility > 0.0, "volatility must be positive, got {volatility}");
        ensure!(x0.is_finite(), "root value must be finite, got {x0}");

        let dt = tenor / steps as Real;
        let up = (volatility * dt.sqrt()).exp();
        let down = 1.0 / up;
        let pu = (((rate - dividend) * dt).exp() - down) / (up - down);
        Ok(Self::assemble(x0, dt, steps, up, down, pu))
    }

    /// Tree with manually chosen multipliers (binomial asset pricing model).
    ///
    /// `rate` is the simple interest rate per period:
    /// `p = (1 + r − d) / (u − d)`.
    ///
    /// # Errors
    /// `InvalidParameter` unless `steps > 0`, `dt > 0` and `up > down > 0`.
    pub fn with_factors(
        x0: Real,
        rate: Rate,
        dt: Time,
        steps: usize,
        up: Real,
        down: Real,
    ) -> Result<Self> {
        ensure!(steps > 0, "number of steps must be positive");
        ensure!(dt > 0.0, "time step must be positive, got {dt}");
        ensure!(down > 0.0, "down factor must be positive, got {down}");
        ensure!(up > down, "up factor ({up}) must exceed down factor ({down})");
        ensure!(x0.is_finite(), "root value must be finite, got {x0}");

        let pu = (1.0 + rate - down) / (up - down);
        Ok(Self::assemble(x0, dt, steps, up, down, pu))
    }

    fn assemble(x0: Real, dt: Time, steps: usize, up: Real, down: Real, pu: Real) -> Self {
        let warning = ArbitrageWarning::check(pu, up, down);
        if let Some(w) = &warning {
            tracing::warn!(probability = w.probability, up, down, "tree admits arbitrage");
        }
        Self {
            x0,
            dt,
            steps,
            up,
            down,
            pu,
            warning,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Root value (spot price).
    pub fn x0(&self) -> Real {
        self.x0
    }

    /// Up multiplier.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Down multiplier.
    pub fn down(&self) -> Real {
        self.down
    }

    /// Up-move probability.
    pub fn probability_up(&self) -> Real {
        self.pu
    }

    /// Down-move probability.
    pub fn probability_down(&self) -> Real {
        1.0 - self.pu
    }

    /// Set when the up probability is outside `(0, 1)`.
    pub fn arbitrage_warning(&self) -> Option<ArbitrageWarning> {
        self.warning
    }

    /// Number of nodes at time step `i` (always `i + 1`).
    pub fn size(&self, i: usize) -> usize {
        i + 1
    }

    /// Underlying value at node `(i, index)`.
    pub fn underlying(&self, i: usize, index: usize) -> Real {
        debug_assert!(index <= i);
        self.x0 * self.up.powi((i - index) as i32) * self.down.powi(index as i32)
    }

    // ── Lattices ─────────────────────────────────────────────────────────

    /// Underlying values at maturity only.
    ///
    /// Enough for European payoffs, where intermediate nodes are never
    /// compared against intrinsic value.
    pub fn terminal_values(&self) -> Vec<Real> {
        (0..self.size(self.steps))
            .map(|j| self.underlying(self.steps, j))
            .collect()
    }

    /// The full underlying lattice.
    pub fn lattice(&self) -> Lattice {
        Lattice::from_fn(self.steps, |i, j| self.underlying(i, j))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bl_core::Error;
    use proptest::prelude::*;

    fn crr() -> BinomialTree {
        BinomialTree::cox_ross_rubinstein(100.0, 0.05, 0.0, 0.2, 1.0, 3).unwrap()
    }

    #[test]
    fn crr_factors() {
        let tree = crr();
        let dt: Real = 1.0 / 3.0;
        assert_abs_diff_eq!(tree.dt(), dt, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.up(), (0.2 * dt.sqrt()).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(tree.up() * tree.down(), 1.0, epsilon = 1e-14);
        let p = ((0.05 * dt).exp() - tree.down()) / (tree.up() - tree.down());
        assert_abs_diff_eq!(tree.probability_up(), p, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.probability_up() + tree.probability_down(), 1.0);
        assert!(tree.arbitrage_warning().is_none());
    }

    #[test]
    fn dividend_lowers_up_probability() {
        let no_div = crr();
        let div = BinomialTree::cox_ross_rubinstein(100.0, 0.05, 0.03, 0.2, 1.0, 3).unwrap();
        assert!(div.probability_up() < no_div.probability_up());
    }

    #[test]
    fn lattice_layout() {
        let tree = crr();
        let l = tree.lattice();
        assert_eq!(l.steps(), 3);
        assert_abs_diff_eq!(l.root(), 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(l.value(1, 0), 100.0 * tree.up(), epsilon = 1e-12);
        assert_abs_diff_eq!(l.value(1, 1), 100.0 * tree.down(), epsilon = 1e-12);
        // up then down returns to the root value
        assert_abs_diff_eq!(l.value(2, 1), 100.0, epsilon = 1e-12);
        assert_eq!(l.terminal(), tree.terminal_values().as_slice());
    }

    #[test]
    fn invalid_inputs_rejected() {
        for (tenor, vol, steps) in [(0.0, 0.2, 3), (-1.0, 0.2, 3), (1.0, 0.0, 3), (1.0, -0.1, 3), (1.0, 0.2, 0)] {
            assert!(
                matches!(
                    BinomialTree::cox_ross_rubinstein(100.0, 0.05, 0.0, vol, tenor, steps),
                    Err(Error::InvalidParameter(_))
                ),
                "tenor={tenor} vol={vol} steps={steps}"
            );
        }
    }

    #[test]
    fn manual_factors() {
        // Shreve's textbook example: S0 = 4, u = 2, d = 1/2, r = 1/4 → p = 1/2.
        let tree = BinomialTree::with_factors(4.0, 0.25, 1.0, 3, 2.0, 0.5).unwrap();
        assert_abs_diff_eq!(tree.probability_up(), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.underlying(3, 0), 32.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tree.underlying(3, 3), 0.5, epsilon = 1e-12);
        assert!(BinomialTree::with_factors(4.0, 0.25, 1.0, 3, 0.5, 2.0).is_err());
        assert!(BinomialTree::with_factors(4.0, 0.25, 1.0, 3, 2.0, 0.0).is_err());
    }

    #[test]
    fn arbitrage_is_a_warning_not_an_error() {
        // r = 150 % per period exceeds u - 1 → p > 1.
        let tree = BinomialTree::with_factors(4.0, 1.5, 1.0, 2, 2.0, 0.5).unwrap();
        let w = tree.arbitrage_warning().expect("warning expected");
        assert!(w.probability > 1.0);
        assert_eq!(tree.lattice().steps(), 2);

        // Huge drift over one coarse step pushes CRR p above 1 as well.
        let crr = BinomialTree::cox_ross_rubinstein(100.0, 5.0, 0.0, 0.01, 1.0, 1).unwrap();
        assert!(crr.arbitrage_warning().is_some());
    }

    proptest! {
        #[test]
        fn crr_lattice_recombines(
            vol in 0.01f64..1.0,
            tenor in 0.1f64..5.0,
            steps in 1usize..60,
        ) {
            let tree = BinomialTree::cox_ross_rubinstein(100.0, 0.03, 0.0, vol, tenor, steps).unwrap();
            prop_assert!((tree.up() * tree.down() - 1.0).abs() < 1e-12);
            let l = tree.lattice();
            for i in 0..steps {
                for j in 0..=i {
                    let s = l.value(i, j);
                    let tol = 1e-9 * s.max(1.0);
                    // up move from (i, j) lands on (i + 1, j)
                    prop_assert!((s * tree.up() - l.value(i + 1, j)).abs() < tol);
                    // down move from (i, j) lands on (i + 1, j + 1)
                    prop_assert!((s * tree.down() - l.value(i + 1, j + 1)).abs() < tol);
                }
            }
        }
    }
}

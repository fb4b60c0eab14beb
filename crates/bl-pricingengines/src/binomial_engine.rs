//! Binomial-tree engine for vanilla equity options.
//!
//! European values only need the terminal stock column; American values
//! compare continuation against intrinsic value at every node and so roll
//! back over the full stock lattice.
//!
//! Both roll back with
//!
//! ```text
//! V(i, j) = e^{−rΔt} · (p · V(i+1, j) + (1 − p) · V(i+1, j+1))
//! ```

use bl_core::{ensure, errors::Result, ArbitrageWarning, Real, Time};
use bl_instruments::{ExerciseType, OptionType, Parameters, Payoff, PlainVanillaPayoff};
use bl_methods::{backward_induction, BinomialTree, Lattice};

/// Stock lattice plus the four vanilla value lattices of one model.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLattices {
    /// Underlying prices.
    pub stock: Lattice,
    /// European call values.
    pub european_call: Lattice,
    /// European put values.
    pub european_put: Lattice,
    /// American call values.
    pub american_call: Lattice,
    /// American put values.
    pub american_put: Lattice,
}

/// Vanilla option pricer on a recombining binomial tree.
///
/// Owns its [`Parameters`] and the tree derived from them. Pricing never
/// mutates the model, so one instance can value any number of payoffs.
#[derive(Debug, Clone)]
pub struct BinomialTreeModel {
    params: Parameters,
    tree: BinomialTree,
}

impl BinomialTreeModel {
    /// Cox-Ross-Rubinstein model with `steps` steps over `params.tau()`.
    ///
    /// # Errors
    /// `InvalidParameter` if `steps == 0`, the tenor is zero or the
    /// volatility is not positive.
    pub fn new(params: Parameters, steps: usize) -> Result<Self> {
        let tree = BinomialTree::cox_ross_rubinstein(
            params.spot(),
            params.rate(),
            params.dividend(),
            params.volatility(),
            params.tau(),
            steps,
        )?;
        Ok(Self { params, tree })
    }

    /// Binomial asset pricing model with manually chosen `up` and `down`.
    ///
    /// `params.rate()` is read as the simple rate per period.
    ///
    /// # Errors
    /// `InvalidParameter` if `steps == 0`, the tenor is zero or the factors
    /// do not satisfy `up > down > 0`.
    pub fn with_factors(params: Parameters, steps: usize, up: Real, down: Real) -> Result<Self> {
        ensure!(steps > 0, "number of steps must be positive");
        ensure!(params.tau() > 0.0, "tenor must be positive, got {}", params.tau());
        let dt = params.tau() / steps as Real;
        let tree = BinomialTree::with_factors(params.spot(), params.rate(), dt, steps, up, down)?;
        Ok(Self { params, tree })
    }

    /// The option parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// The underlying tree.
    pub fn tree(&self) -> &BinomialTree {
        &self.tree
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.tree.steps()
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.tree.dt()
    }

    /// Set when the tree's up probability lies outside `(0, 1)`.
    pub fn arbitrage_warning(&self) -> Option<ArbitrageWarning> {
        self.tree.arbitrage_warning()
    }

    /// The full underlying lattice.
    pub fn stock_lattice(&self) -> Lattice {
        self.tree.lattice()
    }

    fn discount(&self) -> Real {
        (-self.params.rate() * self.tree.dt()).exp()
    }

    /// European value lattice for `option_type`.
    pub fn european(&self, option_type: OptionType) -> Lattice {
        let payoff = PlainVanillaPayoff::new(option_type, self.params.strike());
        let terminal = payoff.column(&self.tree.terminal_values());
        let (df, p) = (self.discount(), self.tree.probability_up());
        let values = backward_induction(terminal, |_, _, up, down| df * (p * up + (1.0 - p) * down));
        tracing::debug!(%option_type, npv = values.root(), "european option priced");
        values
    }

    /// American value lattice for `option_type`.
    pub fn american(&self, option_type: OptionType) -> Lattice {
        let stock = self.tree.lattice();
        self.american_on(&stock, option_type)
    }

    fn american_on(&self, stock: &Lattice, option_type: OptionType) -> Lattice {
        let payoff = PlainVanillaPayoff::new(option_type, self.params.strike());
        let terminal = payoff.column(stock.terminal());
        let (df, p) = (self.discount(), self.tree.probability_up());
        let values = backward_induction(terminal, |i, j, up, down| {
            let continuation = df * (p * up + (1.0 - p) * down);
            payoff.value(stock.value(i, j)).max(continuation)
        });
        tracing::debug!(%option_type, npv = values.root(), "american option priced");
        values
    }

    /// Value lattice for the given option type and exercise style.
    pub fn value_lattice(&self, option_type: OptionType, exercise: ExerciseType) -> Lattice {
        if exercise.allows_early_exercise() {
            self.american(option_type)
        } else {
            self.european(option_type)
        }
    }

    /// Fair value at `t = start`.
    pub fn npv(&self, option_type: OptionType, exercise: ExerciseType) -> Real {
        self.value_lattice(option_type, exercise).root()
    }

    /// Stock lattice and all four vanilla value lattices.
    pub fn price_all(&self) -> OptionLattices {
        let stock = self.tree.lattice();
        OptionLattices {
            european_call: self.european(OptionType::Call),
            european_put: self.european(OptionType::Put),
            american_call: self.american_on(&stock, OptionType::Call),
            american_put: self.american_on(&stock, OptionType::Put),
            stock,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

//! Short-rate lattice dynamics.
//!
//! Both supported models evolve a state variable `x` additively on the
//! lattice (see [`bl_methods::additive_lattice`]); they differ only in how
//! the state maps to the short rate.

use bl_core::{errors::Result, Rate, Real, Time, Volatility};
use bl_methods::{additive_lattice, Lattice};
use std::fmt;

/// A one-factor short-rate model on an equal-probability additive lattice.
pub trait ShortRateDynamics: fmt::Debug + Send + Sync {
    /// Model name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Volatility of the state variable per unit time.
    fn volatility(&self) -> Volatility;

    /// Lattice state corresponding to `rate`.
    ///
    /// # Errors
    /// `InvalidParameter` if the model cannot represent `rate`.
    fn state(&self, rate: Rate) -> Result<Real>;

    /// Short rate corresponding to a lattice state.
    fn rate(&self, state: Real) -> Rate;

    /// Forward-build the short-rate lattice from the root state `x0`.
    ///
    /// The result has one step per entry of `thetas`.
    fn rate_lattice(&self, x0: Real, dt: Time, thetas: &[Real]) -> Lattice {
        additive_lattice(x0, self.volatility(), dt, thetas).map(|&x| self.rate(x))
    }
}

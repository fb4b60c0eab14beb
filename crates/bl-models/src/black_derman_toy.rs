//! Black-Derman-Toy short-rate model.
//!
//! ```text
//! d ln r = θ(t) dt + σ dW
//! ```
//!
//! The lattice tracks `ln r` and exponentiates before discounting, so every
//! node rate is strictly positive. `σ` is the volatility of the log rate.

use crate::short_rate_model::ShortRateDynamics;
use bl_core::{ensure, errors::Result, Rate, Real, Volatility};

/// Black-Derman-Toy model with constant log-rate volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackDermanToy {
    sigma: Volatility,
}

impl BlackDermanToy {
    /// Create a BDT model with log-rate volatility `sigma`.
    ///
    /// # Errors
    /// `InvalidParameter` if `sigma <= 0`.
    pub fn new(sigma: Volatility) -> Result<Self> {
        ensure!(sigma > 0.0, "BDT volatility must be positive, got {sigma}");
        Ok(Self { sigma })
    }
}

impl ShortRateDynamics for BlackDermanToy {
    fn name(&self) -> &'static str {
        "Black-Derman-Toy"
    }

    fn volatility(&self) -> Volatility {
        self.sigma
    }

    fn state(&self, rate: Rate) -> Result<Real> {
        ensure!(
            rate > 0.0 && rate.is_finite(),
            "BDT needs a positive initial short rate, got {rate}"
        );
        Ok(rate.ln())
    }

    fn rate(&self, state: Real) -> Rate {
        state.exp()
    }
}

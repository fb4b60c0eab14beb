//! Ho-Lee short-rate model.
//!
//! ```text
//! dr = θ(t) dt + σ dW
//! ```
//!
//! The lattice is additive in the rate itself. Nothing floors the rate, so
//! low curves with high volatility produce negative nodes.

use crate::short_rate_model::ShortRateDynamics;
use bl_core::{ensure, errors::Result, Rate, Real, Volatility};

/// Ho-Lee model with constant normal volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoLee {
    sigma: Volatility,
}

impl HoLee {
    /// Create a Ho-Lee model with annualised volatility `sigma`.
    ///
    /// # Errors
    /// `InvalidParameter` if `sigma <= 0`.
    pub fn new(sigma: Volatility) -> Result<Self> {
        ensure!(sigma > 0.0, "Ho-Lee volatility must be positive, got {sigma}");
        Ok(Self { sigma })
    }
}

impl ShortRateDynamics for HoLee {
    fn name(&self) -> &'static str {
        "Ho-Lee"
    }

    fn volatility(&self) -> Volatility {
        self.sigma
    }

    fn state(&self, rate: Rate) -> Result<Real> {
        ensure!(rate.is_finite(), "short rate must be finite, got {rate}");
        Ok(rate)
    }

    fn rate(&self, state: Real) -> Rate {
        state
    }
}

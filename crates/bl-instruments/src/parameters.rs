//! Option pricing parameters.

use bl_core::{ensure, errors::Result, Price, Rate, Real, Time, Volatility};
use std::fmt;

/// Immutable inputs of an equity option valuation.
///
/// The tenor `tau = expiry - start` is derived on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    spot: Price,
    strike: Price,
    start: Time,
    expiry: Time,
    rate: Rate,
    dividend: Rate,
    volatility: Volatility,
}

impl Parameters {
    /// Create a parameter set.
    ///
    /// # Errors
    /// `InvalidParameter` if any input is non-finite or `expiry < start`.
    pub fn new(
        spot: Price,
        strike: Price,
        start: Time,
        expiry: Time,
        rate: Rate,
        dividend: Rate,
        volatility: Volatility,
    ) -> Result<Self> {
        let inputs = [spot, strike, start, expiry, rate, dividend, volatility];
        ensure!(
            inputs.iter().all(|x| x.is_finite()),
            "parameters must be finite, got {inputs:?}"
        );
        ensure!(
            expiry >= start,
            "expiry ({expiry}) must not precede start ({start})"
        );
        Ok(Self {
            spot,
            strike,
            start,
            expiry,
            rate,
            dividend,
            volatility,
        })
    }

    /// Spot price of the underlying at `start`.
    pub fn spot(&self) -> Price {
        self.spot
    }

    /// Strike price.
    pub fn strike(&self) -> Price {
        self.strike
    }

    /// Valuation start time.
    pub fn start(&self) -> Time {
        self.start
    }

    /// Expiry time.
    pub fn expiry(&self) -> Time {
        self.expiry
    }

    /// Time to maturity, `expiry - start`.
    pub fn tau(&self) -> Time {
        self.expiry - self.start
    }

    /// Continuously compounded risk-free rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Continuous dividend yield.
    pub fn dividend(&self) -> Rate {
        self.dividend
    }

    /// Annualised volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Copy with a different strike.
    pub fn with_strike(self, strike: Real) -> Result<Self> {
        Self::new(
            self.spot,
            strike,
            self.start,
            self.expiry,
            self.rate,
            self.dividend,
            self.volatility,
        )
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:10}: {}", "spot", self.spot)?;
        writeln!(f, "{:10}: {}", "strike", self.strike)?;
        writeln!(f, "{:10}: {}", "start", self.start)?;
        writeln!(f, "{:10}: {}", "expiry", self.expiry)?;
        writeln!(f, "{:10}: {}", "tau", self.tau())?;
        writeln!(f, "{:10}: {}", "rate", self.rate)?;
        writeln!(f, "{:10}: {}", "dividend", self.dividend)?;
        write!(f, "{:10}: {}", "volatility", self.volatility)
    }
}

//! Interest-rate derivatives priced on a short-rate lattice.

use bl_core::{errors::Error, Real};
use std::fmt;
use std::str::FromStr;

/// Kind of per-period cash flow generated at every rate-lattice node.
///
/// With `c` the strike (fixed) rate, `N` the notional and `r` the
/// per-period rate converted to continuous compounding:
///
/// | Kind | Cash flow |
/// |---|---|
/// | Cap | `dt · N · max(r − c, 0)` |
/// | Floor | `dt · N · max(c − r, 0)` |
/// | Swap | `dt · N · (r − c)` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateDerivativeType {
    /// Strip of caplets.
    Cap,
    /// Strip of floorlets.
    Floor,
    /// Payer swap (receive floating, pay fixed).
    Swap,
}

impl RateDerivativeType {
    /// Cash flow of one accrual period.
    pub fn cash_flow(self, rate: Real, strike: Real, dt: Real, notional: Real) -> Real {
        let spread = match self {
            RateDerivativeType::Cap => (rate - strike).max(0.0),
            RateDerivativeType::Floor => (strike - rate).max(0.0),
            RateDerivativeType::Swap => rate - strike,
        };
        dt * notional * spread
    }
}

impl fmt::Display for RateDerivativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateDerivativeType::Cap => write!(f, "cap"),
            RateDerivativeType::Floor => write!(f, "floor"),
            RateDerivativeType::Swap => write!(f, "swap"),
        }
    }
}

impl FromStr for RateDerivativeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cap" => Ok(RateDerivativeType::Cap),
            "floor" => Ok(RateDerivativeType::Floor),
            "swap" => Ok(RateDerivativeType::Swap),
            other => Err(Error::InvalidParameter(format!(
                "unknown rate derivative '{other}', expected cap, floor or swap"
            ))),
        }
    }
}

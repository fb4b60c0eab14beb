//! Vanilla exercise values evaluated at lattice nodes.

use bl_core::{errors::Error, Price, Real};
use std::fmt;
use std::str::FromStr;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// `φ = +1` for a call, `−1` for a put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(Error::InvalidParameter(format!(
                "unknown option type '{other}', expected call or put"
            ))),
        }
    }
}

/// Exercise value as a function of the underlying at a node.
pub trait Payoff: fmt::Debug + Send + Sync {
    /// Value received when exercising against `underlying`.
    fn value(&self, underlying: Price) -> Real;

    /// Exercise values of a whole lattice column.
    fn column(&self, underlying: &[Price]) -> Vec<Real> {
        underlying.iter().map(|&s| self.value(s)).collect()
    }
}

/// `max(φ(S − K), 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlainVanillaPayoff {
    option_type: OptionType,
    strike: Price,
}

impl PlainVanillaPayoff {
    /// Vanilla payoff of `option_type` struck at `strike`.
    pub fn new(option_type: OptionType, strike: Price) -> Self {
        Self { option_type, strike }
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Strike price.
    pub fn strike(&self) -> Price {
        self.strike
    }
}

impl Payoff for PlainVanillaPayoff {
    fn value(&self, underlying: Price) -> Real {
        (self.option_type.sign() * (underlying - self.strike)).max(0.0)
    }
}

impl fmt::Display for PlainVanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.option_type, self.strike)
    }
}

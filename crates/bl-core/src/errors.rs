//! Error types for binolattice.
//!
//! A single `thiserror`-derived enum covers every failure the lattice
//! builders, calibrators and pricers can report. Parameter checks go
//! through the [`ensure!`](crate::ensure) macro.
//!
//! [`ArbitrageWarning`] is not an error. A binomial tree whose risk-neutral
//! probability leaves `(0, 1)` can still be rolled back; the condition is
//! reported alongside the result.

use crate::{Real, Time};
use std::fmt;
use thiserror::Error;

/// The top-level error type used throughout binolattice.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A construction argument is outside its valid domain
    /// (non-positive tenor, volatility or step count, malformed curve, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The per-step short-rate fit could not reprice the observed
    /// discount factor.
    #[error(
        "calibration diverged at step {step} (maturity {maturity}): \
         target {target}, residual {residual:e}: {reason}"
    )]
    CalibrationDivergence {
        /// Index of the theta being fitted (1-based maturity index).
        step: usize,
        /// Maturity in years of the discount factor being matched.
        maturity: Time,
        /// Observed discount factor.
        target: Real,
        /// Residual of the best candidate, `NaN` if none was produced.
        residual: Real,
        /// Underlying solver message.
        reason: String,
    },

    /// A horizon beyond the calibrated or priced lattice was requested.
    #[error("horizon {requested} out of range: lattice provides {available}")]
    OutOfRange {
        /// The requested step / period count.
        requested: usize,
        /// The largest value the lattice supports.
        available: usize,
    },

    /// A root finder exhausted its iteration budget.
    #[error("{solver}: no convergence after {iterations} iterations")]
    NoConvergence {
        /// Name of the solver.
        solver: &'static str,
        /// Iteration budget that was exhausted.
        iterations: u32,
    },

    /// A solver precondition (typically bracketing) was violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),
}

/// Shorthand `Result` type used throughout binolattice.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidParameter(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use bl_core::{ensure, errors::Error};
/// fn positive(x: f64) -> bl_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidParameter(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidParameter(
                format!($($msg)*)
            ));
        }
    };
}

/// Risk-neutral probability outside `(0, 1)`.
///
/// The tree admits arbitrage and prices derived from it are unreliable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbitrageWarning {
    /// The offending up-move probability.
    pub probability: Real,
    /// Up multiplier.
    pub up: Real,
    /// Down multiplier.
    pub down: Real,
}

impl ArbitrageWarning {
    /// Return a warning if `probability` is not strictly inside `(0, 1)`.
    pub fn check(probability: Real, up: Real, down: Real) -> Option<Self> {
        if probability > 0.0 && probability < 1.0 {
            None
        } else {
            Some(Self {
                probability,
                up,
                down,
            })
        }
    }
}

impl fmt::Display for ArbitrageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "risk-neutral probability {} outside (0, 1) for u = {}, d = {}",
            self.probability, self.up, self.down
        )
    }
}

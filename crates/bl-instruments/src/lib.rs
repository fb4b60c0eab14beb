//! # bl-instruments
//!
//! What gets priced: equity option parameters and payoffs, exercise styles,
//! and the interest-rate derivative kinds valued on a short-rate lattice.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod exercise;
pub mod parameters;
pub mod payoff;
pub mod rate_derivative;

pub use exercise::ExerciseType;
pub use parameters::Parameters;
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff};
pub use rate_derivative::RateDerivativeType;

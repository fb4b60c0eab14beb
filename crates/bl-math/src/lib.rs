//! # bl-math
//!
//! One-dimensional root finders behind an explicit [`Solver1D`]
//! configuration.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// 1D root-finding solvers.
pub mod solvers1d;

pub use solvers1d::{Solver1D, SolverMethod};

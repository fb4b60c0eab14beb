//! # bl-core
//!
//! Core types and error definitions for binolattice.
//!
//! This crate provides the building blocks shared across the other crates
//! in the workspace: floating-point type aliases, the error hierarchy with
//! its `ensure!` macro, and the non-fatal [`ArbitrageWarning`] diagnostic.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types, the `ensure!` macro and lattice diagnostics.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for step counts and node indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{ArbitrageWarning, Error, Result};

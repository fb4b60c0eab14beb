//! # bl-pricingengines
//!
//! Backward-induction pricers on finished lattices.
//!
//! ## Engines
//!
//! - [`BinomialTreeModel`] — European and American vanilla options on a
//!   CRR (or manual up/down) stock tree
//! - [`TreeRateDerivativeEngine`] — caps, floors, swaps and swaptions on a
//!   calibrated Ho-Lee / BDT rate lattice

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod binomial_engine;
pub mod tree_rate_derivative_engine;

pub use binomial_engine::{BinomialTreeModel, OptionLattices};
pub use tree_rate_derivative_engine::{ctns_rate, fair_swap_rate, TreeRateDerivativeEngine, DEFAULT_NOTIONAL};

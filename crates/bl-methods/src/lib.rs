//! # bl-methods
//!
//! Lattice methods: the triangular recombining [`Lattice`], backward
//! induction, the CRR / manual-factor [`BinomialTree`], the additive
//! short-rate forward build, and render layouts for external plotters.
//!
//! # Modules
//!
//! * [`lattice`] — lattice storage, trees and backward-induction pricing

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: binomial trees, short-rate trees, backward induction.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{
    additive_lattice, backward_induction, discount_bond_lattice, discounted_cash_flow_lattice,
    discounted_payoff_lattice, BinomialTree, Lattice, LayoutMode, RenderContext, TreeLayout,
    EQUAL_PROBABILITY,
};

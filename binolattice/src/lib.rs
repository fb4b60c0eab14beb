//! # binolattice
//!
//! Recombining binomial lattices for vanilla equity options, plus Ho-Lee
//! and Black-Derman-Toy short-rate lattices calibrated exactly to a
//! zero-coupon curve and used to price caps, floors, swaps and swaptions.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on it rather than on the individual
//! `bl-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use binolattice::instruments::{ExerciseType, OptionType, Parameters};
//! use binolattice::pricingengines::BinomialTreeModel;
//!
//! let params = Parameters::new(100.0, 100.0, 0.0, 1.0, 0.05, 0.0, 0.2).unwrap();
//! let model = BinomialTreeModel::new(params, 200).unwrap();
//! let call = model.npv(OptionType::Call, ExerciseType::European);
//! assert!((call - 10.45).abs() < 0.05);
//! ```
//!
//! ```rust
//! use binolattice::models::{HoLee, RateCalibration};
//! use binolattice::pricingengines::TreeRateDerivativeEngine;
//!
//! let cal = RateCalibration::new(HoLee::new(0.01).unwrap(), &[0.99, 0.97, 0.94], 3.0).unwrap();
//! let engine = TreeRateDerivativeEngine::new(&cal, 3).unwrap();
//! assert!((engine.swap_rate() - 0.06 / 2.9).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use bl_core as core;

/// One-dimensional root finders.
pub use bl_math as math;

/// Option parameters, payoffs and rate-derivative kinds.
pub use bl_instruments as instruments;

/// Lattices, binomial trees, backward induction and layout data.
pub use bl_methods as methods;

/// Ho-Lee and Black-Derman-Toy models and their calibration.
pub use bl_models as models;

/// Equity option and rate-derivative pricing engines.
pub use bl_pricingengines as pricingengines;

/// Commonly used items.
pub mod prelude {
    pub use bl_core::{ArbitrageWarning, Error, Real, Result};
    pub use bl_instruments::{ExerciseType, OptionType, Parameters, RateDerivativeType};
    pub use bl_math::{Solver1D, SolverMethod};
    pub use bl_methods::{BinomialTree, Lattice, LayoutMode, RenderContext, TreeLayout};
    pub use bl_models::{BlackDermanToy, CalibrationConfig, HoLee, RateCalibration, ShortRateDynamics};
    pub use bl_pricingengines::{BinomialTreeModel, TreeRateDerivativeEngine};
}

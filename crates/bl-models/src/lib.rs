//! # bl-models
//!
//! Short-rate lattice models fitted exactly to a zero-coupon bond curve.
//!
//! ## Trait hierarchy
//!
//! ```text
//! ShortRateDynamics
//! ├── HoLee          (additive in the rate, rates may go negative)
//! └── BlackDermanToy (additive in ln r, rates stay positive)
//! ```
//!
//! [`RateCalibration`] fits one drift `θ_k` per step, in maturity order,
//! so that the lattice reprices every observed discount factor.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Infrastructure ───────────────────────────────────────────────────────
pub mod calibration;
pub mod short_rate_model;

// ── One-factor lattice models ────────────────────────────────────────────
pub mod black_derman_toy;
pub mod ho_lee;

// ── Re-exports ───────────────────────────────────────────────────────────
pub use black_derman_toy::BlackDermanToy;
pub use calibration::{fit_thetas, CalibrationConfig, RateCalibration};
pub use ho_lee::HoLee;
pub use short_rate_model::ShortRateDynamics;

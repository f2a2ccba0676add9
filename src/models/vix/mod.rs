//! Volatility index methodology
//!
//! One module per stage of the calculation, run in order for each expiry:
//! expiry selection, forward estimation, optional quote smoothing, strike
//! universe construction, model-free variance, and finally constant-maturity
//! interpolation of the two expiries.

pub mod expiry;
pub mod forward;
pub mod smoothing;
pub mod strikes;
pub mod temporal;
pub mod variance;

pub use expiry::*;
pub use forward::*;
pub use smoothing::*;
pub use strikes::*;
pub use temporal::*;
pub use variance::*;

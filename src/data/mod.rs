//! Conveniences for callers that hold chains outside the core data model:
//! a CSV reader for the wide one-row-per-strike layout and a Black-Scholes
//! chain generator for tests and demos.

#[cfg(feature = "serde")]
pub mod csv_chain;
pub mod synthetic;

#[cfg(feature = "serde")]
pub use csv_chain::{load_chain, read_chain};
pub use synthetic::SyntheticChain;

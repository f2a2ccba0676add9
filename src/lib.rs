//! # VIX-Lib: Model-Free Volatility Index Calculation
//!
//! `vix-lib` turns a snapshot of a listed index-option chain into a 30-day
//! constant-maturity volatility index, following the variance-swap style
//! methodology published for the CBOE VIX and adopted by other exchanges
//! (India VIX among them).
//!
//! ## Methodology
//!
//! For a snapshot the calculation:
//! 1. **Selects expiries**: the near- and next-term expiries bracketing 30 days,
//!    skipping expiries with fewer than `min_days_to_expiry` days left
//! 2. **Derives forwards**: put-call parity at the strike where call and put
//!    mids are closest (or the expiry's futures price, if configured)
//! 3. **Builds strike universes**: out-of-the-money puts below and calls above
//!    K0, truncated after two consecutive zero bids on each side
//! 4. **Computes variances**: `σ² = (2/T) Σ ΔK/K² e^(rT) Q(K) − (1/T)(F/K0 − 1)²`
//! 5. **Interpolates**: total variances weighted to the 30-day horizon, then
//!    `index = 100 · sqrt(σ²_30)`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vix_lib::{compute_index, ExpiryChain, OptionQuote, Snapshot};
//! use chrono::NaiveDate;
//!
//! # fn load_quotes(_: &str) -> Vec<OptionQuote> { vec![] }
//! let timestamp = NaiveDate::from_ymd_opt(2024, 3, 19)
//!     .unwrap()
//!     .and_hms_opt(10, 0, 0)
//!     .unwrap();
//!
//! let near = ExpiryChain::new(NaiveDate::from_ymd_opt(2024, 3, 28).unwrap(), load_quotes("near"));
//! let next = ExpiryChain::new(NaiveDate::from_ymd_opt(2024, 4, 25).unwrap(), load_quotes("next"));
//!
//! let snapshot = Snapshot::new(timestamp, 0.07).with_chain(near).with_chain(next);
//! let index = compute_index(&snapshot)?;
//! println!("VIX = {index}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration Presets
//!
//! - `nse()`: 15:30 expiry, 3-day minimum, no rounding (the default)
//! - `cboe()`: 09:30 settlement, 7-day minimum
//! - `smoothed()`: NSE with spread-filtered spline smoothing of mid-prices
//! - `strict()`: NSE with mid-prices rounded to two decimals

// ================================================================================================
// MODULES
// ================================================================================================

pub mod calculation;
pub mod data;
pub mod error;
pub mod models;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Data model
pub use calculation::types::{
    ExpiryChain, ExpiryTerm, ForwardEstimate, IndexBreakdown, IndexValue, OptionQuote, OptionType,
    QuoteSide, SelectedExpiryPair, Snapshot, StrikeRow, StrikeUniverse, TermBreakdown,
    UniverseEntry, VarianceResult, MINUTES_IN_A_DAY, MINUTES_IN_A_YEAR,
};

// Configuration and orchestration
pub use calculation::config::{ForwardSource, RoundingConfig, SmoothingConfig, VixConfig};
pub use calculation::pipeline::VixCalculator;

// Errors
pub use error::{VixError, VixErrorKind, VixResult};

// Individual methodology stages
pub use models::vix::{
    build_strike_universe, estimate_forward, interpolate_variance, model_free_variance,
    select_expiries, smooth_chain, InterpolatedVariance, ScanStep, ZeroBidScan,
};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured calculation settings.
///
/// # Available Configurations
///
/// - [`nse()`]: Exchange defaults used by this crate
/// - [`cboe()`]: CBOE-style settlement time and roll threshold
/// - [`smoothed()`]: Spline-smoothed mid-prices for wide markets
/// - [`strict()`]: Tick-rounded mid-prices
pub mod default_configs {
    use crate::calculation::config::VixConfig;

    /// NSE-style configuration.
    ///
    /// **Characteristics:**
    /// - Expiry settles at 15:30 exchange time
    /// - Near expiry rolls when fewer than 3 days remain
    /// - Forward from put-call parity, no intermediate rounding
    ///
    /// # Example
    ///
    /// ```rust
    /// use vix_lib::default_configs;
    ///
    /// let config = default_configs::nse();
    /// assert_eq!(config.target_days, 30);
    /// ```
    pub fn nse() -> VixConfig {
        VixConfig::nse()
    }

    /// CBOE-style configuration.
    ///
    /// **Characteristics:**
    /// - Expiry settles at 09:30 (AM settlement)
    /// - Near term must have at least 7 days to expiry
    pub fn cboe() -> VixConfig {
        VixConfig::cboe()
    }

    /// NSE configuration with spline smoothing of wide quotes.
    ///
    /// Quotes with a relative spread above 30% are re-priced from a natural
    /// cubic spline through the tight out-of-the-money quotes of the same side.
    pub fn smoothed() -> VixConfig {
        VixConfig::smoothed()
    }

    /// NSE configuration with mid-prices rounded to two decimals.
    pub fn strict() -> VixConfig {
        VixConfig::strict()
    }
}

/// Compute the volatility index of a snapshot with the default configuration.
///
/// # Errors
///
/// Any stage failure aborts the calculation and is returned unchanged:
/// * [`VixError::InsufficientExpiries`] if fewer than two usable future expiries exist
/// * [`VixError::NoViableStrike`] if an expiry has no strike with live call and put
/// * [`VixError::EmptyUniverse`] if zero-bid truncation leaves fewer than two strikes
/// * [`VixError::DegenerateVariance`] if a variance comes out negative
/// * [`VixError::InvalidExpiryWindow`] if the selected pair does not bracket 30 days
pub fn compute_index(snapshot: &Snapshot) -> VixResult<IndexValue> {
    VixCalculator::default().compute(snapshot)
}

/// Compute the volatility index of a snapshot with an explicit configuration.
pub fn compute_index_with_config(snapshot: &Snapshot, config: &VixConfig) -> VixResult<IndexValue> {
    VixCalculator::new(config.clone()).compute(snapshot)
}

/// Compute the index along with forwards, strike counts, variances and weights.
pub fn compute_index_detailed(snapshot: &Snapshot, config: &VixConfig) -> VixResult<IndexBreakdown> {
    VixCalculator::new(config.clone()).compute_detailed(snapshot)
}

/// Compute a batch of independent snapshots in parallel, preserving input order.
///
/// Each snapshot succeeds or fails on its own; one bad snapshot does not
/// affect the others.
pub fn compute_index_batch(snapshots: &[Snapshot], config: &VixConfig) -> Vec<VixResult<IndexValue>> {
    VixCalculator::new(config.clone()).compute_batch(snapshots)
}

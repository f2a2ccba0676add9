use chrono::NaiveTime;

pub use crate::calculation::types::ForwardSource;

/// Optional intermediate rounding, applied half away from zero.
///
/// Exchanges are believed to round at some steps of the published methodology,
/// but the exact points are not documented, so every step is off by default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoundingConfig {
    /// Decimal places for every option mid-price before use
    pub mid_price_decimals: Option<u32>,
    /// Decimal places for the derived forward price
    pub forward_decimals: Option<u32>,
    /// Decimal places for each per-expiry variance
    pub variance_decimals: Option<u32>,
}

impl RoundingConfig {
    pub fn mid_price(&self, value: f64) -> f64 {
        round_opt(value, self.mid_price_decimals)
    }

    pub fn forward(&self, value: f64) -> f64 {
        round_opt(value, self.forward_decimals)
    }

    pub fn variance(&self, value: f64) -> f64 {
        round_opt(value, self.variance_decimals)
    }
}

fn round_opt(value: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        Some(d) => {
            let scale = 10f64.powi(d as i32);
            (value * scale).round() / scale
        }
        None => value,
    }
}

/// Spread-filtered cubic spline smoothing of mid-prices
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothingConfig {
    pub enabled: bool,
    /// Quotes with `(ask - bid) / mid` at or below this become spline knots
    pub max_relative_spread: f64,
    /// Minimum knots per side before a spline is fitted
    pub min_knots: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_relative_spread: 0.3,
            min_knots: 3,
        }
    }
}

/// Main configuration for the index calculation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VixConfig {
    /// Constant-maturity horizon in calendar days
    #[cfg_attr(feature = "serde", serde(default = "default_target_days"))]
    pub target_days: u32,

    /// Expiries with fewer days to live are skipped when selecting the pair
    #[cfg_attr(feature = "serde", serde(default = "default_min_days_to_expiry"))]
    pub min_days_to_expiry: f64,

    /// Exchange time of day at which an expiry date settles
    #[cfg_attr(feature = "serde", serde(default = "default_expiry_time"))]
    pub expiry_time: NaiveTime,

    #[cfg_attr(feature = "serde", serde(default))]
    pub forward_source: ForwardSource,

    #[cfg_attr(feature = "serde", serde(default))]
    pub rounding: RoundingConfig,

    #[cfg_attr(feature = "serde", serde(default))]
    pub smoothing: SmoothingConfig,

    /// Accept an expiry pair that does not bracket the target
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_extrapolation: bool,

    /// Run the near and next sub-pipelines on the rayon pool
    #[cfg_attr(feature = "serde", serde(default))]
    pub parallel_expiries: bool,

    /// Verbosity level (0=silent, 1=summary, 2=per-step detail)
    #[cfg_attr(feature = "serde", serde(default))]
    pub verbosity: u8,
}

impl Default for VixConfig {
    fn default() -> Self {
        Self {
            target_days: default_target_days(),
            min_days_to_expiry: default_min_days_to_expiry(),
            expiry_time: default_expiry_time(),
            forward_source: ForwardSource::default(),
            rounding: RoundingConfig::default(),
            smoothing: SmoothingConfig::default(),
            allow_extrapolation: false,
            parallel_expiries: false,
            verbosity: 0,
        }
    }
}

impl VixConfig {
    /// NSE-style settings: 15:30 expiry, roll once the near month has under 3 days left
    pub fn nse() -> Self {
        Self::default()
    }

    /// CBOE-style settings: 09:30 settlement, near term must have at least 7 days
    pub fn cboe() -> Self {
        Self {
            min_days_to_expiry: 7.0,
            expiry_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
            ..Self::default()
        }
    }

    /// NSE settings with spread-filtered spline smoothing of mid-prices
    pub fn smoothed() -> Self {
        Self {
            smoothing: SmoothingConfig {
                enabled: true,
                ..SmoothingConfig::default()
            },
            ..Self::default()
        }
    }

    /// NSE settings rounding mid-prices to the exchange tick precision
    pub fn strict() -> Self {
        Self {
            rounding: RoundingConfig {
                mid_price_decimals: Some(2),
                ..RoundingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Target horizon in years (calendar days / 365)
    pub fn target_years(&self) -> f64 {
        self.target_minutes() / super::types::MINUTES_IN_A_YEAR
    }

    pub fn target_minutes(&self) -> f64 {
        self.target_days as f64 * super::types::MINUTES_IN_A_DAY
    }

    pub fn min_minutes_to_expiry(&self) -> f64 {
        self.min_days_to_expiry * super::types::MINUTES_IN_A_DAY
    }

    /// Parse a configuration from TOML; missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        toml::from_str(text).context("failed to parse VIX configuration TOML")
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        use anyhow::Context;
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}

fn default_target_days() -> u32 {
    30
}

fn default_min_days_to_expiry() -> f64 {
    3.0
}

fn default_expiry_time() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 30, 0).unwrap_or(NaiveTime::MIN)
}

//! Constant-maturity interpolation of the near and next variances
//!
//! Total variances are interpolated linearly in time to the target horizon:
//!
//! ```text
//! w_near = (T_next − T_target) / (T_next − T_near),  w_next = 1 − w_near
//! σ²_target = (T_near·σ²_near·w_near + T_next·σ²_next·w_next) / T_target
//! index = 100 · sqrt(σ²_target)
//! ```
//!
//! The pair must bracket the target (`T_near ≤ T_target ≤ T_next`, inclusive so
//! that an expiry exactly on the target gets the full weight) unless
//! extrapolation is explicitly allowed.

use crate::calculation::types::{IndexValue, VarianceResult};
use crate::error::{VixError, VixResult};

/// Interpolated variance and the weights that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedVariance {
    pub variance: f64,
    pub near_weight: f64,
    pub next_weight: f64,
    pub target_years: f64,
}

impl InterpolatedVariance {
    pub fn index_value(&self) -> IndexValue {
        IndexValue(100.0 * self.variance.sqrt())
    }
}

/// Interpolate near/next variances to `target_years`.
pub fn interpolate_variance(
    near: &VarianceResult,
    next: &VarianceResult,
    target_years: f64,
    allow_extrapolation: bool,
) -> VixResult<InterpolatedVariance> {
    let t_near = near.time_to_expiry_years;
    let t_next = next.time_to_expiry_years;

    let window_error = || VixError::InvalidExpiryWindow {
        near_years: t_near,
        next_years: t_next,
        target_years,
    };

    if !(t_near < t_next) || target_years <= 0.0 {
        return Err(window_error());
    }
    let brackets = t_near <= target_years && target_years <= t_next;
    if !brackets {
        if !allow_extrapolation {
            return Err(window_error());
        }
        tracing::debug!(t_near, t_next, target_years, "extrapolating variance outside the expiry window");
    }

    let near_weight = (t_next - target_years) / (t_next - t_near);
    let next_weight = 1.0 - near_weight;

    let variance =
        (t_near * near.variance * near_weight + t_next * next.variance * next_weight) / target_years;

    if !variance.is_finite() || variance < 0.0 {
        return Err(VixError::degenerate("interpolated target-horizon variance", variance));
    }

    Ok(InterpolatedVariance {
        variance,
        near_weight,
        next_weight,
        target_years,
    })
}

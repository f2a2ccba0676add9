use rayon::prelude::*;
use std::borrow::Cow;

use crate::calculation::config::VixConfig;
use crate::calculation::types::{
    ExpiryTerm, IndexBreakdown, IndexValue, Snapshot, TermBreakdown,
};
use crate::error::VixResult;
use crate::models::vix::{
    build_strike_universe, estimate_forward, interpolate_variance, model_free_variance,
    select_expiries, smooth_chain,
};

/// Index calculator for one configuration.
///
/// Holds no state besides its configuration: every call is an independent
/// pass over the snapshot it is given, so one calculator can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct VixCalculator {
    config: VixConfig,
}

impl VixCalculator {
    pub fn new(config: VixConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VixConfig {
        &self.config
    }

    /// Compute the index value of a snapshot.
    pub fn compute(&self, snapshot: &Snapshot) -> VixResult<IndexValue> {
        self.compute_detailed(snapshot).map(|b| b.index)
    }

    /// Compute the index value together with the per-expiry intermediate results.
    pub fn compute_detailed(&self, snapshot: &Snapshot) -> VixResult<IndexBreakdown> {
        let config = &self.config;
        let pair = select_expiries(snapshot, config)?;
        if config.verbosity > 1 {
            tracing::debug!(
                near = %pair.near.expiry_date(),
                near_minutes = pair.near.minutes_to_expiry,
                next = %pair.next.expiry_date(),
                next_minutes = pair.next.minutes_to_expiry,
                "selected expiries"
            );
        }

        let (near, next) = if config.parallel_expiries {
            let (near, next) = rayon::join(
                || compute_term(&pair.near, config),
                || compute_term(&pair.next, config),
            );
            (near?, next?)
        } else {
            (compute_term(&pair.near, config)?, compute_term(&pair.next, config)?)
        };

        let interpolated = interpolate_variance(
            &near.variance,
            &next.variance,
            config.target_years(),
            config.allow_extrapolation,
        )?;
        let index = interpolated.index_value();

        if config.verbosity > 0 {
            tracing::info!(
                timestamp = %snapshot.timestamp,
                index = index.value(),
                near_weight = interpolated.near_weight,
                variance = interpolated.variance,
                "volatility index computed"
            );
        }

        Ok(IndexBreakdown {
            timestamp: snapshot.timestamp,
            index,
            variance_30d: interpolated.variance,
            near_weight: interpolated.near_weight,
            next_weight: interpolated.next_weight,
            near,
            next,
        })
    }

    /// Compute many snapshots in parallel; results keep the input order.
    pub fn compute_batch(&self, snapshots: &[Snapshot]) -> Vec<VixResult<IndexValue>> {
        snapshots.par_iter().map(|s| self.compute(s)).collect()
    }
}

/// Forward, strike universe and variance of one expiry.
///
/// The forward always comes from the raw quotes; smoothing, when enabled, is
/// fitted around the K0 of that forward and only feeds the variance sum.
fn compute_term(term: &ExpiryTerm<'_>, config: &VixConfig) -> VixResult<TermBreakdown> {
    let forward = estimate_forward(term, config)?;

    let chain = if config.smoothing.enabled {
        Cow::Owned(smooth_chain(term.chain, forward.forward_price, &config.smoothing))
    } else {
        Cow::Borrowed(term.chain)
    };

    let universe = build_strike_universe(&chain, &forward, config)?;
    let variance = model_free_variance(
        &universe,
        forward.forward_price,
        term.time_to_expiry,
        term.risk_free_rate,
        &config.rounding,
    )?;

    if config.verbosity > 1 {
        tracing::debug!(
            expiry = %term.expiry_date(),
            forward = forward.forward_price,
            k0 = universe.strike_atm_rounded,
            strikes = universe.len(),
            variance = variance.variance,
            "expiry variance"
        );
    }

    Ok(TermBreakdown {
        forward,
        strike_atm_rounded: universe.strike_atm_rounded,
        universe_size: universe.len(),
        minutes_to_expiry: term.minutes_to_expiry,
        risk_free_rate: term.risk_free_rate,
        variance,
    })
}

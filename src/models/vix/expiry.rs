//! Near/next expiry selection
//!
//! Expiries are pinned to the snapshot clock, short-dated ones (below
//! `min_days_to_expiry`) are skipped, and the pair bracketing the
//! constant-maturity target is chosen: `near` is the latest expiry at or before
//! the target, `next` the one right after it. An expiry that lands exactly on
//! the target is therefore `near`.
//!
//! When no usable expiry brackets the target (every expiry is past it, or every
//! expiry is before it), the first two usable expiries are returned and the
//! temporal interpolator decides whether the window is acceptable.

use crate::calculation::config::VixConfig;
use crate::calculation::types::{cmp_f64, ExpiryTerm, SelectedExpiryPair, Snapshot};
use crate::error::{VixError, VixResult};

/// Pick the near- and next-term expiries of a snapshot.
pub fn select_expiries<'a>(
    snapshot: &'a Snapshot,
    config: &VixConfig,
) -> VixResult<SelectedExpiryPair<'a>> {
    let available = snapshot.chains.len();
    let min_minutes = config.min_minutes_to_expiry();
    let target = config.target_minutes();

    let mut usable: Vec<ExpiryTerm<'a>> = Vec::with_capacity(available);
    for chain in snapshot.chains.values() {
        let minutes = chain.minutes_to_expiry_from(snapshot.timestamp, config.expiry_time);
        if minutes <= 0.0 {
            continue;
        }
        if minutes < min_minutes {
            tracing::debug!(
                expiry = %chain.expiry_date,
                days = minutes / crate::calculation::types::MINUTES_IN_A_DAY,
                "skipping expiry below the minimum days to expiry"
            );
            continue;
        }
        usable.push(ExpiryTerm::new(chain, minutes, snapshot.risk_free_rate));
    }

    // Chains are keyed by date, but explicit minute overrides may reorder them.
    usable.sort_by(|a, b| cmp_f64(a.minutes_to_expiry, b.minutes_to_expiry));
    usable.dedup_by(|b, a| a.minutes_to_expiry == b.minutes_to_expiry);

    if usable.len() < 2 {
        return Err(VixError::InsufficientExpiries {
            available,
            usable: usable.len(),
        });
    }

    let near_idx = usable
        .iter()
        .rposition(|term| term.minutes_to_expiry <= target)
        .filter(|&idx| idx + 1 < usable.len())
        .unwrap_or(0);

    Ok(SelectedExpiryPair {
        near: usable[near_idx],
        next: usable[near_idx + 1],
    })
}

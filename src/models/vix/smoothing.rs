//! Spread-filtered spline smoothing of mid-prices
//!
//! Wide bid/ask spreads make raw mids noisy far from the money. Each side is
//! fitted on its out-of-the-money half only: calls at or above K0, puts at or
//! below it, where K0 is the highest listed strike not above the forward.
//! Quotes of that half with a relative spread at or below the threshold become
//! knots of a natural cubic spline in strike, and every live quote inside the
//! knot range is re-priced from the spline. Quotes without a live market stay
//! dead, so the zero-bid truncation rule is unaffected.

use crate::calculation::config::SmoothingConfig;
use crate::calculation::types::{ExpiryChain, OptionType};
use crate::models::spline::NaturalCubicSpline;

/// Return a copy of `chain` with smoothed mid-prices where a spline could be fitted.
pub fn smooth_chain(chain: &ExpiryChain, forward_price: f64, config: &SmoothingConfig) -> ExpiryChain {
    let mut smoothed = chain.clone();
    let Some(k0) = chain.strikes().filter(|&k| k <= forward_price).last() else {
        tracing::warn!(
            expiry = %chain.expiry_date,
            forward_price,
            "no strike at or below the forward, keeping raw mids"
        );
        return smoothed;
    };
    for side in [OptionType::Call, OptionType::Put] {
        smooth_side(&mut smoothed, side, k0, config);
    }
    smoothed
}

fn is_otm(side: OptionType, strike: f64, k0: f64) -> bool {
    match side {
        OptionType::Call => strike >= k0,
        OptionType::Put => strike <= k0,
    }
}

fn smooth_side(chain: &mut ExpiryChain, side: OptionType, k0: f64, config: &SmoothingConfig) {
    let (knot_x, knot_y): (Vec<f64>, Vec<f64>) = chain
        .rows()
        .iter()
        .filter(|row| is_otm(side, row.strike, k0))
        .filter_map(|row| {
            let quote = row.quote(side)?;
            let spread = quote.relative_spread()?;
            let mid = quote.mid()?;
            (spread <= config.max_relative_spread).then_some((row.strike, mid))
        })
        .unzip();

    if knot_x.len() < config.min_knots.max(2) {
        tracing::warn!(
            expiry = %chain.expiry_date,
            side = ?side,
            knots = knot_x.len(),
            "too few tight quotes to fit a smoothing spline, keeping raw mids"
        );
        return;
    }

    let spline = match NaturalCubicSpline::new(&knot_x, &knot_y) {
        Ok(spline) => spline,
        Err(err) => {
            tracing::warn!(expiry = %chain.expiry_date, side = ?side, %err, "smoothing spline rejected");
            return;
        }
    };

    let mut replaced = 0usize;
    for row in chain.rows_mut() {
        if !row.has_market(side) {
            continue;
        }
        let Some(value) = spline.evaluate(row.strike) else {
            continue;
        };
        if value <= 0.0 {
            continue;
        }
        match side {
            OptionType::Call => row.smoothed_call_mid = Some(value),
            OptionType::Put => row.smoothed_put_mid = Some(value),
        }
        replaced += 1;
    }

    tracing::debug!(
        expiry = %chain.expiry_date,
        side = ?side,
        knots = knot_x.len(),
        replaced,
        "smoothed mid-prices"
    );
}

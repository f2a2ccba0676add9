//! Strike universe construction
//!
//! K0 is the highest listed strike at or below the forward. Out-of-the-money
//! puts are collected walking down from K0 and out-of-the-money calls walking
//! up, each side through a [`ZeroBidScan`]: a strike without a live bid is
//! skipped, and the second zero-bid strike in a row ends the side, excluding it
//! and everything further out. K0 itself is priced once, as the average of its
//! call and put mids.

use crate::calculation::config::VixConfig;
use crate::calculation::types::{
    ExpiryChain, ForwardEstimate, OptionType, QuoteSide, StrikeRow, StrikeUniverse, UniverseEntry,
};
use crate::error::{VixError, VixResult};

/// Consecutive zero bids that end a side of the scan.
pub const ZERO_BID_RUN_LIMIT: usize = 2;

/// Outcome of feeding one strike to a [`ZeroBidScan`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanStep {
    /// Strike has a live market; use this mid-price
    Include(f64),
    /// Zero bid, but the run limit is not reached yet
    Skip,
    /// Run limit reached; this strike and all further ones are excluded
    Stop,
}

/// One-sided scan outward from the ATM strike.
#[derive(Debug, Clone)]
pub struct ZeroBidScan {
    side: OptionType,
    zero_run: usize,
    stopped: bool,
}

impl ZeroBidScan {
    pub fn new(side: OptionType) -> Self {
        Self {
            side,
            zero_run: 0,
            stopped: false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Feed the next strike further from the money.
    pub fn feed(&mut self, row: &StrikeRow) -> ScanStep {
        if self.stopped {
            return ScanStep::Stop;
        }
        match row.mid(self.side) {
            Some(mid) => {
                self.zero_run = 0;
                ScanStep::Include(mid)
            }
            None => {
                self.zero_run += 1;
                if self.zero_run >= ZERO_BID_RUN_LIMIT {
                    self.stopped = true;
                    ScanStep::Stop
                } else {
                    ScanStep::Skip
                }
            }
        }
    }
}

/// Index of K0: the highest listed strike not above the forward.
fn atm_index(rows: &[StrikeRow], forward_price: f64) -> Option<usize> {
    rows.iter().rposition(|row| row.strike <= forward_price)
}

fn scan_side<'r>(
    rows: impl Iterator<Item = &'r StrikeRow>,
    side: OptionType,
    config: &VixConfig,
) -> Vec<(f64, f64)> {
    let mut scan = ZeroBidScan::new(side);
    let mut picked = Vec::new();
    for row in rows {
        match scan.feed(row) {
            ScanStep::Include(mid) => picked.push((row.strike, config.rounding.mid_price(mid))),
            ScanStep::Skip => continue,
            ScanStep::Stop => break,
        }
    }
    picked
}

/// Build the ordered strike universe of one expiry.
pub fn build_strike_universe(
    chain: &ExpiryChain,
    forward: &ForwardEstimate,
    config: &VixConfig,
) -> VixResult<StrikeUniverse> {
    let expiry = chain.expiry_date;
    let rows = chain.rows();

    let k0_idx = atm_index(rows, forward.forward_price).ok_or_else(|| {
        VixError::empty_universe(expiry, 0, format!("no listed strike at or below forward {}", forward.forward_price))
    })?;
    let atm_row = &rows[k0_idx];
    let k0 = atm_row.strike;

    let mut puts = scan_side(rows[..k0_idx].iter().rev(), OptionType::Put, config);
    puts.reverse();
    let calls = scan_side(rows[k0_idx + 1..].iter(), OptionType::Call, config);

    let call_mid = atm_row.mid(OptionType::Call).map(|m| config.rounding.mid_price(m));
    let put_mid = atm_row.mid(OptionType::Put).map(|m| config.rounding.mid_price(m));
    let atm_mid = match (call_mid, put_mid) {
        (Some(c), Some(p)) => Some(0.5 * (c + p)),
        (Some(single), None) | (None, Some(single)) => {
            tracing::warn!(expiry = %expiry, strike = k0, "ATM strike has a one-sided market, using it alone");
            Some(single)
        }
        (None, None) => {
            tracing::warn!(expiry = %expiry, strike = k0, "ATM strike has no live market, excluding it");
            None
        }
    };

    let mut priced: Vec<(f64, QuoteSide, f64)> = Vec::with_capacity(puts.len() + calls.len() + 1);
    priced.extend(puts.into_iter().map(|(k, q)| (k, QuoteSide::Put, q)));
    if let Some(q) = atm_mid {
        priced.push((k0, QuoteSide::Straddle, q));
    }
    priced.extend(calls.into_iter().map(|(k, q)| (k, QuoteSide::Call, q)));

    if priced.len() < 2 {
        return Err(VixError::empty_universe(
            expiry,
            priced.len(),
            "zero-bid truncation left too few strikes",
        ));
    }

    let strikes: Vec<f64> = priced.iter().map(|(k, _, _)| *k).collect();
    let last = strikes.len() - 1;
    let entries = priced
        .into_iter()
        .enumerate()
        .map(|(i, (strike, side, mid_price))| {
            let delta_k = if i == 0 {
                strikes[1] - strikes[0]
            } else if i == last {
                strikes[last] - strikes[last - 1]
            } else {
                0.5 * (strikes[i + 1] - strikes[i - 1])
            };
            UniverseEntry {
                strike,
                side,
                mid_price,
                delta_k,
            }
        })
        .collect();

    Ok(StrikeUniverse {
        expiry_date: expiry,
        strike_atm_rounded: k0,
        entries,
    })
}

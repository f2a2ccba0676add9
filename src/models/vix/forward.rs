use crate::calculation::config::VixConfig;
use crate::calculation::types::{ExpiryTerm, ForwardEstimate, ForwardSource, OptionType};
use crate::error::{VixError, VixResult};

/// Derive the forward index level for one expiry.
///
/// With [`ForwardSource::PutCallParity`] the strike minimising
/// `|call_mid - put_mid|` is located (lowest strike wins ties) and
/// `F = K + e^(rT) * (call_mid - put_mid)`. With [`ForwardSource::Futures`] the
/// chain's futures price is used directly, falling back to parity when the
/// chain carries none.
pub fn estimate_forward(term: &ExpiryTerm<'_>, config: &VixConfig) -> VixResult<ForwardEstimate> {
    let expiry = term.expiry_date();

    if config.forward_source == ForwardSource::Futures {
        match term.chain.futures_price {
            Some(futures) if futures.is_finite() && futures > 0.0 => {
                return Ok(ForwardEstimate {
                    expiry_date: expiry,
                    strike_atm: None,
                    forward_price: config.rounding.forward(futures),
                    source: ForwardSource::Futures,
                });
            }
            _ => {
                tracing::debug!(
                    expiry = %expiry,
                    "no usable futures price on chain, deriving forward from put-call parity"
                );
            }
        }
    }

    let mut best: Option<(f64, f64, f64)> = None; // (strike, call - put, |call - put|)
    for row in term.chain.rows() {
        let (Some(call), Some(put)) = (row.mid(OptionType::Call), row.mid(OptionType::Put)) else {
            continue;
        };
        let diff = config.rounding.mid_price(call) - config.rounding.mid_price(put);
        let abs_diff = diff.abs();
        // Rows are in increasing strike order, so a strict comparison keeps the lowest strike on ties
        if best.map_or(true, |(_, _, best_abs)| abs_diff < best_abs) {
            best = Some((row.strike, diff, abs_diff));
        }
    }

    let (strike, diff, _) = best.ok_or(VixError::NoViableStrike { expiry })?;
    let forward_price = config.rounding.forward(strike + term.growth_factor() * diff);

    if !forward_price.is_finite() || forward_price <= 0.0 {
        tracing::warn!(expiry = %expiry, strike, forward_price, "put-call parity gave a non-positive forward");
        return Err(VixError::NoViableStrike { expiry });
    }

    Ok(ForwardEstimate {
        expiry_date: expiry,
        strike_atm: Some(strike),
        forward_price,
        source: ForwardSource::PutCallParity,
    })
}

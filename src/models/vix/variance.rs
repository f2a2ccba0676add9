use crate::calculation::config::RoundingConfig;
use crate::calculation::types::{StrikeUniverse, VarianceResult};
use crate::error::{VixError, VixResult};

/// Model-free variance of one expiry.
///
/// ```text
/// σ² = (2/T) Σ ΔK_i / K_i² · e^(rT) · Q(K_i)  −  (1/T) (F/K0 − 1)²
/// ```
///
/// A negative (or non-finite) raw value means the chain is too sparse or
/// inconsistent and is reported as [`VixError::DegenerateVariance`]; it is
/// never clamped into a plausible-looking number.
pub fn model_free_variance(
    universe: &StrikeUniverse,
    forward_price: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    rounding: &RoundingConfig,
) -> VixResult<VarianceResult> {
    let context = format!("expiry {}", universe.expiry_date);
    if !time_to_expiry.is_finite() || time_to_expiry <= 0.0 {
        return Err(VixError::degenerate(
            format!("{context} (time to expiry {time_to_expiry})"),
            f64::NAN,
        ));
    }

    let growth = (risk_free_rate * time_to_expiry).exp();
    let weighted_sum: f64 = universe
        .entries
        .iter()
        .map(|e| e.delta_k / (e.strike * e.strike) * growth * e.mid_price)
        .sum();

    let k0 = universe.strike_atm_rounded;
    let correction = (forward_price / k0 - 1.0).powi(2) / time_to_expiry;
    let raw = 2.0 / time_to_expiry * weighted_sum - correction;

    tracing::trace!(
        expiry = %universe.expiry_date,
        weighted_sum,
        correction,
        raw,
        "model-free variance"
    );

    if !raw.is_finite() || raw < 0.0 {
        return Err(VixError::degenerate(context, raw));
    }

    Ok(VarianceResult {
        expiry_date: universe.expiry_date,
        variance: rounding.variance(raw),
        time_to_expiry_years: time_to_expiry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::types::{QuoteSide, UniverseEntry};
    use chrono::NaiveDate;

    fn universe(k0: f64, entries: &[(f64, f64, f64)]) -> StrikeUniverse {
        StrikeUniverse {
            expiry_date: NaiveDate::from_ymd_opt(2024, 4, 25).unwrap(),
            strike_atm_rounded: k0,
            entries: entries
                .iter()
                .map(|&(strike, mid_price, delta_k)| UniverseEntry {
                    strike,
                    side: if strike < k0 {
                        QuoteSide::Put
                    } else if strike > k0 {
                        QuoteSide::Call
                    } else {
                        QuoteSide::Straddle
                    },
                    mid_price,
                    delta_k,
                })
                .collect(),
        }
    }

    #[test]
    fn test_hand_computed_variance() {
        let u = universe(100.0, &[(90.0, 1.0, 10.0), (100.0, 4.0, 10.0), (110.0, 1.5, 10.0)]);
        let t: f64 = 0.1;
        let r: f64 = 0.05;
        let f = 101.0;

        let sum = 10.0 / 8100.0 * 1.0 + 10.0 / 10000.0 * 4.0 + 10.0 / 12100.0 * 1.5;
        let expected = 2.0 / t * (r * t).exp() * sum - (f / 100.0 - 1.0_f64).powi(2) / t;

        let result = model_free_variance(&u, f, t, r, &RoundingConfig::default()).unwrap();
        assert!((result.variance - expected).abs() < 1e-12);
        assert_eq!(result.time_to_expiry_years, t);
    }

    #[test]
    fn test_negative_raw_variance_is_rejected() {
        // Tiny option prices against a forward far from K0: the correction term dominates
        let u = universe(100.0, &[(100.0, 0.0001, 5.0), (105.0, 0.0001, 5.0)]);
        let err = model_free_variance(&u, 130.0, 0.05, 0.0, &RoundingConfig::default()).unwrap_err();
        match err {
            VixError::DegenerateVariance { value, .. } => assert!(value < 0.0),
            other => panic!("expected DegenerateVariance, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_time_to_expiry_is_degenerate() {
        let u = universe(100.0, &[(95.0, 1.0, 5.0), (100.0, 2.0, 5.0)]);
        let err = model_free_variance(&u, 100.0, 0.0, 0.05, &RoundingConfig::default()).unwrap_err();
        assert!(matches!(err, VixError::DegenerateVariance { .. }));
    }

    #[test]
    fn test_variance_rounding_hook() {
        let u = universe(100.0, &[(90.0, 1.0, 10.0), (100.0, 4.0, 10.0), (110.0, 1.5, 10.0)]);
        let rounding = RoundingConfig {
            variance_decimals: Some(4),
            ..RoundingConfig::default()
        };
        let result = model_free_variance(&u, 100.0, 0.1, 0.0, &rounding).unwrap();
        assert_eq!(result.variance, (result.variance * 1e4).round() / 1e4);
    }
}

// Black-Scholes prices for European index options, used to generate synthetic
// chains with a known volatility. Implied volatility and Greeks are not needed.

use crate::calculation::types::OptionType;

fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// Price of a European option on an index with continuous dividend yield `q`.
///
/// At or past expiry (or with zero volatility) the discounted forward intrinsic value is returned.
#[allow(non_snake_case)]
pub fn bs_price(option_type: OptionType, S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    let df_r = (-r * T).exp();
    let df_q = (-q * T).exp();
    if T <= 0.0 || sigma <= 0.0 {
        return match option_type {
            OptionType::Call => (S * df_q - K * df_r).max(0.0),
            OptionType::Put => (K * df_r - S * df_q).max(0.0),
        };
    }
    let sqrt_t = T.sqrt();
    let d1 = ((S / K).ln() + (r - q + 0.5 * sigma * sigma) * T) / (sigma * sqrt_t);
    let d2 = d1 - sigma * sqrt_t;
    match option_type {
        OptionType::Call => S * df_q * norm_cdf(d1) - K * df_r * norm_cdf(d2),
        OptionType::Put => K * df_r * norm_cdf(-d2) - S * df_q * norm_cdf(-d1),
    }
}

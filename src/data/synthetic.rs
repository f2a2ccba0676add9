use chrono::NaiveDate;

use crate::calculation::types::{ExpiryChain, OptionQuote, OptionType, MINUTES_IN_A_YEAR};
use crate::models::bs::bs_price;

/// Builder for a Black-Scholes priced expiry chain with a flat volatility.
///
/// Quotes are the model price ± `half_spread`, rounded to `tick`. Options
/// worth less than half a tick get a zero bid, so the wings naturally run
/// into the zero-bid truncation rule.
#[derive(Debug, Clone)]
pub struct SyntheticChain {
    pub expiry_date: NaiveDate,
    pub spot: f64,
    pub volatility: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub minutes_to_expiry: f64,
    pub strike_low: f64,
    pub strike_high: f64,
    pub strike_step: f64,
    pub half_spread: f64,
    pub tick: f64,
}

impl SyntheticChain {
    pub fn new(expiry_date: NaiveDate, spot: f64, volatility: f64, minutes_to_expiry: f64) -> Self {
        Self {
            expiry_date,
            spot,
            volatility,
            risk_free_rate: 0.0,
            dividend_yield: 0.0,
            minutes_to_expiry,
            strike_low: spot * 0.5,
            strike_high: spot * 1.5,
            strike_step: spot * 0.01,
            half_spread: 0.0,
            tick: 0.0,
        }
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    pub fn dividend_yield(mut self, q: f64) -> Self {
        self.dividend_yield = q;
        self
    }

    pub fn strikes(mut self, low: f64, high: f64, step: f64) -> Self {
        self.strike_low = low;
        self.strike_high = high;
        self.strike_step = step;
        self
    }

    pub fn spread(mut self, half_spread: f64, tick: f64) -> Self {
        self.half_spread = half_spread;
        self.tick = tick;
        self
    }

    pub fn time_to_expiry(&self) -> f64 {
        self.minutes_to_expiry / MINUTES_IN_A_YEAR
    }

    /// Forward implied by the model inputs, `S e^((r - q) T)`.
    pub fn forward(&self) -> f64 {
        self.spot * ((self.risk_free_rate - self.dividend_yield) * self.time_to_expiry()).exp()
    }

    fn round_to_tick(&self, value: f64) -> f64 {
        if self.tick > 0.0 {
            (value / self.tick).round() * self.tick
        } else {
            value
        }
    }

    fn quote(&self, option_type: OptionType, strike: f64) -> OptionQuote {
        let price = bs_price(
            option_type,
            self.spot,
            strike,
            self.risk_free_rate,
            self.dividend_yield,
            self.time_to_expiry(),
            self.volatility,
        );
        if self.tick > 0.0 && price < 0.5 * self.tick {
            return OptionQuote::new(strike, option_type, 0.0, self.tick);
        }
        let bid = self.round_to_tick((price - self.half_spread).max(0.0));
        let ask = self.round_to_tick(price + self.half_spread);
        OptionQuote::new(strike, option_type, bid, ask.max(bid))
    }

    /// Generate the chain, carrying its own rate and minutes to expiry.
    pub fn build(&self) -> ExpiryChain {
        let steps = ((self.strike_high - self.strike_low) / self.strike_step).round() as usize;
        let quotes = (0..=steps).flat_map(|i| {
            let strike = self.strike_low + i as f64 * self.strike_step;
            [self.quote(OptionType::Call, strike), self.quote(OptionType::Put, strike)]
        });
        ExpiryChain::new(self.expiry_date, quotes.collect::<Vec<_>>())
            .with_risk_free_rate(self.risk_free_rate)
            .with_minutes_to_expiry(self.minutes_to_expiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_grid_and_zero_bids_in_wings() {
        let chain = SyntheticChain::new(NaiveDate::from_ymd_opt(2024, 4, 25).unwrap(), 100.0, 0.2, 43_200.0)
            .strikes(50.0, 150.0, 5.0)
            .spread(0.05, 0.05)
            .build();

        assert_eq!(chain.rows().len(), 21);
        assert_eq!(chain.minutes_to_expiry, Some(43_200.0));
        let deep_put = &chain.rows()[0];
        assert!(!deep_put.has_market(OptionType::Put));
        let atm = &chain.rows()[10];
        assert_eq!(atm.strike, 100.0);
        assert!(atm.has_market(OptionType::Call) && atm.has_market(OptionType::Put));
    }
}

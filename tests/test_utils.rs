#![allow(dead_code)] // Each test binary uses a different subset of helpers

use chrono::{NaiveDate, NaiveDateTime};
use vix_lib::data::{load_chain, SyntheticChain};
use vix_lib::{ExpiryChain, OptionQuote, OptionType, Snapshot, VixConfig};

pub const NEAR_CHAIN_PATH: &str = "tests/data/near_month_option_chain.csv";
pub const NEXT_CHAIN_PATH: &str = "tests/data/next_month_option_chain.csv";
/// Near-term toy chain with a wide off-curve put at 4950 and call at 5250.
pub const NEAR_WIDE_CHAIN_PATH: &str = "tests/data/near_month_wide_quotes.csv";

/// Near-term rate of the toy snapshot (3.90%)
pub const NEAR_RATE: f64 = 0.039;
/// Next-term rate of the toy snapshot (4.65%)
pub const NEXT_RATE: f64 = 0.0465;
pub const NEAR_FUTURES: f64 = 5129.0;
pub const NEXT_FUTURES: f64 = 5115.0;

// Expected index values below were computed outside this crate: a separate
// double-precision script reads the same CSV files and applies the same
// formulas (parity forward at min |C - P|, K0, zero-bid scan, ΔK, variance
// sum, 30-day interpolation). The smoothed value uses a natural cubic spline
// solved by dense Gaussian elimination rather than the tridiagonal sweep used
// here. They are regression anchors for these fixtures, not published figures;
// no published whitepaper chain is reproduced end to end.

/// Index of the toy snapshot with parity forwards.
pub const TOY_INDEX_PARITY: f64 = 14.900217953332163;
/// Same snapshot with the futures prices as forwards.
pub const TOY_INDEX_FUTURES: f64 = 14.900067545999784;
/// Toy snapshot with the wide-quote near chain, raw mids.
pub const WIDE_INDEX_RAW: f64 = 14.903368149442239;
/// Toy snapshot with the wide-quote near chain, spline-smoothed mids.
pub const WIDE_INDEX_SMOOTHED: f64 = 14.901059852497136;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

pub fn toy_timestamp() -> NaiveDateTime {
    at(2024, 3, 19, 15, 30)
}

pub fn toy_near_expiry() -> NaiveDate {
    date(2024, 3, 28)
}

pub fn toy_next_expiry() -> NaiveDate {
    date(2024, 4, 25)
}

/// Near-term toy chain: 9 days (12960 minutes) to a 15:30 expiry.
pub fn toy_near_chain() -> ExpiryChain {
    load_chain(NEAR_CHAIN_PATH, toy_near_expiry())
        .expect("Failed to load near month chain")
        .with_risk_free_rate(NEAR_RATE)
        .with_futures_price(NEAR_FUTURES)
}

/// Next-term toy chain: 37 days (53280 minutes) to a 15:30 expiry.
pub fn toy_next_chain() -> ExpiryChain {
    load_chain(NEXT_CHAIN_PATH, toy_next_expiry())
        .expect("Failed to load next month chain")
        .with_risk_free_rate(NEXT_RATE)
        .with_futures_price(NEXT_FUTURES)
}

/// Near-term toy chain with two wide quotes inside the out-of-the-money knot range.
pub fn toy_near_wide_chain() -> ExpiryChain {
    load_chain(NEAR_WIDE_CHAIN_PATH, toy_near_expiry())
        .expect("Failed to load wide-quote near month chain")
        .with_risk_free_rate(NEAR_RATE)
        .with_futures_price(NEAR_FUTURES)
}

/// Toy snapshot with the wide-quote near chain in place of the regular one.
pub fn toy_wide_snapshot() -> Snapshot {
    Snapshot::new(toy_timestamp(), 0.10)
        .with_chain(toy_near_wide_chain())
        .with_chain(toy_next_chain())
}

/// Snapshot of both toy chains. The snapshot-level rate is deliberately
/// different from the per-expiry rates so a wrong fallback shows up.
pub fn toy_snapshot() -> Snapshot {
    Snapshot::new(toy_timestamp(), 0.10)
        .with_chain(toy_near_chain())
        .with_chain(toy_next_chain())
}

/// Two-expiry snapshot of dense, flat-volatility Black-Scholes chains.
pub fn synthetic_snapshot(volatility: f64, near_minutes: f64, next_minutes: f64) -> Snapshot {
    let build = |expiry: NaiveDate, minutes: f64| {
        SyntheticChain::new(expiry, 100.0, volatility, minutes)
            .rate(0.05)
            .dividend_yield(0.01)
            .strikes(30.0, 250.0, 0.5)
            .spread(0.0, 0.01)
            .build()
    };
    Snapshot::new(at(2024, 1, 2, 10, 0), 0.05)
        .with_chain(build(date(2024, 1, 25), near_minutes))
        .with_chain(build(date(2024, 2, 8), next_minutes))
}

/// Copy of `chain` with every bid and ask multiplied by `factor`.
pub fn scale_chain(chain: &ExpiryChain, factor: f64) -> ExpiryChain {
    rebuild(chain, |q| OptionQuote::new(q.strike, q.option_type, q.bid * factor, q.ask * factor))
}

/// Copy of `chain` with both sides of one quote raised by `bump`.
pub fn bump_quote(chain: &ExpiryChain, strike: f64, side: OptionType, bump: f64) -> ExpiryChain {
    rebuild(chain, |q| {
        if q.strike == strike && q.option_type == side {
            OptionQuote::new(q.strike, q.option_type, q.bid + bump, q.ask + bump)
        } else {
            q
        }
    })
}

fn rebuild(chain: &ExpiryChain, f: impl Fn(OptionQuote) -> OptionQuote) -> ExpiryChain {
    let quotes: Vec<OptionQuote> = chain
        .rows()
        .iter()
        .flat_map(|row| [row.call, row.put])
        .flatten()
        .map(f)
        .collect();

    let mut rebuilt = ExpiryChain::new(chain.expiry_date, quotes);
    rebuilt.risk_free_rate = chain.risk_free_rate;
    rebuilt.futures_price = chain.futures_price;
    rebuilt.minutes_to_expiry = chain.minutes_to_expiry;
    rebuilt
}

/// Default configuration with debug logging switched on.
pub fn create_verbose_test_config() -> VixConfig {
    VixConfig {
        verbosity: 2,
        ..VixConfig::default()
    }
}

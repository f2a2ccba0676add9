use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Minutes in a 365-day year, the annualisation base for every time-to-expiry.
pub const MINUTES_IN_A_YEAR: f64 = 525_600.0;

/// Minutes in one calendar day.
pub const MINUTES_IN_A_DAY: f64 = 1_440.0;

/// Option right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    Call,
    Put,
}

/// A single bid/ask quote for one listed option.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionQuote {
    /// Strike price
    pub strike: f64,
    /// Call or put
    pub option_type: OptionType,
    /// Best bid (0 means no bid)
    pub bid: f64,
    /// Best ask
    pub ask: f64,
}

impl OptionQuote {
    pub fn new(strike: f64, option_type: OptionType, bid: f64, ask: f64) -> Self {
        Self {
            strike,
            option_type,
            bid,
            ask,
        }
    }

    pub fn call(strike: f64, bid: f64, ask: f64) -> Self {
        Self::new(strike, OptionType::Call, bid, ask)
    }

    pub fn put(strike: f64, bid: f64, ask: f64) -> Self {
        Self::new(strike, OptionType::Put, bid, ask)
    }

    /// A quote is live only when both sides are strictly positive.
    /// A zero bid is "no market" whatever the ask says.
    pub fn has_market(&self) -> bool {
        self.bid > 0.0 && self.ask > 0.0
    }

    /// Mid-price, or `None` when the quote has no live market.
    pub fn mid(&self) -> Option<f64> {
        if self.has_market() {
            Some(0.5 * (self.bid + self.ask))
        } else {
            None
        }
    }

    /// Bid/ask spread relative to the mid, `None` without a live market.
    pub fn relative_spread(&self) -> Option<f64> {
        self.mid().map(|mid| (self.ask - self.bid) / mid)
    }
}

/// The call and put quoted at one strike of an expiry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeRow {
    pub strike: f64,
    pub call: Option<OptionQuote>,
    pub put: Option<OptionQuote>,
    /// Mid-price overrides produced by quote smoothing; `None` means use the raw mid.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub smoothed_call_mid: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub smoothed_put_mid: Option<f64>,
}

impl StrikeRow {
    fn empty(strike: f64) -> Self {
        Self {
            strike,
            call: None,
            put: None,
            smoothed_call_mid: None,
            smoothed_put_mid: None,
        }
    }

    pub fn quote(&self, option_type: OptionType) -> Option<&OptionQuote> {
        match option_type {
            OptionType::Call => self.call.as_ref(),
            OptionType::Put => self.put.as_ref(),
        }
    }

    /// True when the given side has a positive bid.
    pub fn has_market(&self, option_type: OptionType) -> bool {
        self.quote(option_type).is_some_and(OptionQuote::has_market)
    }

    /// Effective mid for one side: the smoothed value if present, else the raw mid.
    /// Always `None` for a side without a live market.
    pub fn mid(&self, option_type: OptionType) -> Option<f64> {
        let quote = self.quote(option_type)?;
        let raw = quote.mid()?;
        let smoothed = match option_type {
            OptionType::Call => self.smoothed_call_mid,
            OptionType::Put => self.smoothed_put_mid,
        };
        Some(smoothed.unwrap_or(raw))
    }
}

/// All quotes of a single expiry, stored as strike rows in increasing strike order.
///
/// At most one call and one put is kept per strike; a duplicate replaces the
/// earlier quote of the same side.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpiryChain {
    pub expiry_date: NaiveDate,
    rows: Vec<StrikeRow>,
    /// Rate for this expiry; falls back to the snapshot rate when absent.
    pub risk_free_rate: Option<f64>,
    /// Futures price for this expiry, used when the forward source is `Futures`.
    pub futures_price: Option<f64>,
    /// Explicit minutes to expiry, overriding the value derived from the snapshot clock.
    pub minutes_to_expiry: Option<f64>,
}

impl ExpiryChain {
    pub fn new(expiry_date: NaiveDate, quotes: impl IntoIterator<Item = OptionQuote>) -> Self {
        let mut rows: Vec<StrikeRow> = Vec::new();
        for quote in quotes {
            let idx = match rows.binary_search_by(|row| cmp_f64(row.strike, quote.strike)) {
                Ok(idx) => idx,
                Err(idx) => {
                    rows.insert(idx, StrikeRow::empty(quote.strike));
                    idx
                }
            };
            let slot = match quote.option_type {
                OptionType::Call => &mut rows[idx].call,
                OptionType::Put => &mut rows[idx].put,
            };
            if slot.is_some() {
                tracing::warn!(
                    expiry = %expiry_date,
                    strike = quote.strike,
                    "duplicate {:?} quote replaces the earlier one",
                    quote.option_type
                );
            }
            *slot = Some(quote);
        }

        Self {
            expiry_date,
            rows,
            risk_free_rate: None,
            futures_price: None,
            minutes_to_expiry: None,
        }
    }

    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    pub fn with_futures_price(mut self, price: f64) -> Self {
        self.futures_price = Some(price);
        self
    }

    pub fn with_minutes_to_expiry(mut self, minutes: f64) -> Self {
        self.minutes_to_expiry = Some(minutes);
        self
    }

    /// Strike rows, strictly increasing by strike.
    pub fn rows(&self) -> &[StrikeRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [StrikeRow] {
        &mut self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn strikes(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|row| row.strike)
    }

    /// Minutes from `timestamp` to the expiry, using the explicit override when present.
    pub fn minutes_to_expiry_from(&self, timestamp: NaiveDateTime, expiry_time: NaiveTime) -> f64 {
        self.minutes_to_expiry.unwrap_or_else(|| {
            let expiry = self.expiry_date.and_time(expiry_time);
            (expiry - timestamp).num_minutes() as f64
        })
    }
}

/// Market snapshot: every expiry chain observed at one timestamp plus the rate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub timestamp: NaiveDateTime,
    pub chains: BTreeMap<NaiveDate, ExpiryChain>,
    /// Annualised continuously-compounded rate (0.07 for 7%)
    pub risk_free_rate: f64,
}

impl Snapshot {
    pub fn new(timestamp: NaiveDateTime, risk_free_rate: f64) -> Self {
        Self {
            timestamp,
            chains: BTreeMap::new(),
            risk_free_rate,
        }
    }

    pub fn with_chain(mut self, chain: ExpiryChain) -> Self {
        self.insert_chain(chain);
        self
    }

    pub fn insert_chain(&mut self, chain: ExpiryChain) {
        self.chains.insert(chain.expiry_date, chain);
    }
}

/// An expiry chain pinned to the snapshot clock: its time to expiry and effective rate.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryTerm<'a> {
    pub chain: &'a ExpiryChain,
    pub minutes_to_expiry: f64,
    /// `minutes_to_expiry / MINUTES_IN_A_YEAR`
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
}

impl<'a> ExpiryTerm<'a> {
    pub fn new(chain: &'a ExpiryChain, minutes_to_expiry: f64, snapshot_rate: f64) -> Self {
        Self {
            chain,
            minutes_to_expiry,
            time_to_expiry: minutes_to_expiry / MINUTES_IN_A_YEAR,
            risk_free_rate: chain.risk_free_rate.unwrap_or(snapshot_rate),
        }
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.chain.expiry_date
    }

    pub fn days_to_expiry(&self) -> f64 {
        self.minutes_to_expiry / MINUTES_IN_A_DAY
    }

    /// `e^(rT)`, the growth factor used by put-call parity and the variance sum.
    pub fn growth_factor(&self) -> f64 {
        (self.risk_free_rate * self.time_to_expiry).exp()
    }
}

/// Near- and next-term expiries chosen to bracket the constant-maturity target.
#[derive(Debug, Clone, Copy)]
pub struct SelectedExpiryPair<'a> {
    pub near: ExpiryTerm<'a>,
    pub next: ExpiryTerm<'a>,
}

/// How a forward estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForwardSource {
    /// Put-call parity at the strike with the smallest call/put mid difference
    #[default]
    PutCallParity,
    /// Futures price supplied on the chain
    Futures,
}

/// Forward index level for one expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForwardEstimate {
    pub expiry_date: NaiveDate,
    /// Strike minimising |call_mid - put_mid| (the parity strike); `None` for futures forwards
    pub strike_atm: Option<f64>,
    pub forward_price: f64,
    pub source: ForwardSource,
}

/// Which option prices a universe strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuoteSide {
    Put,
    Call,
    /// Average of call and put at the ATM strike
    Straddle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniverseEntry {
    pub strike: f64,
    pub side: QuoteSide,
    pub mid_price: f64,
    /// Half the distance between the neighbouring universe strikes (single gap at the ends)
    pub delta_k: f64,
}

/// Ordered strikes contributing to one expiry's variance sum.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeUniverse {
    pub expiry_date: NaiveDate,
    /// K0: the highest listed strike not above the forward
    pub strike_atm_rounded: f64,
    /// Entries in strictly increasing strike order
    pub entries: Vec<UniverseEntry>,
}

impl StrikeUniverse {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn strikes(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.strike).collect()
    }
}

/// Model-free variance of one expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarianceResult {
    pub expiry_date: NaiveDate,
    pub variance: f64,
    pub time_to_expiry_years: f64,
}

/// Published index value in percentage points (14.23 means 14.23%).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexValue(pub f64);

impl IndexValue {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Annualised volatility as a decimal (0.1423 for an index of 14.23).
    pub fn as_volatility(self) -> f64 {
        self.0 / 100.0
    }
}

impl std::fmt::Display for IndexValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Per-expiry audit trail of one index computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermBreakdown {
    pub forward: ForwardEstimate,
    pub strike_atm_rounded: f64,
    pub universe_size: usize,
    pub minutes_to_expiry: f64,
    pub risk_free_rate: f64,
    pub variance: VarianceResult,
}

/// Index value with everything that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexBreakdown {
    pub timestamp: NaiveDateTime,
    pub index: IndexValue,
    pub variance_30d: f64,
    pub near_weight: f64,
    pub next_weight: f64,
    pub near: TermBreakdown,
    pub next: TermBreakdown,
}

pub(crate) fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::calculation::types::{ExpiryChain, OptionQuote};

/// One strike of a wide option-chain table.
///
/// Empty cells are read as `None` and become zero (no market).
#[derive(Debug, Deserialize)]
struct ChainCsvRow {
    #[serde(rename = "Strike")]
    strike: f64,
    #[serde(rename = "Call Bid", default)]
    call_bid: Option<f64>,
    #[serde(rename = "Call Ask", default)]
    call_ask: Option<f64>,
    #[serde(rename = "Put Bid", default)]
    put_bid: Option<f64>,
    #[serde(rename = "Put Ask", default)]
    put_ask: Option<f64>,
}

/// Read an expiry chain from CSV with columns `Strike,Call Bid,Call Ask,Put Bid,Put Ask`.
pub fn read_chain<R: Read>(reader: R, expiry_date: NaiveDate) -> Result<ExpiryChain> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut quotes = Vec::new();

    for (line, record) in reader.deserialize::<ChainCsvRow>().enumerate() {
        let row = record.with_context(|| format!("malformed option chain row {}", line + 1))?;
        if !row.strike.is_finite() || row.strike <= 0.0 {
            return Err(anyhow!("row {}: strike must be positive, got {}", line + 1, row.strike));
        }
        quotes.push(OptionQuote::call(
            row.strike,
            row.call_bid.unwrap_or(0.0),
            row.call_ask.unwrap_or(0.0),
        ));
        quotes.push(OptionQuote::put(
            row.strike,
            row.put_bid.unwrap_or(0.0),
            row.put_ask.unwrap_or(0.0),
        ));
    }

    let chain = ExpiryChain::new(expiry_date, quotes);
    if chain.is_empty() {
        return Err(anyhow!("option chain for {} is empty", expiry_date));
    }
    Ok(chain)
}

/// Load an expiry chain from a CSV file, see [`read_chain`].
pub fn load_chain(path: impl AsRef<Path>, expiry_date: NaiveDate) -> Result<ExpiryChain> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open option chain {}", path.display()))?;
    read_chain(file, expiry_date).with_context(|| format!("failed to read {}", path.display()))
}

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use vix_lib::data::SyntheticChain;
use vix_lib::{compute_index_batch, Snapshot, VixConfig};

/// Flat-volatility chains for a near (9d) and next (37d) expiry, seen `shift` days later.
fn snapshot(base: NaiveDate, shift: i64, near_vol: f64, next_vol: f64) -> Result<Snapshot> {
    let today = base + Duration::days(shift);
    let timestamp = today
        .and_hms_opt(15, 30, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid timestamp"))?;
    let chain = |days: i64, vol: f64| {
        let expiry = base + Duration::days(days);
        let minutes = (days - shift) as f64 * 1_440.0;
        SyntheticChain::new(expiry, 22_000.0, vol, minutes)
            .rate(0.068)
            .strikes(15_000.0, 30_000.0, 50.0)
            .spread(0.5, 0.05)
            .build()
    };
    Ok(Snapshot::new(timestamp, 0.068)
        .with_chain(chain(9, near_vol))
        .with_chain(chain(37, next_vol)))
}

fn main() -> Result<()> {
    println!("Synthetic Term Structure Demo");
    println!("=============================\n");
    println!("Near expiry priced at 18% vol, next expiry at 13% vol.");
    println!("As the near expiry approaches, its weight in the 30-day index shrinks.\n");

    let base = NaiveDate::from_ymd_opt(2024, 6, 3).ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    let shifts: Vec<i64> = (0..6).collect();
    let snapshots = shifts
        .iter()
        .map(|&shift| snapshot(base, shift, 0.18, 0.13))
        .collect::<Result<Vec<_>>>()?;

    let results = compute_index_batch(&snapshots, &VixConfig::default());

    println!("{:>10}  {:>10}  {:>10}", "date", "near days", "index");
    for ((shift, snapshot), result) in shifts.iter().zip(&snapshots).zip(results) {
        let date = snapshot.timestamp.date();
        match result {
            Ok(index) => println!("{:>10}  {:>10}  {:>10}", date, 9 - shift, index),
            Err(e) => println!("{:>10}  {:>10}  error: {e}", date, 9 - shift),
        }
    }

    Ok(())
}

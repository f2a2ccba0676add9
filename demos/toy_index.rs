use anyhow::Result;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;
use vix_lib::data::load_chain;
use vix_lib::{compute_index_detailed, ForwardSource, Snapshot, TermBreakdown, VixConfig};

fn print_term(label: &str, term: &TermBreakdown) {
    println!("{label} term ({}):", term.variance.expiry_date);
    println!("   Minutes to expiry: {}", term.minutes_to_expiry);
    println!("   Risk-free rate: {:.2}%", term.risk_free_rate * 100.0);
    println!(
        "   Forward: {:.4} ({:?}, parity strike {:?})",
        term.forward.forward_price, term.forward.source, term.forward.strike_atm
    );
    println!("   K0: {}", term.strike_atm_rounded);
    println!("   Strikes in variance sum: {}", term.universe_size);
    println!("   Variance: {:.8}\n", term.variance.variance);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Volatility Index Demo - Toy Near/Next Month Chains");
    println!("==================================================\n");

    let timestamp = NaiveDate::from_ymd_opt(2024, 3, 19)
        .and_then(|d| d.and_hms_opt(15, 30, 0))
        .ok_or_else(|| anyhow::anyhow!("invalid snapshot timestamp"))?;
    let near_expiry = NaiveDate::from_ymd_opt(2024, 3, 28).ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    let next_expiry = NaiveDate::from_ymd_opt(2024, 4, 25).ok_or_else(|| anyhow::anyhow!("invalid date"))?;

    let near = load_chain("tests/data/near_month_option_chain.csv", near_expiry)?
        .with_risk_free_rate(0.039)
        .with_futures_price(5129.0);
    let next = load_chain("tests/data/next_month_option_chain.csv", next_expiry)?
        .with_risk_free_rate(0.0465)
        .with_futures_price(5115.0);
    let snapshot = Snapshot::new(timestamp, 0.04).with_chain(near).with_chain(next);

    let config = VixConfig {
        verbosity: 1,
        ..VixConfig::default()
    };
    let breakdown = compute_index_detailed(&snapshot, &config)?;

    print_term("Near", &breakdown.near);
    print_term("Next", &breakdown.next);
    println!(
        "Weights: near {:.4}, next {:.4}",
        breakdown.near_weight, breakdown.next_weight
    );
    println!("30-day variance: {:.8}", breakdown.variance_30d);
    println!("Index (put-call parity forwards): {}\n", breakdown.index);

    let futures = VixConfig {
        forward_source: ForwardSource::Futures,
        ..config
    };
    let index = compute_index_detailed(&snapshot, &futures)?.index;
    println!("Index (futures forwards): {index}");

    Ok(())
}

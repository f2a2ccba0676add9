use chrono::NaiveDate;
use vix_lib::data::SyntheticChain;
use vix_lib::{compute_index_with_config, default_configs, Snapshot};

fn main() {
    println!("VIX-lib Default Configuration Examples\n");

    // 1. NSE configuration (the default)
    println!("1. NSE Configuration (default):");
    let nse = default_configs::nse();
    println!("   Target horizon: {} days", nse.target_days);
    println!("   Minimum days to expiry: {}", nse.min_days_to_expiry);
    println!("   Expiry time: {}", nse.expiry_time);
    println!("   Forward source: {:?}", nse.forward_source);
    println!("   Use case: Indian index options, continuous intraday calculation\n");

    // 2. CBOE configuration
    println!("2. CBOE Configuration:");
    let cboe = default_configs::cboe();
    println!("   Expiry time: {} (AM settlement)", cboe.expiry_time);
    println!("   Minimum days to expiry: {}", cboe.min_days_to_expiry);
    println!("   Use case: SPX-style weekly roll\n");

    // 3. Smoothed configuration
    println!("3. Smoothed Configuration:");
    let smoothed = default_configs::smoothed();
    println!("   Smoothing enabled: {}", smoothed.smoothing.enabled);
    println!(
        "   Max relative spread for spline knots: {:.0}%",
        smoothed.smoothing.max_relative_spread * 100.0
    );
    println!("   Minimum knots per side: {}", smoothed.smoothing.min_knots);
    println!("   Use case: Illiquid chains with wide far-OTM quotes\n");

    // 4. Strict configuration
    println!("4. Strict Configuration:");
    let strict = default_configs::strict();
    println!("   Mid-price decimals: {:?}", strict.rounding.mid_price_decimals);
    println!("   Use case: Reproducing tick-rounded published values\n");

    // Example calculation with every preset
    println!("Running example calculation on a synthetic 16% vol snapshot...");
    let Some(timestamp) = NaiveDate::from_ymd_opt(2024, 6, 3).and_then(|d| d.and_hms_opt(15, 30, 0)) else {
        return;
    };
    let mut snapshot = Snapshot::new(timestamp, 0.05);
    for (month, day) in [(6, 20), (7, 11)] {
        let Some(expiry) = NaiveDate::from_ymd_opt(2024, month, day) else {
            continue;
        };
        let minutes = (expiry - timestamp.date()).num_days() as f64 * 1_440.0;
        let chain = SyntheticChain::new(expiry, 100.0, 0.16, minutes)
            .rate(0.05)
            .strikes(50.0, 160.0, 1.0)
            .spread(0.02, 0.01)
            .build();
        snapshot.insert_chain(chain);
    }

    for (name, config) in [
        ("nse", default_configs::nse()),
        ("cboe", default_configs::cboe()),
        ("smoothed", default_configs::smoothed()),
        ("strict", default_configs::strict()),
    ] {
        match compute_index_with_config(&snapshot, &config) {
            Ok(index) => println!("   {name:>8}: {index}"),
            Err(e) => println!("   {name:>8}: failed: {e}"),
        }
    }
}

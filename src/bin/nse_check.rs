//! Binary that primes a session against NSE, compiles the NIFTY option chain
//! and prints the headline metrics, for inspecting live data.
//!
//! # Usage
//!
//! ```sh
//! export NSE_DOWNLOAD_DIR="./downloads"   # optional
//! cargo run --bin nse_check --features cli -- NIFTY 5
//! ```

use std::env;

use nse_rs::NseClient;

#[tokio::main]
async fn main() -> nse_rs::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let symbol = args.next().unwrap_or_else(|| "NIFTY".to_owned());
    let window: u32 = args.next().and_then(|n| n.parse().ok()).unwrap_or(5);
    let dir = env::var("NSE_DOWNLOAD_DIR").unwrap_or_else(|_| "./downloads".to_owned());

    let client = NseClient::new(dir)?;

    println!("Fetching expiries for {symbol}…");
    let expiries = client.expiry_dates(&symbol).await?;
    println!("  {} expiries, nearest {:?}", expiries.len(), expiries.first());

    let compiled = client.compiled_option_chain(&symbol, None).await?;
    println!(
        "{symbol} {}: underlying {} | ATM {} | max pain {:?} | PCR {} | max CE OI {:?} | max PE OI {:?}",
        compiled.expiry,
        compiled.underlying,
        compiled.atm,
        compiled.maxpain,
        compiled.pcr,
        compiled.max_coi,
        compiled.max_poi,
    );

    let essential = client
        .essential_option_chain(&symbol, Some(&compiled.expiry), window)
        .await?;
    println!("\n±{window} strikes around {}:", essential.atm);
    for row in &essential.rows {
        let ce = row.ce.as_ref().map_or(0.0, |leg| leg.last_price);
        let pe = row.pe.as_ref().map_or(0.0, |leg| leg.last_price);
        println!("  {:>10}  CE {:>9.2}  PE {:>9.2}", row.strike_price, ce, pe);
    }

    client.shutdown().await?;
    println!("\nCookies saved to {}", client.session().config().cookie_path().display());
    Ok(())
}

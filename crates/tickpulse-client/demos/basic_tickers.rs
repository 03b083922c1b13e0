//! # Basic Tickers Example
//!
//! The simplest possible driver: fetch the recent daily series for one
//! symbol and print the closes.
//!
//! ## Usage
//!
//! ```bash
//! TICKPULSE_API_URL=http://localhost:3000 cargo run --example basic_tickers
//! ```

use tickpulse_client::{ClientConfig, TickPulseClient, TickersQuery};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = TickPulseClient::new(ClientConfig::from_env());

    println!("📊 Fetching daily series for VCB...");
    let reply = client
        .tickers(&TickersQuery::new().symbol("VCB").limit(10))
        .await?;

    for (symbol, records) in &reply.data {
        println!("✅ {} ({} records)", symbol, records.len());
        for record in records {
            println!(
                "   {}  close {:>10.1}  volume {:>12}  ma20 {}",
                record.time,
                record.close,
                record.volume,
                record
                    .ma20
                    .map_or_else(|| String::from("-"), |v| format!("{v:.1}")),
            );
        }
    }

    Ok(())
}

//! # Health Check Example
//!
//! Queries `/health` and prints worker, memory and cache statistics.
//!
//! ## Usage
//!
//! ```bash
//! TICKPULSE_API_URL=http://localhost:3000 cargo run --example health_check
//! ```

use tickpulse_client::{ClientConfig, TickPulseClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = TickPulseClient::new(ClientConfig::from_env());

    println!("🩺 Checking service health...");
    let health = client.health().await?.into_data();

    println!("✅ Service is reachable");
    println!("   Uptime: {}s", health.uptime_secs);
    println!(
        "   Memory: {:.1}MB / {:.1}MB ({:.1}%)",
        health.memory_usage_mb, health.memory_limit_mb, health.memory_usage_percent
    );
    println!(
        "   Tickers: {} active of {} total",
        health.active_tickers_count, health.total_tickers_count
    );
    println!(
        "   Records: {} daily, {} hourly, {} minute",
        health.daily_records_count, health.hourly_records_count, health.minute_records_count
    );
    println!(
        "   Trading hours: {} ({})",
        if health.is_trading_hours { "open" } else { "closed" },
        health.trading_hours_timezone
    );
    if let Some(last_sync) = &health.daily_last_sync {
        println!("   Last daily sync: {last_sync}");
    }

    Ok(())
}

//! # Error Handling Example
//!
//! Demonstrates branching on the client error taxonomy: validation
//! failures that never reach the network, and transport failures that
//! exhaust the retry budget.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example error_handling
//! ```

use std::time::Duration;

use tickpulse_client::{
    ClientConfig, ClientError, MaScoresQuery, RetryPolicy, TickPulseClient, TickersQuery,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = TickPulseClient::new(
        ClientConfig::from_env()
            .with_timeout(Duration::from_secs(10))
            .with_debug(true),
    );

    println!("1️⃣  Validation: malformed date");
    match client
        .tickers(&TickersQuery::new().symbol("VCB").date_range("invalid-date", "2025-12-31"))
        .await
    {
        Err(ClientError::Validation { field, message }) => {
            println!("   ✅ Caught validation error on '{field}': {message}");
        }
        other => println!("   ❌ Unexpected outcome: {other:?}"),
    }

    println!("2️⃣  Validation: unknown moving-average period");
    match client
        .ma_scores_by_sector(&MaScoresQuery::new().ma_period(999))
        .await
    {
        Err(ClientError::Validation { field, message }) => {
            println!("   ✅ Caught validation error on '{field}': {message}");
        }
        other => println!("   ❌ Unexpected outcome: {other:?}"),
    }

    println!("3️⃣  Network: unreachable address, short retry budget");
    let unreachable = TickPulseClient::new(
        ClientConfig::default()
            .with_base_url("http://localhost:9999")
            .with_timeout(Duration::from_secs(2))
            .with_retry(RetryPolicy {
                max_retries: 1,
                initial_delay: Duration::from_millis(500),
                max_delay: Duration::from_secs(1),
                multiplier: 2.0,
            }),
    );
    match unreachable.health().await {
        Err(ClientError::Network { message }) => {
            println!("   ✅ Caught network error after retries: {message}");
        }
        other => println!("   ❌ Unexpected outcome: {other:?}"),
    }

    Ok(())
}

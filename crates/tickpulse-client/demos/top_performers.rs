//! # Top Performers Example
//!
//! Fetches the day's strongest and weakest movers by close change.
//!
//! ## Usage
//!
//! ```bash
//! TICKPULSE_API_URL=http://localhost:3000 cargo run --example top_performers
//! ```

use tickpulse_client::{
    ClientConfig, SortDirection, SortMetric, TickPulseClient, TopPerformersQuery,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = TickPulseClient::new(ClientConfig::from_env());

    println!("🏆 Top 10 by close change...");
    let top = client
        .top_performers(
            &TopPerformersQuery::new()
                .sort_by(SortMetric::CloseChanged)
                .limit(10),
        )
        .await?
        .into_data();

    println!("   Analysis date: {}", top.analysis_date);
    for performer in &top.data.performers {
        println!(
            "   {:<8} close {:>10.1}  change {:>6.2}%",
            performer.symbol,
            performer.close,
            performer.close_changed.unwrap_or(0.0),
        );
    }

    println!();
    println!("📉 Bottom 5 by close change...");
    let bottom = client
        .top_performers(
            &TopPerformersQuery::new()
                .sort_by(SortMetric::CloseChanged)
                .direction(SortDirection::Asc)
                .limit(5),
        )
        .await?
        .into_data();

    for performer in &bottom.data.performers {
        println!(
            "   {:<8} close {:>10.1}  change {:>6.2}%",
            performer.symbol,
            performer.close,
            performer.close_changed.unwrap_or(0.0),
        );
    }

    Ok(())
}

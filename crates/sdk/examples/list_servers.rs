//! Search the PulseMCP directory.
//!
//! Run with: cargo run --example list_servers -- <query>

use pulse_sdk::{ListServersParams, PulseClient, PulseResult};
use std::time::Duration;

#[tokio::main]
async fn main() -> PulseResult<()> {
    tracing_subscriber::fmt::init();

    let query = std::env::args().nth(1);

    let client = PulseClient::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let mut params = ListServersParams::new().count_per_page(20);
    if let Some(query) = query {
        params = params.query(query);
    }

    let page = client.servers().list(&params).await?;
    println!("Showing {} of {} servers", page.servers.len(), page.total_count);

    for server in &page.servers {
        println!("  {} - {}", server.name, server.url);
        if let Some(ref description) = server.short_description {
            println!("      {}", description);
        }
    }

    if let Some(next) = page.next {
        println!("\nNext page: {}", next);
    }

    Ok(())
}

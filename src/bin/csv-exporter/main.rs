mod args;

use anyhow::Context as _;
use args::Args;
use chrono::Utc;
use clap::Parser as _;
use helmet_telemetry::client::ApiClient;
use helmet_telemetry::export::write_snapshot;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let client = ApiClient::new(&args.base_url);
    let response = client
        .recent_data()
        .await
        .context("failed to fetch recent readings")?;

    let today = Utc::now().date_naive();
    match write_snapshot(&args.out_dir, &response.data, today)? {
        Some(path) => println!(
            "Exported {} readings to {}",
            response.data.len(),
            path.display()
        ),
        None => println!("No readings to export"),
    }

    Ok(())
}

mod args;
mod render;

use std::process::ExitCode;

use anyhow::Result;
use args::Args;
use clap::Parser as _;
use helmet_telemetry::client::ApiClient;
use helmet_telemetry::poller::Poller;
use helmet_telemetry::telemetry::AlertPager;
use tokio::time::{Duration, interval, sleep};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let every = Duration::from_secs(args.interval_secs);

    let mut poller = Poller::new(ApiClient::new(&args.base_url));
    poller.start(every);

    let mut pager = AlertPager::new();
    let mut remaining = args.cycles;

    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        // let the fetch issued on this tick land before drawing
        sleep(Duration::from_millis(500)).await;

        render::draw(&poller.snapshot(), &mut pager, args.timezone);

        if let Some(cycles) = remaining.as_mut() {
            *cycles = cycles.saturating_sub(1);
            if *cycles == 0 {
                break;
            }
        }
    }

    poller.stop();
    Ok(())
}

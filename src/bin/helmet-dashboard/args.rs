use chrono_tz::Tz;
use clap::Parser;
use helmet_telemetry::client::DEFAULT_API_BASE;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "HELMET_API_BASE", default_value = DEFAULT_API_BASE)]
    pub base_url: String,

    /// Timezone for displayed times and chart labels.
    #[arg(long, env = "TZ", default_value = "UTC")]
    pub timezone: Tz,

    /// Seconds between automatic refreshes.
    #[arg(long, default_value_t = 10)]
    pub interval_secs: u64,

    /// Render this many cycles and exit; runs until interrupted when omitted.
    #[arg(long)]
    pub cycles: Option<u64>,
}

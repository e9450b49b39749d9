use clap::Parser;
use helmet_telemetry::client::DEFAULT_API_BASE;

/// Pushes one reading the way a helmet device would. Every field is
/// optional; the service accepts any subset.
#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "HELMET_API_BASE", default_value = DEFAULT_API_BASE)]
    pub base_url: String,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub humidity: Option<f64>,

    #[arg(long)]
    pub gas_value: Option<f64>,

    #[arg(long)]
    pub flame_status: Option<String>,

    #[arg(long)]
    pub ir_value: Option<String>,

    #[arg(long)]
    pub accel_x: Option<f64>,

    #[arg(long)]
    pub accel_y: Option<f64>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub emergency: bool,

    #[arg(long)]
    pub reason: Option<String>,
}

use std::path::PathBuf;

use clap::Parser;
use helmet_telemetry::client::DEFAULT_API_BASE;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "HELMET_API_BASE", default_value = DEFAULT_API_BASE)]
    pub base_url: String,

    /// Directory the dated CSV file is written into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

mod args;

use anyhow::Context as _;
use args::Args;
use clap::Parser as _;
use helmet_telemetry::client::ApiClient;
use serde_json::{Map, Value, json};
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
    let payload = payload(&args);
    let response = client
        .save_reading(&payload)
        .await
        .context("failed to save reading")?;

    println!(
        "{}: {}",
        if response.success { "ok" } else { "rejected" },
        response.message
    );

    Ok(())
}

fn payload(args: &Args) -> Value {
    let mut fields = Map::new();
    let mut put = |key: &str, value: Option<Value>| {
        if let Some(value) = value {
            fields.insert(key.to_string(), value);
        }
    };

    put("temperature", args.temperature.map(|v| json!(v)));
    put("humidity", args.humidity.map(|v| json!(v)));
    put("gasValue", args.gas_value.map(|v| json!(v)));
    put("flameStatus", args.flame_status.as_ref().map(|v| json!(v)));
    put("irValue", args.ir_value.as_ref().map(|v| json!(v)));
    put("accelX", args.accel_x.map(|v| json!(v)));
    put("accelY", args.accel_y.map(|v| json!(v)));
    put("location", args.location.as_ref().map(|v| json!(v)));
    put("emergency", Some(json!(args.emergency)));
    put("reason", args.reason.as_ref().map(|v| json!(v)));

    Value::Object(fields)
}

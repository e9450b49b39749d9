pub mod client;
pub mod export;
pub mod poller;
pub mod telemetry;

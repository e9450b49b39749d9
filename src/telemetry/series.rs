use chrono::DateTime;
use chrono_tz::Tz;

use crate::telemetry::SensorRecord;

/// How many of the newest records feed the trend chart.
pub const SERIES_WINDOW: usize = 15;

/// One chart point. Missing readings pass through as `None`; gap rendering
/// is the chart's problem, not ours.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub time: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

/// Reshape the newest `window` records (batch order is newest-first) into a
/// chronological temperature/humidity series.
pub fn build_series(batch: &[SensorRecord], timezone: Tz, window: usize) -> Vec<SeriesPoint> {
    batch
        .iter()
        .take(window)
        .rev()
        .map(|record| SeriesPoint {
            time: time_label(record.timestamp.as_deref(), timezone),
            temperature: record.temperature,
            humidity: record.humidity,
        })
        .collect()
}

fn time_label(timestamp: Option<&str>, timezone: Tz) -> String {
    let Some(timestamp) = timestamp else {
        return String::new();
    };
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed.with_timezone(&timezone).format("%H:%M:%S").to_string(),
        Err(_) => String::new(),
    }
}

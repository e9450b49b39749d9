use chrono::DateTime;
use chrono_tz::Tz;
use helmet_telemetry::poller::FetchState;
use helmet_telemetry::telemetry::{
    AlertPager, NO_REASON, RawValue, SERIES_WINDOW, build_series, compute_metrics, filter_alerts,
    latest_alert,
};

/// Shown wherever a reading is missing. Formatting is a display concern;
/// the underlying `None` is preserved all the way here.
const PLACEHOLDER: &str = "—";

const ACTIVE_READINGS: usize = 3;

pub fn format_num(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(n) => format!("{n:.decimals$}"),
        None => PLACEHOLDER.to_string(),
    }
}

fn format_raw(value: Option<&RawValue>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

fn format_timestamp(timestamp: Option<&str>, timezone: Tz) -> String {
    let Some(timestamp) = timestamp else {
        return "No timestamp".to_string();
    };
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed
            .with_timezone(&timezone)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Draw one full dashboard frame from the current fetch state.
pub fn draw(state: &FetchState, pager: &mut AlertPager, timezone: Tz) {
    let metrics = compute_metrics(&state.batch);
    let alerts = filter_alerts(&state.batch);

    println!();
    println!("== Helmet Safety Overview ==");
    if let Some(last_fetch) = state.last_fetch {
        println!(
            "Last updated: {}",
            last_fetch.with_timezone(&timezone).format("%H:%M:%S")
        );
    }
    if let Some(error) = &state.error {
        println!("Could not load data: {error}");
    }
    if state.loading && state.batch.is_empty() {
        println!("Loading live data…");
    }

    println!(
        "Avg temp: {} °C | Avg humidity: {} % | Avg gas: {}",
        format_num(metrics.avg_temperature, 1),
        format_num(metrics.avg_humidity, 1),
        format_num(metrics.avg_gas, 1),
    );
    println!(
        "System status: {} ({})",
        metrics.system_status.as_str(),
        metrics.system_status.note(),
    );

    println!();
    println!("-- Active readings ({} in last fetch) --", state.batch.len());
    for (index, reading) in state.batch.iter().take(ACTIVE_READINGS).enumerate() {
        println!(
            "Helmet #{}  {}  [{}]",
            index + 1,
            format_timestamp(reading.timestamp.as_deref(), timezone),
            if reading.emergency { "Emergency" } else { "Monitoring" },
        );
        println!(
            "  temp {} °C | humidity {} % | gas {}",
            format_num(reading.temperature, 1),
            format_num(reading.humidity, 1),
            format_num(reading.gas_value, 1),
        );
        println!(
            "  flame {} | ir {} | g-force {}",
            format_raw(reading.flame_status.as_ref()),
            format_raw(reading.ir_value.as_ref()),
            format_num(reading.g_force(), 2),
        );
        println!(
            "  location: {}",
            reading.location.as_deref().filter(|l| !l.is_empty()).unwrap_or("Not provided"),
        );
        if reading.emergency
            && let Some(reason) = reading.reason.as_deref().filter(|r| !r.is_empty())
        {
            println!("  reason: {reason}");
        }
    }

    println!();
    println!("-- Temperature & humidity trend (last {SERIES_WINDOW} readings) --");
    for point in build_series(&state.batch, timezone, SERIES_WINDOW) {
        println!(
            "  {:>8}  temp {:>6}  humidity {:>6}",
            point.time,
            format_num(point.temperature, 1),
            format_num(point.humidity, 1),
        );
    }

    println!();
    match latest_alert(&alerts) {
        None => println!("No emergency flags in the recent readings."),
        Some(latest) => {
            println!(
                "Latest emergency at {}. Reason: {}",
                format_timestamp(latest.timestamp.as_deref(), timezone),
                latest.reason,
            );
        }
    }

    let page = pager.page_of(&alerts);
    if !page.items.is_empty() {
        println!();
        println!("-- Critical alerts --");
        for alert in page.items {
            println!(
                "  [Emergency] {}  {}",
                alert
                    .reason
                    .as_deref()
                    .filter(|r| !r.is_empty())
                    .unwrap_or(NO_REASON),
                format_timestamp(alert.timestamp.as_deref(), timezone),
            );
        }
        println!(
            "Showing {}–{} of {} | Page {} of {}",
            page.start + 1,
            page.end,
            alerts.len(),
            page.page,
            page.total_pages,
        );
    }
}

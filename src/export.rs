use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};

use crate::telemetry::SensorRecord;

/// Export schema, in order. Column names follow the service's wire names.
const COLUMNS: [&str; 11] = [
    "temperature",
    "humidity",
    "gasValue",
    "flameStatus",
    "irValue",
    "accelX",
    "accelY",
    "location",
    "emergency",
    "reason",
    "timestamp",
];

/// Serialize a batch snapshot to CSV bytes. An empty batch yields `None`;
/// exporting nothing is a defined outcome, not an error.
///
/// Rows follow batch order with no filtering. Every field is stringified
/// (missing values become empty strings) and quoted, with embedded quotes
/// doubled.
pub fn export_csv(batch: &[SensorRecord]) -> Result<Option<Vec<u8>>> {
    if batch.is_empty() {
        return Ok(None);
    }

    // header row is the column names literally, unquoted
    let mut out = COLUMNS.join(",").into_bytes();
    out.push(b'\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .from_writer(out);
    for record in batch {
        writer
            .write_record(row(record))
            .context("failed to write CSV row")?;
    }
    let out = writer
        .into_inner()
        .map_err(|e| anyhow!("failed to flush CSV buffer: {e}"))?;
    Ok(Some(out))
}

/// `helmet-readings-YYYY-MM-DD.csv`, dated at the export moment.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("helmet-readings-{}.csv", date.format("%Y-%m-%d"))
}

/// Serialize fully in memory, then write the file in one call, so a poll
/// landing mid-export cannot alter the artifact.
pub fn write_snapshot(
    dir: &Path,
    batch: &[SensorRecord],
    today: NaiveDate,
) -> Result<Option<PathBuf>> {
    let Some(bytes) = export_csv(batch)? else {
        return Ok(None);
    };
    let path = dir.join(export_file_name(today));
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Some(path))
}

fn row(record: &SensorRecord) -> [String; 11] {
    [
        number(record.temperature),
        number(record.humidity),
        number(record.gas_value),
        record
            .flame_status
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        record
            .ir_value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        number(record.accel_x),
        number(record.accel_y),
        record.location.clone().unwrap_or_default(),
        record.emergency.to_string(),
        record.reason.clone().unwrap_or_default(),
        record.timestamp.clone().unwrap_or_default(),
    ]
}

fn number(value: Option<f64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

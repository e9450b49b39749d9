use crate::telemetry::SensorRecord;

/// Coarse health classification of the whole system.
///
/// Precedence is fixed: an emergency anywhere in the batch wins over the
/// empty-batch rule, which wins over the happy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    Emergency,
    Offline,
    Online,
}

impl SystemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::Emergency => "Emergency",
            SystemStatus::Offline => "Offline",
            SystemStatus::Online => "Online",
        }
    }

    /// Advisory line shown next to the status.
    pub fn note(&self) -> &'static str {
        match self {
            SystemStatus::Emergency => "Check active helmet alerts",
            SystemStatus::Offline => "No recent data – check connection",
            SystemStatus::Online => "Monitoring – no emergency flags",
        }
    }
}

/// Cross-record statistics, recomputed from each batch and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    /// Mean over records with a finite temperature, `None` if there are none.
    pub avg_temperature: Option<f64>,

    pub avg_humidity: Option<f64>,

    pub avg_gas: Option<f64>,

    pub any_emergency: bool,

    pub system_status: SystemStatus,
}

pub fn compute_metrics(batch: &[SensorRecord]) -> DerivedMetrics {
    let any_emergency = batch.iter().any(|r| r.emergency);

    let system_status = if any_emergency {
        SystemStatus::Emergency
    } else if batch.is_empty() {
        SystemStatus::Offline
    } else {
        SystemStatus::Online
    };

    DerivedMetrics {
        avg_temperature: mean(batch.iter().filter_map(|r| r.temperature)),
        avg_humidity: mean(batch.iter().filter_map(|r| r.humidity)),
        avg_gas: mean(batch.iter().filter_map(|r| r.gas_value)),
        any_emergency,
        system_status,
    }
}

/// `None` when no value contributes, so missing data never reads as zero.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(temperature: Option<f64>, emergency: bool) -> SensorRecord {
        SensorRecord {
            temperature,
            emergency,
            ..SensorRecord::default()
        }
    }

    #[test]
    fn empty_batch_is_offline_with_null_averages() {
        let metrics = compute_metrics(&[]);
        assert_eq!(metrics.avg_temperature, None);
        assert_eq!(metrics.avg_humidity, None);
        assert_eq!(metrics.avg_gas, None);
        assert!(!metrics.any_emergency);
        assert_eq!(metrics.system_status, SystemStatus::Offline);
    }

    #[test]
    fn averages_skip_missing_values() {
        let batch = vec![
            record(Some(20.0), false),
            record(None, false),
            record(Some(40.0), false),
        ];
        let metrics = compute_metrics(&batch);
        assert_relative_eq!(metrics.avg_temperature.unwrap(), 30.0);
        assert_eq!(metrics.avg_humidity, None);
        assert_eq!(metrics.system_status, SystemStatus::Online);
    }

    #[test]
    fn average_is_none_iff_nothing_contributes() {
        let batch = vec![record(None, false), record(None, false)];
        assert_eq!(compute_metrics(&batch).avg_temperature, None);

        let batch = vec![record(None, false), record(Some(12.5), false)];
        assert_eq!(compute_metrics(&batch).avg_temperature, Some(12.5));
    }

    #[test]
    fn emergency_overrides_everything() {
        let batch = vec![record(None, false), record(None, true)];
        let metrics = compute_metrics(&batch);
        assert!(metrics.any_emergency);
        assert_eq!(metrics.system_status, SystemStatus::Emergency);
    }

    #[test]
    fn single_record_batch() {
        let batch = vec![SensorRecord {
            temperature: Some(30.0),
            emergency: true,
            reason: Some("gas leak".into()),
            ..SensorRecord::default()
        }];
        let metrics = compute_metrics(&batch);
        assert_eq!(metrics.avg_temperature, Some(30.0));
        assert_eq!(metrics.avg_humidity, None);
        assert_eq!(metrics.system_status, SystemStatus::Emergency);
    }
}

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One telemetry sample from a helmet, as the collection service reports it.
///
/// The service is loosely typed: numeric fields may arrive as numbers,
/// numeric strings, `null`, or garbage. Anything that does not parse to a
/// finite number is `None` here, never zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SensorRecord {
    #[serde(deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,

    #[serde(deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,

    #[serde(deserialize_with = "lenient_number")]
    pub gas_value: Option<f64>,

    /// Pass-through field, displayed and exported but never computed on.
    #[serde(deserialize_with = "opaque_value")]
    pub flame_status: Option<RawValue>,

    /// Pass-through field, displayed and exported but never computed on.
    #[serde(deserialize_with = "opaque_value")]
    pub ir_value: Option<RawValue>,

    #[serde(deserialize_with = "lenient_number")]
    pub accel_x: Option<f64>,

    #[serde(deserialize_with = "lenient_number")]
    pub accel_y: Option<f64>,

    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,

    /// Strict flag: only a JSON `true` counts. `"true"`, `1` and friends are
    /// false, so a loosely typed upstream cannot produce false alarms.
    #[serde(deserialize_with = "strict_flag")]
    pub emergency: bool,

    #[serde(deserialize_with = "lenient_string")]
    pub reason: Option<String>,

    /// ISO-8601 sort key. Kept verbatim; the service sends batches
    /// newest-first and this crate does not re-sort them.
    #[serde(deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

impl SensorRecord {
    /// Accelerometer magnitude, `None` unless both axes are present.
    pub fn g_force(&self) -> Option<f64> {
        match (self.accel_x, self.accel_y) {
            (Some(x), Some(y)) => Some(x.hypot(y)),
            _ => None,
        }
    }
}

/// A scalar the service sent for an opaque field.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn from_json(value: Value) -> Option<RawValue> {
        match value {
            Value::Number(n) => n.as_f64().map(RawValue::Number),
            Value::String(s) => Some(RawValue::Text(s)),
            Value::Bool(b) => Some(RawValue::Text(b.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(finite_number))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn strict_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

fn opaque_value<'de, D>(deserializer: D) -> Result<Option<RawValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(RawValue::from_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(json: &str) -> SensorRecord {
        serde_json::from_str(json).expect("record should deserialize")
    }

    #[test]
    fn numeric_fields_accept_numbers_and_numeric_strings() {
        let record = parse(r#"{"temperature": 30.5, "humidity": "61.2", "gasValue": " 140 "}"#);
        assert_eq!(record.temperature, Some(30.5));
        assert_eq!(record.humidity, Some(61.2));
        assert_eq!(record.gas_value, Some(140.0));
    }

    #[test]
    fn malformed_numeric_fields_become_none_not_zero() {
        let record = parse(r#"{"temperature": "hot", "humidity": null, "gasValue": true}"#);
        assert_eq!(record.temperature, None);
        assert_eq!(record.humidity, None);
        assert_eq!(record.gas_value, None);
    }

    #[test]
    fn emergency_requires_a_literal_true() {
        assert!(parse(r#"{"emergency": true}"#).emergency);
        assert!(!parse(r#"{"emergency": "true"}"#).emergency);
        assert!(!parse(r#"{"emergency": 1}"#).emergency);
        assert!(!parse(r#"{"emergency": false}"#).emergency);
        assert!(!parse("{}").emergency);
    }

    #[test]
    fn g_force_needs_both_axes() {
        let record = parse(r#"{"accelX": 3, "accelY": 4}"#);
        assert_relative_eq!(record.g_force().unwrap(), 5.0, max_relative = 1e-12);

        assert_eq!(parse(r#"{"accelX": 3}"#).g_force(), None);
        assert_eq!(parse(r#"{"accelX": 3, "accelY": "wobble"}"#).g_force(), None);
        assert_eq!(parse("{}").g_force(), None);
    }

    #[test]
    fn opaque_fields_keep_what_the_wire_said() {
        let record = parse(r#"{"flameStatus": "none", "irValue": 812}"#);
        assert_eq!(record.flame_status, Some(RawValue::Text("none".into())));
        assert_eq!(record.ir_value, Some(RawValue::Number(812.0)));

        let record = parse(r#"{"flameStatus": {"nested": 1}}"#);
        assert_eq!(record.flame_status, None);
    }

    #[test]
    fn missing_fields_default_to_none() {
        let record = parse("{}");
        assert_eq!(record.temperature, None);
        assert_eq!(record.location, None);
        assert_eq!(record.reason, None);
        assert_eq!(record.timestamp, None);
    }
}

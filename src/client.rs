use anyhow::{Context as _, Result, anyhow};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::telemetry::SensorRecord;

/// Reference deployment of the collection service.
pub const DEFAULT_API_BASE: &str = "https://minersgaurdhelmet.onrender.com/api";

/// Client for the helmet collection service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

/// `GET {base}/data` response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub count: u64,

    /// Recent records, newest first. A missing or non-array `data` is an
    /// empty batch, not an error.
    #[serde(default, deserialize_with = "records_or_empty")]
    pub data: Vec<SensorRecord>,
}

/// `POST {base}/data` response envelope.
#[derive(Debug, Deserialize)]
pub struct PostResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Fetch the most recent batch of sensor records.
    pub async fn recent_data(&self) -> Result<ApiResponse> {
        let url = format!("{}/data", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let response = check_status(response).await?;
        response
            .json::<ApiResponse>()
            .await
            .context("failed to decode service response")
    }

    /// Push one reading to the service (device ingestion path). The payload
    /// may carry any subset of the record fields.
    pub async fn save_reading(&self, payload: &Value) -> Result<PostResponse> {
        let url = format!("{}/data", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;
        let response = check_status(response).await?;
        response
            .json::<PostResponse>()
            .await
            .context("failed to decode service response")
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.json::<Value>().await.ok();
    Err(anyhow!(error_text(status.as_u16(), body.as_ref())))
}

/// Non-2xx responses may carry a `message`, used verbatim when present.
fn error_text(status: u16, body: Option<&Value>) -> String {
    body.and_then(|body| body.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("API error: {status}"))
}

fn records_or_empty<'de, D>(deserializer: D) -> Result<Vec<SensorRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_response_parses() {
        let response: ApiResponse = serde_json::from_str(
            r#"{
                "success": true,
                "count": 2,
                "data": [
                    {"temperature": 31.0, "emergency": true, "reason": "gas leak"},
                    {"temperature": "30", "humidity": null}
                ]
            }"#,
        )
        .unwrap();
        assert!(response.success);
        assert_eq!(response.count, 2);
        assert_eq!(response.data.len(), 2);
        assert!(response.data[0].emergency);
        assert_eq!(response.data[1].temperature, Some(30.0));
    }

    #[test]
    fn missing_data_field_is_an_empty_batch() {
        let response: ApiResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(response.data.is_empty());
    }

    #[test]
    fn non_array_data_is_an_empty_batch() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"success": true, "data": "oops"}"#).unwrap();
        assert!(response.data.is_empty());

        let response: ApiResponse =
            serde_json::from_str(r#"{"success": true, "data": {"a": 1}}"#).unwrap();
        assert!(response.data.is_empty());
    }

    #[test]
    fn non_object_elements_are_skipped() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"data": [{"temperature": 20}, 5, "junk", {}]}"#).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].temperature, Some(20.0));
    }

    #[test]
    fn error_text_prefers_the_body_message() {
        let body = serde_json::json!({"message": "device quota exceeded"});
        assert_eq!(error_text(429, Some(&body)), "device quota exceeded");
    }

    #[test]
    fn error_text_falls_back_to_the_status() {
        assert_eq!(error_text(502, None), "API error: 502");
        let body = serde_json::json!({"message": ""});
        assert_eq!(error_text(500, Some(&body)), "API error: 500");
        let body = serde_json::json!({"message": 17});
        assert_eq!(error_text(500, Some(&body)), "API error: 500");
    }
}

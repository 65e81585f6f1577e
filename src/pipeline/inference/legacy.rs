use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use super::InferenceError;
use crate::models::AnalysisMode;

/// Client for the sibling analysis service that speaks the older
/// `{response, data: {summary, abnormalities, recommendations}}` schema.
pub struct LegacyClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout: Duration,
}

#[derive(Serialize)]
struct LegacyAnalyzeRequest<'a> {
    text: &'a str,
    mode: AnalysisMode,
}

impl LegacyClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, InferenceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    /// `POST {base}/analyze`. Any non-object answer is an error.
    pub fn analyze(&self, text: &str, mode: AnalysisMode) -> Result<Map<String, Value>, InferenceError> {
        let url = format!("{}/analyze", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LegacyAnalyzeRequest { text, mode })
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout(self.timeout)
                } else if e.is_connect() {
                    InferenceError::LegacyConnection(self.base_url.clone())
                } else {
                    InferenceError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::LegacyStatus(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(InferenceError::LegacyNotObject),
            Err(e) => Err(InferenceError::ResponseParsing(e.to_string())),
        }
    }
}

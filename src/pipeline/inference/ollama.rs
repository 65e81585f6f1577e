use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::client::{GenerationOptions, LlmClient, RunningModelInfo};
use super::InferenceError;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl OllamaClient {
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

    fn map_send_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_connect() {
            InferenceError::OllamaConnection(self.base_url.clone())
        } else if e.is_timeout() {
            InferenceError::Timeout(self.timeout)
        } else {
            InferenceError::HttpClient(e.to_string())
        }
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, InferenceError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    images: &'a [String],
    stream: bool,
    options: &'a GenerationOptions,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

/// Response body from Ollama /api/ps
#[derive(Deserialize)]
struct OllamaPsResponse {
    #[serde(default)]
    models: Vec<RunningModelInfo>,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        images: &[String],
        options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            images,
            stream: false,
            options,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response.trim().to_string())
    }

    fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let parsed: OllamaTagsResponse = self.get_json("/api/tags")?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    fn list_running_models(&self) -> Result<Vec<RunningModelInfo>, InferenceError> {
        let parsed: OllamaPsResponse = self.get_json("/api/ps")?;
        Ok(parsed.models)
    }
}

/// Mock LLM client for testing: returns a configurable response and
/// records the last prompt it was given.
pub struct MockLlmClient {
    response: Result<String, u16>,
    available_models: Vec<String>,
    running_models: Vec<RunningModelInfo>,
    last_call: Mutex<Option<(String, Vec<String>)>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            available_models: vec!["medgemma:4b".to_string()],
            running_models: Vec::new(),
            last_call: Mutex::new(None),
        }
    }

    /// A client whose generations fail with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            ..Self::new("")
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    pub fn with_running(mut self, running: Vec<RunningModelInfo>) -> Self {
        self.running_models = running;
        self
    }

    /// Prompt and images of the most recent `generate` call.
    pub fn last_call(&self) -> Option<(String, Vec<String>)> {
        self.last_call.lock().ok().and_then(|guard| guard.clone())
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        prompt: &str,
        _system: &str,
        images: &[String],
        _options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        if let Ok(mut guard) = self.last_call.lock() {
            *guard = Some((prompt.to_string(), images.to_vec()));
        }
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(InferenceError::OllamaError {
                status: *status,
                body: "mock failure".into(),
            }),
        }
    }

    fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        Ok(self.available_models.clone())
    }

    fn list_running_models(&self) -> Result<Vec<RunningModelInfo>, InferenceError> {
        Ok(self.running_models.clone())
    }
}

//! Inference gateway: legacy delegation, then the local model, then mock.

pub mod client;
pub mod gateway;
pub mod legacy;
pub mod mock;
pub mod ollama;
pub mod prompt;

pub use client::*;
pub use gateway::*;
pub use legacy::*;
pub use ollama::*;
pub use prompt::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("Legacy service unreachable at {0}")]
    LegacyConnection(String),

    #[error("Legacy service returned status {0}")]
    LegacyStatus(u16),

    #[error("Legacy service returned a non-object payload")]
    LegacyNotObject,

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

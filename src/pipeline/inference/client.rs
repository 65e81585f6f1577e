use serde::{Deserialize, Serialize};

use super::InferenceError;

/// Decoding options sent with every generation. Temperature 0 keeps output
/// deterministic for identical input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

impl GenerationOptions {
    pub fn deterministic(max_new_tokens: u32) -> Self {
        Self {
            temperature: 0.0,
            num_predict: max_new_tokens,
        }
    }
}

/// A model currently loaded in the runtime's memory (from `/api/ps`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunningModelInfo {
    pub name: String,
    /// Total model size in memory (bytes).
    pub size: u64,
    /// Size loaded into VRAM (bytes). 0 = CPU-only.
    #[serde(default)]
    pub size_vram: u64,
    #[serde(default)]
    pub processor: String,
}

/// Local LLM runtime abstraction (allows mocking).
pub trait LlmClient: Send + Sync {
    /// One non-streaming generation. Returns only the newly generated text.
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        images: &[String],
        options: &GenerationOptions,
    ) -> Result<String, InferenceError>;

    fn is_model_available(&self, model: &str) -> Result<bool, InferenceError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, InferenceError>;

    fn list_running_models(&self) -> Result<Vec<RunningModelInfo>, InferenceError>;
}

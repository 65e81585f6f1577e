//! Ordered tier dispatch. Each tier either answers or reports itself
//! unavailable; the mock tier always answers, so `infer` never fails.

use std::time::Duration;

use serde_json::{Map, Value};

use super::client::{GenerationOptions, LlmClient};
use super::legacy::LegacyClient;
use super::mock::mock_payload;
use super::ollama::OllamaClient;
use super::prompt::{patient_message, ClinicalSources, DOCTOR_SYSTEM_PROMPT, PATIENT_SYSTEM_PROMPT};
use super::InferenceError;
use crate::config::AppConfig;
use crate::hardware::detect_hardware;
use crate::models::AnalysisMode;
use crate::pipeline::extraction::ScanImage;

/// One inference call, rendered for every tier.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub mode: AnalysisMode,
    /// Plain text for the legacy service.
    pub legacy_text: String,
    pub system_prompt: &'static str,
    /// User message for the local model.
    pub user_message: String,
    pub image: Option<ScanImage>,
}

impl InferenceRequest {
    pub fn doctor(sources: &ClinicalSources, image: Option<ScanImage>) -> Self {
        Self {
            mode: AnalysisMode::Doctor,
            legacy_text: sources.legacy_text(),
            system_prompt: DOCTOR_SYSTEM_PROMPT,
            user_message: sources.model_message(image.is_some()),
            image,
        }
    }

    pub fn patient(report_text: &str) -> Self {
        Self {
            mode: AnalysisMode::Patient,
            legacy_text: report_text.to_string(),
            system_prompt: PATIENT_SYSTEM_PROMPT,
            user_message: patient_message(report_text),
            image: None,
        }
    }
}

/// What a tier produced. Each variant is normalized differently.
#[derive(Debug, Clone, PartialEq)]
pub enum TierPayload {
    /// Object in the legacy service vocabulary.
    Legacy(Map<String, Value>),
    /// Free-form model text, expected to contain a JSON object.
    Generated(String),
    /// Already schema-shaped simulated payload.
    Mock(Value),
}

#[derive(Debug)]
pub enum TierAttempt {
    Answered(TierPayload),
    Unavailable { reason: String },
}

/// One backend in the fallback chain.
pub trait InferenceTier: Send + Sync {
    fn name(&self) -> &'static str;
    fn attempt(&self, request: &InferenceRequest) -> TierAttempt;
}

pub struct LegacyTier {
    client: LegacyClient,
}

impl LegacyTier {
    pub fn new(client: LegacyClient) -> Self {
        Self { client }
    }
}

impl InferenceTier for LegacyTier {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn attempt(&self, request: &InferenceRequest) -> TierAttempt {
        match self.client.analyze(&request.legacy_text, request.mode) {
            Ok(map) => TierAttempt::Answered(TierPayload::Legacy(map)),
            Err(e) => TierAttempt::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

pub struct LocalModelTier {
    client: Box<dyn LlmClient>,
    model: String,
    options: GenerationOptions,
    loaded: bool,
}

impl LocalModelTier {
    pub fn new(client: Box<dyn LlmClient>, model: &str, max_new_tokens: u32, loaded: bool) -> Self {
        Self {
            client,
            model: model.to_string(),
            options: GenerationOptions::deterministic(max_new_tokens),
            loaded,
        }
    }
}

impl InferenceTier for LocalModelTier {
    fn name(&self) -> &'static str {
        "local_model"
    }

    fn attempt(&self, request: &InferenceRequest) -> TierAttempt {
        if !self.loaded {
            return TierAttempt::Unavailable {
                reason: format!("model {} not loaded", self.model),
            };
        }

        let images: Vec<String> = request.image.iter().map(ScanImage::to_base64).collect();
        match self.client.generate(
            &self.model,
            &request.user_message,
            request.system_prompt,
            &images,
            &self.options,
        ) {
            Ok(text) => TierAttempt::Answered(TierPayload::Generated(text)),
            Err(e) => TierAttempt::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

pub struct MockTier;

impl MockTier {
    pub fn answer(&self, mode: AnalysisMode) -> TierPayload {
        TierPayload::Mock(mock_payload(mode))
    }
}

impl InferenceTier for MockTier {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn attempt(&self, request: &InferenceRequest) -> TierAttempt {
        TierAttempt::Answered(self.answer(request.mode))
    }
}

/// Runtime status of the local model, reported by `/health`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStatus {
    pub model_loaded: bool,
    pub gpu_available: bool,
}

pub struct InferenceGateway {
    tiers: Vec<Box<dyn InferenceTier>>,
    terminal: MockTier,
    status: ModelStatus,
}

impl InferenceGateway {
    /// Tiers are tried in the given order before the mock tier.
    pub fn new(tiers: Vec<Box<dyn InferenceTier>>, status: ModelStatus) -> Self {
        Self {
            tiers,
            terminal: MockTier,
            status,
        }
    }

    /// Gateway with no real backends: every call is answered by the mock tier.
    pub fn mock_only() -> Self {
        Self::new(Vec::new(), ModelStatus::default())
    }

    pub fn model_loaded(&self) -> bool {
        self.status.model_loaded
    }

    pub fn gpu_available(&self) -> bool {
        self.status.gpu_available
    }

    /// Try each tier once, in order. Blocking; call from a blocking context.
    pub fn infer(&self, request: &InferenceRequest) -> TierPayload {
        for tier in &self.tiers {
            match tier.attempt(request) {
                TierAttempt::Answered(payload) => {
                    tracing::info!(tier = tier.name(), mode = %request.mode, "Inference answered");
                    return payload;
                }
                TierAttempt::Unavailable { reason } => {
                    tracing::info!(
                        tier = tier.name(),
                        mode = %request.mode,
                        reason = %reason,
                        "Inference tier unavailable, falling through"
                    );
                }
            }
        }

        tracing::info!(
            tier = self.terminal.name(),
            mode = %request.mode,
            model_loaded = self.status.model_loaded,
            "Using mock response"
        );
        self.terminal.answer(request.mode)
    }
}

/// Generation timeout for the local runtime. CPU inference on a 4B model
/// can take minutes.
const LOCAL_MODEL_TIMEOUT: Duration = Duration::from_secs(300);

/// Startup check: the model counts as loaded when the runtime answers and
/// lists it. Compute acceleration is only checked for a loaded model.
pub fn check_local_model(client: &dyn LlmClient, model: &str) -> ModelStatus {
    let model_loaded = match client.is_model_available(model) {
        Ok(true) => true,
        Ok(false) => {
            tracing::warn!(model, "Model not installed in the local runtime, using mock");
            false
        }
        Err(e) => {
            tracing::warn!(model, error = %e, "Local runtime unreachable, using mock");
            false
        }
    };
    let gpu_available = model_loaded && detect_hardware(client, model).gpu_available();
    ModelStatus {
        model_loaded,
        gpu_available,
    }
}

impl InferenceGateway {
    /// Build the tier chain from configuration. Performs blocking network
    /// requests; call outside the async runtime.
    pub fn from_config(config: &AppConfig) -> Result<Self, InferenceError> {
        let mut tiers: Vec<Box<dyn InferenceTier>> = Vec::new();

        if config.legacy_enabled {
            tracing::info!(url = %config.legacy_base_url, timeout = ?config.legacy_timeout, "Legacy delegation enabled");
            let client = LegacyClient::new(&config.legacy_base_url, config.legacy_timeout)?;
            tiers.push(Box::new(LegacyTier::new(client)));
        }

        let mut status = ModelStatus::default();
        if config.force_mock {
            tracing::info!("FORCE_MOCK set, skipping local model check");
        } else {
            let client = OllamaClient::new(&config.ollama_base_url, LOCAL_MODEL_TIMEOUT)?;
            status = check_local_model(&client, &config.model_id);
            if status.model_loaded {
                tracing::info!(
                    model = %config.model_id,
                    gpu = status.gpu_available,
                    "Local model available"
                );
                tiers.push(Box::new(LocalModelTier::new(
                    Box::new(client),
                    &config.model_id,
                    config.max_new_tokens,
                    true,
                )));
            }
        }

        Ok(Self::new(tiers, status))
    }
}

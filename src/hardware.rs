//! Compute acceleration detection.
//!
//! Queries the model runtime's `/api/ps` to see how much of each loaded
//! model sits in VRAM. Conservative: anything unclear reports CPU.

use serde::Serialize;

use crate::pipeline::inference::{LlmClient, RunningModelInfo};

/// GPU availability classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GpuTier {
    /// All model layers in VRAM.
    FullGpu,
    /// Some layers in VRAM, rest on CPU.
    PartialGpu,
    CpuOnly,
}

impl std::fmt::Display for GpuTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullGpu => write!(f, "Full GPU"),
            Self::PartialGpu => write!(f, "Partial GPU"),
            Self::CpuOnly => write!(f, "CPU only"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HardwareProfile {
    /// Total VRAM allocated to the inspected models (bytes). 0 = CPU-only.
    pub vram_bytes: u64,
    /// Total size of the inspected models in memory (bytes).
    pub total_model_bytes: u64,
}

impl HardwareProfile {
    fn from_models<'a>(models: impl IntoIterator<Item = &'a RunningModelInfo>) -> Self {
        models.into_iter().fold(Self::default(), |acc, m| Self {
            vram_bytes: acc.vram_bytes + m.size_vram,
            total_model_bytes: acc.total_model_bytes + m.size,
        })
    }

    pub fn gpu_tier(&self) -> GpuTier {
        if self.total_model_bytes == 0 || self.vram_bytes == 0 {
            GpuTier::CpuOnly
        } else if self.vram_bytes >= self.total_model_bytes {
            GpuTier::FullGpu
        } else {
            GpuTier::PartialGpu
        }
    }

    pub fn gpu_available(&self) -> bool {
        self.gpu_tier() != GpuTier::CpuOnly
    }
}

/// Inspect the running models, preferring entries for `model`.
/// Falls back to every running model when `model` is not in memory.
pub fn detect_hardware(client: &dyn LlmClient, model: &str) -> HardwareProfile {
    let _span = tracing::info_span!("hardware_detect").entered();

    match client.list_running_models() {
        Ok(running) if !running.is_empty() => {
            let matching: Vec<&RunningModelInfo> =
                running.iter().filter(|m| m.name.starts_with(model)).collect();
            let profile = if matching.is_empty() {
                HardwareProfile::from_models(&running)
            } else {
                HardwareProfile::from_models(matching)
            };

            tracing::info!(
                gpu_tier = %profile.gpu_tier(),
                vram_mb = profile.vram_bytes / 1_000_000,
                total_mb = profile.total_model_bytes / 1_000_000,
                models = running.len(),
                "Hardware profile detected"
            );
            profile
        }
        Ok(_) => {
            tracing::info!("No models loaded in the runtime, assuming CPU");
            HardwareProfile::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Hardware detection failed, assuming CPU");
            HardwareProfile::default()
        }
    }
}

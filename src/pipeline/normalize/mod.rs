//! Response normalization: turns whatever a tier produced into a
//! schema-shaped object, then into typed results.

pub mod fallback;
pub mod json_extract;
pub mod legacy_remap;
pub mod ranking;
pub mod validation;

pub use fallback::*;
pub use json_extract::*;
pub use legacy_remap::*;
pub use ranking::*;
pub use validation::*;

use serde_json::Value;
use thiserror::Error;

use crate::models::AnalysisMode;
use crate::pipeline::inference::TierPayload;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Normalized payload is not a JSON object")]
    NotAnObject,

    #[error("Field `{field}` must be a string")]
    FieldType { field: &'static str },
}

/// Schema-shaped object for `mode`. Never fails: anything unusable becomes
/// the fallback payload.
pub fn normalize(payload: TierPayload, mode: AnalysisMode) -> Value {
    match payload {
        TierPayload::Legacy(map) => match mode {
            AnalysisMode::Doctor => remap_legacy_doctor(&map),
            AnalysisMode::Patient => remap_legacy_patient(&map),
        },
        TierPayload::Generated(raw) => match extract_json_object(&raw) {
            Ok(value) => value,
            Err(reason) => {
                tracing::warn!(mode = %mode, reason = %reason, "No usable JSON in model output, using fallback");
                fallback_payload(mode)
            }
        },
        TierPayload::Mock(value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generated_json_is_parsed() {
        let value = normalize(
            TierPayload::Generated("Sure!\n```json\n{\"simplified_explanation\": \"fine\"}\n```".into()),
            AnalysisMode::Patient,
        );
        assert_eq!(value, json!({"simplified_explanation": "fine"}));
    }

    #[test]
    fn generated_garbage_falls_back() {
        let value = normalize(TierPayload::Generated("no json here".into()), AnalysisMode::Doctor);
        assert_eq!(value, fallback_payload(AnalysisMode::Doctor));
    }

    #[test]
    fn legacy_payload_is_remapped_per_mode() {
        let map = json!({"data": {"summary": "Stable.", "abnormalities": [], "recommendations": ["Rest"]}});
        let map = map.as_object().unwrap().clone();

        let doctor = normalize(TierPayload::Legacy(map.clone()), AnalysisMode::Doctor);
        assert_eq!(doctor["patient_summary"], "Stable.");

        let patient = normalize(TierPayload::Legacy(map), AnalysisMode::Patient);
        assert_eq!(
            patient["simplified_explanation"],
            "Stable.\n\nKey next steps mentioned in your report: Rest"
        );
    }

    #[test]
    fn mock_payload_passes_through() {
        let value = json!({"simplified_explanation": "[MOCK] x"});
        assert_eq!(normalize(TierPayload::Mock(value.clone()), AnalysisMode::Patient), value);
    }
}

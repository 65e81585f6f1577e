use serde_json::{json, Value};

use crate::models::AnalysisMode;
use crate::pipeline::inference::mock::{mock_patient_payload, MOCK_DOCTOR_SUMMARY};

/// Deterministic schema-valid substitute used when model output holds no
/// usable JSON: tagged summary with no findings, or the tagged explanation.
pub fn fallback_payload(mode: AnalysisMode) -> Value {
    match mode {
        AnalysisMode::Doctor => json!({
            "patient_summary": MOCK_DOCTOR_SUMMARY,
            "key_findings": [],
            "scan_insights": [],
        }),
        AnalysisMode::Patient => mock_patient_payload(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::inference::mock::MOCK_PATIENT_EXPLANATION;

    #[test]
    fn doctor_fallback_has_no_findings() {
        let value = fallback_payload(AnalysisMode::Doctor);
        assert!(value["key_findings"].as_array().unwrap().is_empty());
        assert!(value["patient_summary"].as_str().unwrap().starts_with("[MOCK]"));
    }

    #[test]
    fn patient_fallback_is_tagged() {
        let value = fallback_payload(AnalysisMode::Patient);
        assert_eq!(value["simplified_explanation"], MOCK_PATIENT_EXPLANATION);
    }
}

//! Typed validation of normalized payloads. Optional fields get documented
//! defaults; the disclaimer is attached by the result constructors.

use serde_json::{Map, Value};

use super::NormalizeError;
use crate::models::{DoctorAnalysisResult, KeyFinding, PatientExplanationResult, ScanInsight, UrgencyLevel};

pub const DEFAULT_SUMMARY: &str = "Summary could not be generated. Please review inputs.";

fn as_object(value: &Value) -> Result<&Map<String, Value>, NormalizeError> {
    value.as_object().ok_or(NormalizeError::NotAnObject)
}

/// Required-string field: missing or null takes `default`, any other
/// non-string value is a validation failure.
fn string_field(
    map: &Map<String, Value>,
    field: &'static str,
    default: &str,
) -> Result<String, NormalizeError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(NormalizeError::FieldType { field }),
    }
}

/// Lenient string read used inside list items.
fn item_str(item: &Map<String, Value>, field: &str, default: &str) -> String {
    item.get(field)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn object_items<'a>(map: &'a Map<String, Value>, field: &str) -> impl Iterator<Item = &'a Map<String, Value>> {
    map.get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn key_finding(item: &Map<String, Value>) -> KeyFinding {
    KeyFinding {
        finding: item
            .get("finding")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Unknown finding")
            .to_string(),
        detail: item_str(item, "detail", ""),
        urgency: item
            .get("urgency")
            .and_then(Value::as_str)
            .map(UrgencyLevel::coerce)
            .unwrap_or(UrgencyLevel::Low),
        source: item_str(item, "source", "unknown"),
    }
}

fn scan_insight(item: &Map<String, Value>) -> ScanInsight {
    ScanInsight {
        observation: item_str(item, "observation", ""),
        region: item.get("region").and_then(Value::as_str).map(str::to_string),
        note: item_str(item, "note", ""),
    }
}

/// Build the doctor result. Any `urgency_ranking` in the payload is ignored;
/// the ranking is always derived from the sorted findings.
pub fn validate_doctor(value: &Value, had_image: bool) -> Result<DoctorAnalysisResult, NormalizeError> {
    let map = as_object(value)?;
    let summary = string_field(map, "patient_summary", DEFAULT_SUMMARY)?;
    let findings = object_items(map, "key_findings").map(key_finding).collect();
    let insights = object_items(map, "scan_insights").map(scan_insight).collect();
    Ok(DoctorAnalysisResult::assemble(summary, findings, insights, had_image))
}

pub fn validate_patient(value: &Value) -> Result<PatientExplanationResult, NormalizeError> {
    let map = as_object(value)?;
    let text = string_field(map, "simplified_explanation", "")?;
    Ok(PatientExplanationResult::new(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DISCLAIMER;
    use serde_json::json;

    #[test]
    fn doctor_defaults_applied() {
        let result = validate_doctor(&json!({"key_findings": [{}]}), false).unwrap();
        assert_eq!(result.patient_summary(), DEFAULT_SUMMARY);
        let finding = &result.key_findings()[0];
        assert_eq!(finding.finding, "Unknown finding");
        assert_eq!(finding.detail, "");
        assert_eq!(finding.source, "unknown");
        assert_eq!(finding.urgency, UrgencyLevel::Low);
        assert_eq!(result.disclaimer(), DISCLAIMER);
    }

    #[test]
    fn blank_finding_title_gets_default() {
        let result = validate_doctor(
            &json!({"key_findings": [{"finding": ""}, {"finding": "  \n"}, {"finding": " K+ 5.9 "}]}),
            false,
        )
        .unwrap();
        let titles: Vec<&str> = result.key_findings().iter().map(|f| f.finding.as_str()).collect();
        assert_eq!(titles, ["Unknown finding", "Unknown finding", " K+ 5.9 "]);
    }

    #[test]
    fn urgency_is_coerced_case_insensitively() {
        let result = validate_doctor(
            &json!({"key_findings": [
                {"finding": "a", "urgency": "Low"},
                {"finding": "b", "urgency": "URGENT"},
                {"finding": "c", "urgency": "HIGH"},
                {"finding": "d", "urgency": 1}
            ]}),
            false,
        )
        .unwrap();
        assert_eq!(result.urgency_ranking(), &["c", "a", "b", "d"]);
    }

    #[test]
    fn model_supplied_ranking_is_ignored() {
        let result = validate_doctor(
            &json!({
                "patient_summary": "s",
                "key_findings": [{"finding": "low", "urgency": "low"}, {"finding": "high", "urgency": "high"}],
                "urgency_ranking": ["low", "high", "phantom"]
            }),
            false,
        )
        .unwrap();
        assert_eq!(result.urgency_ranking(), &["high", "low"]);
    }

    #[test]
    fn scan_insights_gated_on_image() {
        let payload = json!({"scan_insights": [{"observation": "o", "region": null, "note": "n"}]});
        assert!(validate_doctor(&payload, false).unwrap().scan_insights().is_empty());
        let with_image = validate_doctor(&payload, true).unwrap();
        assert_eq!(with_image.scan_insights()[0].region, None);
    }

    #[test]
    fn non_object_items_and_lists_are_skipped() {
        let result = validate_doctor(
            &json!({"key_findings": ["text", 4, {"finding": "ok"}], "scan_insights": "nope"}),
            true,
        )
        .unwrap();
        assert_eq!(result.key_findings().len(), 1);
        assert!(result.scan_insights().is_empty());
    }

    #[test]
    fn non_object_payload_is_error() {
        assert!(matches!(validate_doctor(&json!([1]), false), Err(NormalizeError::NotAnObject)));
        assert!(matches!(validate_patient(&json!("x")), Err(NormalizeError::NotAnObject)));
    }

    #[test]
    fn non_string_summary_is_error() {
        let err = validate_doctor(&json!({"patient_summary": {"nested": true}}), false).unwrap_err();
        assert!(matches!(err, NormalizeError::FieldType { field: "patient_summary" }));
    }

    #[test]
    fn patient_missing_text_gets_default() {
        let result = validate_patient(&json!({})).unwrap();
        assert_eq!(result.simplified_explanation(), PatientExplanationResult::UNAVAILABLE);
    }

    #[test]
    fn patient_text_kept() {
        let result = validate_patient(&json!({"simplified_explanation": "All normal."})).unwrap();
        assert_eq!(result.simplified_explanation(), "All normal.");
        assert_eq!(result.disclaimer(), DISCLAIMER);
    }
}

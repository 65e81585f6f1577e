//! Field mapping from the legacy service vocabulary
//! (`summary`, `abnormalities[{issue, severity}]`, `recommendations`)
//! to the native result schema.

use serde_json::{json, Map, Value};

use crate::models::UrgencyLevel;
use crate::pipeline::inference::mock::{mock_patient_payload, MOCK_DOCTOR_SUMMARY};

pub const LEGACY_SOURCE: &str = "legacy_ai_backend";
pub const LEGACY_DEFAULT_DETAIL: &str = "Derived from AI_Backend analysis.";
pub const UNKNOWN_FINDING: &str = "Unknown finding";

/// Legacy severity → urgency. Anything else maps to LOW.
const SEVERITY_TO_URGENCY: &[(&str, UrgencyLevel)] = &[
    ("critical", UrgencyLevel::High),
    ("high", UrgencyLevel::High),
    ("medium", UrgencyLevel::Medium),
    ("low", UrgencyLevel::Low),
];

pub fn severity_to_urgency(severity: &str) -> UrgencyLevel {
    let severity = severity.trim().to_ascii_lowercase();
    SEVERITY_TO_URGENCY
        .iter()
        .find(|(name, _)| *name == severity)
        .map(|(_, urgency)| *urgency)
        .unwrap_or(UrgencyLevel::Low)
}

fn legacy_data(payload: &Map<String, Value>) -> Option<&Map<String, Value>> {
    payload.get("data").and_then(Value::as_object)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn severity_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "low".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn remap_legacy_doctor(payload: &Map<String, Value>) -> Value {
    let data = legacy_data(payload);

    let findings: Vec<Value> = data
        .and_then(|d| d.get("abnormalities"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|item| {
                    let urgency = severity_to_urgency(&severity_text(item.get("severity")));
                    json!({
                        "finding": non_blank_str(item.get("issue")).unwrap_or(UNKNOWN_FINDING),
                        "detail": item
                            .get("explanation")
                            .and_then(Value::as_str)
                            .unwrap_or(LEGACY_DEFAULT_DETAIL),
                        "urgency": urgency.as_str(),
                        "source": LEGACY_SOURCE,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let summary = non_empty_str(data.and_then(|d| d.get("summary")))
        .or_else(|| non_empty_str(payload.get("response")))
        .unwrap_or(MOCK_DOCTOR_SUMMARY);

    json!({
        "patient_summary": summary,
        "key_findings": findings,
        "scan_insights": [],
    })
}

pub fn remap_legacy_patient(payload: &Map<String, Value>) -> Value {
    let data = legacy_data(payload);

    let summary = data
        .and_then(|d| d.get("summary"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    let recommendations: Vec<&str> = data
        .and_then(|d| d.get("recommendations"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::trim).collect())
        .unwrap_or_default();

    let mut pieces = Vec::new();
    if !summary.is_empty() {
        pieces.push(summary.to_string());
    }
    if !recommendations.is_empty() {
        pieces.push(format!(
            "Key next steps mentioned in your report: {}",
            recommendations.join("; ")
        ));
    }

    if pieces.is_empty() {
        tracing::info!("Legacy payload had no usable patient text, using mock explanation");
        return mock_patient_payload();
    }
    json!({ "simplified_explanation": pieces.join("\n\n") })
}

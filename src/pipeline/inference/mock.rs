//! Simulated payloads served when no real backend answers.
//! Every user-visible string carries a `[MOCK]` tag.

use serde_json::{json, Value};

use crate::models::AnalysisMode;

pub const MOCK_DOCTOR_SUMMARY: &str = "[MOCK] This is a simulated summary. MedGemma is not loaded (running in mock mode). The patient's uploaded records have been received and would normally be processed by the AI model.";

pub const MOCK_PATIENT_EXPLANATION: &str = "[MOCK] This is a simulated explanation. When the AI model is fully loaded, it would turn your medical document into plain language that is easy to understand. Please note: this tool does not provide any medical diagnosis or advice.";

pub fn mock_doctor_payload() -> Value {
    json!({
        "patient_summary": MOCK_DOCTOR_SUMMARY,
        "key_findings": [
            {
                "finding": "[MOCK] Elevated Creatinine",
                "detail": "Lab report indicates possible renal stress markers.",
                "urgency": "high",
                "source": "lab_report"
            },
            {
                "finding": "[MOCK] Hypertension History",
                "detail": "Patient history notes long-standing hypertension.",
                "urgency": "medium",
                "source": "patient_history"
            },
            {
                "finding": "[MOCK] Routine Follow-up Due",
                "detail": "Annual cardiology review overdue by 3 months.",
                "urgency": "low",
                "source": "prescription"
            }
        ],
        "scan_insights": [
            {
                "observation": "[MOCK] Scan received and processed.",
                "region": "Unknown (mock mode)",
                "note": "Real scan analysis requires GPU and loaded MedGemma model."
            }
        ]
    })
}

pub fn mock_patient_payload() -> Value {
    json!({ "simplified_explanation": MOCK_PATIENT_EXPLANATION })
}

pub fn mock_payload(mode: AnalysisMode) -> Value {
    match mode {
        AnalysisMode::Doctor => mock_doctor_payload(),
        AnalysisMode::Patient => mock_patient_payload(),
    }
}

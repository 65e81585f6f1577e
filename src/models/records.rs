use serde::{Deserialize, Serialize};

/// Source tag written on records appended by the doctor analysis flow.
pub const DOCTOR_ANALYZE_SOURCE: &str = "doctor_analyze";

/// A text document captured for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub captured_at: String,
    pub source: String,
    pub text: String,
}

/// An imaging upload: filename and metadata only, never pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagingEntry {
    pub captured_at: String,
    pub source: String,
    pub filename: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Append-only per-category document history for one patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecords {
    #[serde(default)]
    pub history: Vec<RecordEntry>,
    #[serde(default)]
    pub labs: Vec<RecordEntry>,
    #[serde(default)]
    pub imaging: Vec<ImagingEntry>,
    #[serde(default)]
    pub prescriptions: Vec<RecordEntry>,
}

/// Sources submitted with one analysis, to be appended to the records.
#[derive(Debug, Clone, Default)]
pub struct RecordSubmission {
    pub patient_history: String,
    pub prescriptions: String,
    pub lab_reports: String,
    pub has_scan_image: bool,
    pub scan_filename: Option<String>,
}

impl PatientRecords {
    /// Append every non-empty source in `submission`, stamped `captured_at`.
    pub fn append(&mut self, submission: &RecordSubmission, captured_at: &str) {
        let text_entry = |text: &str| RecordEntry {
            captured_at: captured_at.to_string(),
            source: DOCTOR_ANALYZE_SOURCE.to_string(),
            text: text.to_string(),
        };

        if !submission.patient_history.is_empty() {
            self.history.push(text_entry(&submission.patient_history));
        }
        if !submission.prescriptions.is_empty() {
            self.prescriptions.push(text_entry(&submission.prescriptions));
        }
        if !submission.lab_reports.is_empty() {
            self.labs.push(text_entry(&submission.lab_reports));
        }
        if submission.has_scan_image {
            self.imaging.push(ImagingEntry {
                captured_at: captured_at.to_string(),
                source: DOCTOR_ANALYZE_SOURCE.to_string(),
                filename: submission.scan_filename.clone(),
                kind: "xray_or_scan".to_string(),
            });
        }
    }
}

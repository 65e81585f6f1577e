use thiserror::Error;

use super::extraction::ScanImage;
use super::inference::{ClinicalSources, InferenceGateway, InferenceRequest};
use super::normalize::{normalize, validate_doctor, validate_patient, NormalizeError};
use crate::models::{AnalysisMode, DoctorAnalysisResult, PatientExplanationResult};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No clinical data provided")]
    EmptyInput,

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Structured clinical summary for the doctor view.
///
/// `image` is the decoded scan, if any; without it the result carries no
/// scan insights whatever the backend returned. Blocking.
pub fn analyze_for_doctor(
    gateway: &InferenceGateway,
    sources: &ClinicalSources,
    image: Option<ScanImage>,
) -> Result<DoctorAnalysisResult, AnalysisError> {
    if sources.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let had_image = image.is_some();
    let request = InferenceRequest::doctor(sources, image);
    let payload = gateway.infer(&request);
    let value = normalize(payload, AnalysisMode::Doctor);
    let result = validate_doctor(&value, had_image)?;

    tracing::info!(
        findings = result.key_findings().len(),
        scan_insights = result.scan_insights().len(),
        "Doctor analysis complete"
    );
    Ok(result)
}

/// Plain-language explanation for the patient view. Blocking.
pub fn explain_for_patient(
    gateway: &InferenceGateway,
    report_text: &str,
) -> Result<PatientExplanationResult, AnalysisError> {
    if report_text.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let payload = gateway.infer(&InferenceRequest::patient(report_text));
    let value = normalize(payload, AnalysisMode::Patient);
    Ok(validate_patient(&value)?)
}

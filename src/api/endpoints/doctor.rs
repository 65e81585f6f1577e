//! Clinician-facing analysis endpoint.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::api::uploads::{resolve_source, MultipartForm};
use crate::core_state::CoreState;
use crate::db;
use crate::models::{DoctorAnalysisResult, RecordSubmission};
use crate::pipeline::analysis::analyze_for_doctor;
use crate::pipeline::extraction::preprocess_scan;
use crate::pipeline::inference::ClinicalSources;

const NO_CLINICAL_DATA: &str = "No clinical data provided. Supply at least one of: \
patient_history, prescriptions, or lab_reports.";

/// `POST /doctor/analyze`: multipart form with optional text fields,
/// document files, a scan image and a dashboard `patient_id`.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<DoctorAnalysisResult>, ApiError> {
    let mut form = MultipartForm::read(multipart).await?;

    let history_file = form.take_file("patient_history_file");
    let prescriptions_file = form.take_file("prescriptions_file");
    let labs_file = form.take_file("lab_reports_file");
    let scan = form.take_file("scan_image");
    let patient_id = form.text("patient_id").trim().to_string();
    let history_text = form.text("patient_history_text").to_string();
    let prescriptions_text = form.text("prescriptions_text").to_string();
    let labs_text = form.text("lab_reports_text").to_string();

    let core = ctx.core.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<DoctorAnalysisResult, ApiError> {
        let sources = ClinicalSources {
            patient_history: resolve_source(&history_text, history_file, "patient_history"),
            prescriptions: resolve_source(&prescriptions_text, prescriptions_file, "prescriptions"),
            lab_reports: resolve_source(&labs_text, labs_file, "lab_reports"),
        };
        if sources.is_empty() {
            return Err(ApiError::Unprocessable(NO_CLINICAL_DATA.into()));
        }

        // The upload itself is recorded even when it cannot be decoded
        let has_scan_image = scan.is_some();
        let scan_filename = scan.as_ref().and_then(|f| f.file_name.clone());
        let image = scan.and_then(|file| {
            match preprocess_scan(&file.bytes, file.file_name.as_deref()) {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(error = %e, "Scan image could not be decoded, continuing without it");
                    None
                }
            }
        });

        let result = analyze_for_doctor(core.gateway(), &sources, image)?;

        if !patient_id.is_empty() {
            let submission = RecordSubmission {
                patient_history: sources.patient_history,
                prescriptions: sources.prescriptions,
                lab_reports: sources.lab_reports,
                has_scan_image,
                scan_filename,
            };
            persist_analysis(&core, &patient_id, &result, &submission);
        }

        Ok(result)
    })
    .await??;

    Ok(Json(result))
}

/// Cache the analysis and append the sources for a known patient.
/// Failures are logged; the caller still gets its analysis.
fn persist_analysis(
    core: &CoreState,
    patient_id: &str,
    result: &DoctorAnalysisResult,
    submission: &RecordSubmission,
) {
    let outcome = core.open_db().map_err(ApiError::from).and_then(|conn| {
        if db::get_patient(&conn, patient_id)?.is_none() {
            tracing::warn!(patient_id, "Unknown patient, analysis not saved");
            return Ok(());
        }
        db::save_analysis(&conn, patient_id, result)?;
        db::append_records(&conn, patient_id, submission)?;
        tracing::info!(patient_id, "Analysis saved to dashboard");
        Ok(())
    });

    if let Err(e) = outcome {
        tracing::error!(patient_id, error = %e, "Failed to persist analysis");
    }
}

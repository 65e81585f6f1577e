//! Patient-facing explanation endpoint.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::api::uploads::{resolve_source, MultipartForm};
use crate::config::PATIENT_MAX_CHARS;
use crate::models::PatientExplanationResult;
use crate::pipeline::analysis::explain_for_patient;
use crate::pipeline::extraction::truncate_for_model;

const UNREADABLE_PDF: &str = "Could not extract text from the uploaded PDF. Please ensure the \
file is a readable, non-scanned PDF, or paste the text directly.";

const NO_REPORT: &str = "No report content provided. Supply report_text (form field) or upload \
a report_file (PDF or .txt).";

/// `POST /patient/explain`: `report_file` (PDF or text) or `report_text`.
pub async fn explain(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<PatientExplanationResult>, ApiError> {
    let mut form = MultipartForm::read(multipart).await?;
    let report_file = form.take_file("report_file");
    let report_text = form.text("report_text").to_string();

    let core = ctx.core.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<PatientExplanationResult, ApiError> {
        let uploaded_pdf = report_file.as_ref().is_some_and(|f| f.is_pdf());
        let text = resolve_source(&report_text, report_file, "report");
        if text.is_empty() {
            let message = if uploaded_pdf { UNREADABLE_PDF } else { NO_REPORT };
            return Err(ApiError::Unprocessable(message.into()));
        }
        let text = truncate_for_model(text, PATIENT_MAX_CHARS);

        Ok(explain_for_patient(core.gateway(), &text)?)
    })
    .await??;

    Ok(Json(result))
}

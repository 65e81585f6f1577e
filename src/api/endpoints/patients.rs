//! Dashboard patient CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{NewPatient, Patient, PatientRecords};

fn patient_not_found() -> ApiError {
    ApiError::NotFound("Patient not found".into())
}

/// `GET /patients`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Value>, ApiError> {
    let conn = ctx.core.open_db()?;
    let patients = db::list_patients(&conn)?;
    Ok(Json(json!({ "patients": patients })))
}

/// `GET /patients/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.core.open_db()?;
    db::get_patient(&conn, &id)?
        .map(Json)
        .ok_or_else(patient_not_found)
}

/// `POST /patients`: 201 with the stored row, 409 on a taken id.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let conn = ctx.core.open_db()?;
    let patient = db::create_patient(&conn, payload)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `GET /patients/:id/records`
pub async fn records(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<PatientRecords>, ApiError> {
    let conn = ctx.core.open_db()?;
    if db::get_patient(&conn, &id)?.is_none() {
        return Err(patient_not_found());
    }
    Ok(Json(db::get_records(&conn, &id)?))
}

/// `GET /patients/:id/ai-insights`: `{analysis: <last analysis | null>}`.
pub async fn ai_insights(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let conn = ctx.core.open_db()?;
    if db::get_patient(&conn, &id)?.is_none() {
        return Err(patient_not_found());
    }
    let analysis = db::get_analysis(&conn, &id)?;
    Ok(Json(json!({ "analysis": analysis })))
}

//! Dashboard appointment list and booking.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{Appointment, NewAppointment};

/// `GET /appointments`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Value>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointments = db::list_appointments(&conn)?;
    Ok(Json(json!({ "appointments": appointments })))
}

/// `POST /appointments`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<NewAppointment>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = db::create_appointment(&conn, payload)?;
    tracing::info!(id = appointment.id, patient = %appointment.patient, "Appointment created");
    Ok(Json(appointment))
}

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::db::DatabaseError;
use crate::models::DoctorAnalysisResult;

/// Replace the cached doctor analysis for a patient.
pub fn save_analysis(
    conn: &Connection,
    patient_id: &str,
    analysis: &DoctorAnalysisResult,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO analysis (patient_id, analysis_json, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(patient_id) DO UPDATE SET
            analysis_json = excluded.analysis_json,
            updated_at = excluded.updated_at",
        params![patient_id, serde_json::to_string(analysis)?],
    )?;
    Ok(())
}

/// The last saved analysis, as stored JSON.
pub fn get_analysis(conn: &Connection, patient_id: &str) -> Result<Option<Value>, DatabaseError> {
    let json: Option<String> = conn
        .query_row(
            "SELECT analysis_json FROM analysis WHERE patient_id = ?1",
            params![patient_id],
            |row| row.get(0),
        )
        .optional()?;

    json.map(|j| serde_json::from_str(&j).map_err(DatabaseError::from))
        .transpose()
}

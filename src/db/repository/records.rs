use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

/// Records for a patient; empty categories when no row exists.
pub fn get_records(conn: &Connection, patient_id: &str) -> Result<PatientRecords, DatabaseError> {
    let json: Option<String> = conn
        .query_row(
            "SELECT records_json FROM records WHERE patient_id = ?1",
            params![patient_id],
            |row| row.get(0),
        )
        .optional()?;

    match json {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(PatientRecords::default()),
    }
}

/// Append the non-empty sources of one submission to the patient's records.
pub fn append_records(
    conn: &Connection,
    patient_id: &str,
    submission: &RecordSubmission,
) -> Result<PatientRecords, DatabaseError> {
    let mut records = get_records(conn, patient_id)?;
    let captured_at = chrono::Utc::now().to_rfc3339();
    records.append(submission, &captured_at);

    conn.execute(
        "INSERT INTO records (patient_id, records_json) VALUES (?1, ?2)
         ON CONFLICT(patient_id) DO UPDATE SET records_json = excluded.records_json",
        params![patient_id, serde_json::to_string(&records)?],
    )?;
    Ok(records)
}

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

const PATIENT_COLUMNS: &str = "id, mrn, name, age, gender, dob, blood_type, allergies_json,
     conditions_json, last_visit, next_appointment, primary_physician";

fn patient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Patient, String, String)> {
    Ok((
        Patient {
            id: row.get(0)?,
            mrn: row.get(1)?,
            name: row.get(2)?,
            age: row.get(3)?,
            gender: row.get(4)?,
            dob: row.get(5)?,
            blood_type: row.get(6)?,
            allergies: Vec::new(),
            conditions: Vec::new(),
            last_visit: row.get(9)?,
            next_appointment: row.get(10)?,
            primary_physician: row.get(11)?,
        },
        row.get::<_, String>(7)?,
        row.get::<_, String>(8)?,
    ))
}

fn hydrate(
    (mut patient, allergies, conditions): (Patient, String, String),
) -> Result<Patient, DatabaseError> {
    patient.allergies = serde_json::from_str(&allergies)?;
    patient.conditions = serde_json::from_str(&conditions)?;
    Ok(patient)
}

/// All patients, ordered by id.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map([], patient_from_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(hydrate(row?)?);
    }
    Ok(patients)
}

pub fn get_patient(conn: &Connection, id: &str) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
            params![id],
            patient_from_row,
        )
        .optional()?;
    row.map(hydrate).transpose()
}

/// Next free `P###` id: one past the largest numeric suffix in use.
pub fn next_patient_id(conn: &Connection) -> Result<String, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id FROM patients")?;
    let ids = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut max_suffix: u64 = 0;
    for id in ids {
        let id = id?;
        if let Some(n) = id.strip_prefix('P').and_then(numeric_suffix) {
            max_suffix = max_suffix.max(n);
        }
    }
    let next = max_suffix
        .checked_add(1)
        .ok_or_else(|| DatabaseError::Conflict("Patient id sequence exhausted".into()))?;
    Ok(format!("P{next:03}"))
}

/// Plain ASCII digits only; `u64::from_str` would also take a leading `+`.
/// Suffixes too large for u64 are not part of the sequence.
fn numeric_suffix(suffix: &str) -> Option<u64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Insert a patient plus an empty records row.
/// Fails with `Conflict` when the requested id already exists.
pub fn create_patient(conn: &Connection, payload: NewPatient) -> Result<Patient, DatabaseError> {
    let id = match payload.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(requested) => requested.to_string(),
        None => next_patient_id(conn)?,
    };

    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    if exists {
        return Err(DatabaseError::Conflict(format!("Patient {id} already exists")));
    }

    let patient = payload.into_patient(id);
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO patients (
            id, mrn, name, age, gender, dob, blood_type,
            allergies_json, conditions_json, last_visit, next_appointment, primary_physician
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            patient.id,
            patient.mrn,
            patient.name,
            patient.age,
            patient.gender,
            patient.dob,
            patient.blood_type,
            serde_json::to_string(&patient.allergies)?,
            serde_json::to_string(&patient.conditions)?,
            patient.last_visit,
            patient.next_appointment,
            patient.primary_physician,
        ],
    )?;
    tx.execute(
        "INSERT INTO records (patient_id, records_json) VALUES (?1, ?2)",
        params![patient.id, serde_json::to_string(&PatientRecords::default())?],
    )?;
    tx.commit()?;

    tracing::info!(patient_id = %patient.id, "Patient created");
    Ok(patient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn new_patient(id: Option<&str>) -> NewPatient {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "mrn": "MRN-NEW-901",
            "name": "No Extras",
            "age": 50,
            "gender": "Male",
            "dob": "1975-11-01",
            "allergies": ["Latex"]
        }))
        .unwrap()
    }

    #[test]
    fn seeded_patients_listed_in_id_order() {
        let conn = open_memory_database().unwrap();
        let patients = list_patients(&conn).unwrap();
        let ids: Vec<_> = patients.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P001", "P002"]);
        assert_eq!(patients[0].name, "Sarah Johnson");
        assert_eq!(patients[0].allergies, vec!["Penicillin", "Sulfa drugs"]);
    }

    #[test]
    fn get_missing_patient_is_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_patient(&conn, "P999").unwrap().is_none());
        assert!(get_patient(&conn, "P002").unwrap().is_some());
    }

    #[test]
    fn generated_id_follows_max_suffix() {
        let conn = open_memory_database().unwrap();
        let created = create_patient(&conn, new_patient(None)).unwrap();
        assert_eq!(created.id, "P003");
        assert_eq!(created.blood_type, "Unknown");

        create_patient(&conn, new_patient(Some("P041"))).unwrap();
        assert_eq!(next_patient_id(&conn).unwrap(), "P042");
    }

    #[test]
    fn non_numeric_ids_are_ignored_for_generation() {
        let conn = open_memory_database().unwrap();
        create_patient(&conn, new_patient(Some("PX-CUSTOM"))).unwrap();
        assert_eq!(next_patient_id(&conn).unwrap(), "P003");
    }

    #[test]
    fn signed_and_oversized_suffixes_are_ignored() {
        let conn = open_memory_database().unwrap();
        create_patient(&conn, new_patient(Some("P+50"))).unwrap();
        create_patient(&conn, new_patient(Some("P99999999999999999999999"))).unwrap();
        assert_eq!(next_patient_id(&conn).unwrap(), "P003");
    }

    #[test]
    fn exhausted_sequence_is_conflict() {
        let conn = open_memory_database().unwrap();
        create_patient(&conn, new_patient(Some("P18446744073709551615"))).unwrap();
        let err = next_patient_id(&conn).unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        let err = create_patient(&conn, new_patient(None)).unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[test]
    fn duplicate_id_conflicts() {
        let conn = open_memory_database().unwrap();
        let err = create_patient(&conn, new_patient(Some("P001"))).unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[test]
    fn created_patient_has_empty_records_row() {
        let conn = open_memory_database().unwrap();
        let created = create_patient(&conn, new_patient(None)).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE patient_id = ?1",
                params![created.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}

use std::path::Path;

use rusqlite::{params, Connection};

use super::DatabaseError;
use crate::models::{Patient, PatientRecords};

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::MigrationFailed {
                version: 0,
                reason: format!("cannot create {}: {e}", parent.display()),
            })?;
        }
    }
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    seed_defaults(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    seed_defaults(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;
         PRAGMA busy_timeout=5000;"
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![
        (1, include_str!("../../resources/migrations/001_initial.sql")),
    ];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap_or(0)
}

/// Insert the demo patients when the dashboard is empty.
fn seed_defaults(conn: &Connection) -> Result<(), DatabaseError> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(());
    }

    let empty_records = serde_json::to_string(&PatientRecords::default())?;
    for patient in default_patients() {
        conn.execute(
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
        conn.execute(
            "INSERT INTO records (patient_id, records_json) VALUES (?1, ?2)",
            params![patient.id, empty_records],
        )?;
    }
    tracing::info!("Seeded default dashboard patients");
    Ok(())
}

fn default_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "P001".into(),
            mrn: "MRN-2024-001".into(),
            name: "Sarah Johnson".into(),
            age: 67,
            gender: "Female".into(),
            dob: "1957-03-15".into(),
            blood_type: "A+".into(),
            allergies: vec!["Penicillin".into(), "Sulfa drugs".into()],
            conditions: vec![
                "Type 2 Diabetes".into(),
                "Hypertension".into(),
                "Hyperlipidemia".into(),
            ],
            last_visit: "2024-01-15".into(),
            next_appointment: "2024-02-20".into(),
            primary_physician: "Dr. Michael Chen".into(),
        },
        Patient {
            id: "P002".into(),
            mrn: "MRN-2024-002".into(),
            name: "James Miller".into(),
            age: 59,
            gender: "Male".into(),
            dob: "1965-07-04".into(),
            blood_type: "O+".into(),
            allergies: vec!["None known".into()],
            conditions: vec!["Coronary artery disease".into()],
            last_visit: "2024-01-11".into(),
            next_appointment: "2024-02-25".into(),
            primary_physician: "Dr. Aditi Rao".into(),
        },
    ]
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_tables() {
        let conn = open_memory_database().unwrap();
        // patients, records, analysis, appointments, schema_version
        let count = count_tables(&conn).unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        let result = run_migrations(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn seeds_two_patients_once() {
        let conn = open_memory_database().unwrap();
        seed_defaults(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn reopening_file_database_keeps_data() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("dash.db");
        {
            let conn = open_database(&path).unwrap();
            conn.execute("DELETE FROM records WHERE patient_id = 'P002'", []).unwrap();
        }
        let conn = open_database(&path).unwrap();
        let records: i64 = conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(records, 1);
    }
}

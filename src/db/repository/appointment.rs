use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient, time, type, duration, status
         FROM appointments ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Appointment {
            id: row.get(0)?,
            patient: row.get(1)?,
            time: row.get(2)?,
            appointment_type: row.get(3)?,
            duration: row.get(4)?,
            status: row.get(5)?,
        })
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

pub fn create_appointment(
    conn: &Connection,
    payload: NewAppointment,
) -> Result<Appointment, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (patient, time, type, duration, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            payload.patient,
            payload.time,
            payload.appointment_type,
            payload.duration,
            payload.status,
        ],
    )?;

    Ok(Appointment {
        id: conn.last_insert_rowid(),
        patient: payload.patient,
        time: payload.time,
        appointment_type: payload.appointment_type,
        duration: payload.duration,
        status: payload.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn payload(patient: &str) -> NewAppointment {
        serde_json::from_value(serde_json::json!({
            "patient": patient,
            "time": "09:30"
        }))
        .unwrap()
    }

    #[test]
    fn starts_empty() {
        let conn = open_memory_database().unwrap();
        assert!(list_appointments(&conn).unwrap().is_empty());
    }

    #[test]
    fn create_applies_defaults_and_increments_id() {
        let conn = open_memory_database().unwrap();
        let first = create_appointment(&conn, payload("Sarah Johnson")).unwrap();
        let second = create_appointment(&conn, payload("James Miller")).unwrap();

        assert_eq!(first.appointment_type, "Consultation");
        assert_eq!(first.duration, "30 min");
        assert_eq!(first.status, "confirmed");
        assert!(second.id > first.id);

        let listed = list_appointments(&conn).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].patient, "James Miller");
    }
}

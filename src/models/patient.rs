use serde::{Deserialize, Serialize};

/// Dashboard patient row. Serialized camelCase for the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub mrn: String,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub dob: String,
    pub blood_type: String,
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
    pub last_visit: String,
    pub next_appointment: String,
    pub primary_physician: String,
}

/// Patient creation payload; optional fields get dashboard defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    #[serde(default)]
    pub id: Option<String>,
    pub mrn: String,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub dob: String,
    #[serde(default = "default_blood_type")]
    pub blood_type: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub last_visit: Option<String>,
    #[serde(default = "default_next_appointment")]
    pub next_appointment: String,
    #[serde(default = "default_primary_physician")]
    pub primary_physician: String,
}

fn default_blood_type() -> String {
    "Unknown".into()
}

fn default_next_appointment() -> String {
    "TBD".into()
}

fn default_primary_physician() -> String {
    "Unassigned".into()
}

impl NewPatient {
    /// Materialize into a full row under the given id.
    /// `lastVisit` defaults to today's UTC date.
    pub fn into_patient(self, id: String) -> Patient {
        Patient {
            id,
            mrn: self.mrn,
            name: self.name,
            age: self.age,
            gender: self.gender,
            dob: self.dob,
            blood_type: self.blood_type,
            allergies: self.allergies,
            conditions: self.conditions,
            last_visit: self
                .last_visit
                .unwrap_or_else(|| chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()),
            next_appointment: self.next_appointment,
            primary_physician: self.primary_physician,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_payload_gets_defaults() {
        let payload: NewPatient = serde_json::from_value(serde_json::json!({
            "mrn": "MRN-NEW-901",
            "name": "No Extras",
            "age": 50,
            "gender": "Male",
            "dob": "1975-11-01"
        }))
        .unwrap();
        let patient = payload.into_patient("P003".into());
        assert_eq!(patient.blood_type, "Unknown");
        assert_eq!(patient.next_appointment, "TBD");
        assert_eq!(patient.primary_physician, "Unassigned");
        assert!(patient.allergies.is_empty());
        assert_eq!(patient.last_visit.len(), 10);
    }

    #[test]
    fn patient_serializes_camel_case() {
        let patient = Patient {
            id: "P001".into(),
            mrn: "MRN-1".into(),
            name: "Sarah Johnson".into(),
            age: 67,
            gender: "Female".into(),
            dob: "1957-03-15".into(),
            blood_type: "A+".into(),
            allergies: vec!["Penicillin".into()],
            conditions: vec![],
            last_visit: "2024-01-15".into(),
            next_appointment: "2024-02-20".into(),
            primary_physician: "Dr. Michael Chen".into(),
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["bloodType"], "A+");
        assert_eq!(json["primaryPhysician"], "Dr. Michael Chen");
        assert_eq!(json["nextAppointment"], "2024-02-20");
    }
}

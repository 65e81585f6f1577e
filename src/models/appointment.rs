use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient: String,
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub duration: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub patient: String,
    pub time: String,
    #[serde(rename = "type", default = "default_type")]
    pub appointment_type: String,
    #[serde(default = "default_duration")]
    pub duration: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_type() -> String {
    "Consultation".into()
}

fn default_duration() -> String {
    "30 min".into()
}

fn default_status() -> String {
    "confirmed".into()
}

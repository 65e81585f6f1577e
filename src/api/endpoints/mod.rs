pub mod appointments;
pub mod doctor;
pub mod health;
pub mod patient;
pub mod patients;

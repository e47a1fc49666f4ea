use serde::{Deserialize, Serialize};

use crate::ingest::AppointmentRecord;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Appointment {
    pub phone: String,
    /// Accepted for the client's benefit; not part of the outgoing text.
    pub appointment_time: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SendSmsRequest {
    pub delay: String,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SendSmsResponse {
    pub success: Vec<String>,
    pub failure: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UploadCsvResponse {
    pub appointments: Vec<AppointmentRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

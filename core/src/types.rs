//! Domain DTOs for the clinic API.
//!
//! # Design
//! Field names are English in Rust and renamed to the backend's Spanish wire
//! names with serde. The types are defined independently from the
//! mock-server crate; integration tests catch any schema drift.

use serde::{Deserialize, Serialize};

/// Server-assigned record identifier.
pub type RecordId = i64;

/// Anything stored in a [`ListCache`](crate::cache::ListCache).
pub trait Identified {
    fn id(&self) -> RecordId;
}

/// A patient as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Present only when the backend includes the relation.
    #[serde(rename = "turnos", default, skip_serializing_if = "Option::is_none")]
    pub appointments: Option<Vec<Appointment>>,
}

/// An appointment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: RecordId,
    /// `YYYY-MM-DD`, sometimes with a trailing time component.
    #[serde(rename = "fecha")]
    pub date: String,
    /// `HH:MM` or `HH:MM:SS`.
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "razon")]
    pub reason: String,
    /// Omitted when the appointment is nested inside its own patient.
    #[serde(rename = "paciente", default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
}

impl Appointment {
    pub fn patient_id(&self) -> Option<RecordId> {
        self.patient.as_ref().map(|p| p.id)
    }
}

impl Identified for Patient {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Identified for Appointment {
    fn id(&self) -> RecordId {
        self.id
    }
}

/// Request payload for creating a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPatient {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
}

/// Request payload for updating a patient. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Request payload for creating an appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAppointment {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "razon")]
    pub reason: String,
    #[serde(rename = "pacienteId")]
    pub patient_id: RecordId,
}

/// Request payload for updating an appointment, with the same partial-fill
/// semantics as [`PatientUpdate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentUpdate {
    #[serde(rename = "fecha", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "hora", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "razon", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "pacienteId", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<RecordId>,
}

/// Raw patient form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl PatientForm {
    pub fn to_new_patient(&self) -> NewPatient {
        NewPatient {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl From<&Patient> for PatientForm {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
        }
    }
}

/// Raw appointment form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentForm {
    pub date: String,
    pub time: String,
    pub reason: String,
    pub patient_id: Option<RecordId>,
}

impl AppointmentForm {
    /// Payload for a create call; `None` until a patient is selected.
    pub fn to_new_appointment(&self) -> Option<NewAppointment> {
        Some(NewAppointment {
            date: self.date.clone(),
            time: self.time.clone(),
            reason: self.reason.clone(),
            patient_id: self.patient_id?,
        })
    }

    pub fn to_update(&self) -> AppointmentUpdate {
        AppointmentUpdate {
            date: Some(self.date.clone()),
            time: Some(self.time.clone()),
            reason: Some(self.reason.clone()),
            patient_id: self.patient_id,
        }
    }
}

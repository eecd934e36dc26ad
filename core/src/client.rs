//! Stateless HTTP request builder and response parser for the clinic API.
//!
//! # Design
//! `ClinicClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! [`RestApi`](crate::api::RestApi) wires the two halves to a transport.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Appointment, AppointmentUpdate, NewAppointment, NewPatient, Patient, PatientUpdate, RecordId,
};

const PATIENTS: &str = "pacientes";
const APPOINTMENTS: &str = "turnos";

/// Synchronous, stateless client for the clinic API.
#[derive(Debug, Clone)]
pub struct ClinicClient {
    base_url: String,
}

impl ClinicClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- patients ---

    pub fn build_list_patients(&self) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/{PATIENTS}", self.base_url))
    }

    pub fn build_create_patient(&self, input: &NewPatient) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/{PATIENTS}", self.base_url), input)
    }

    pub fn build_update_patient(&self, id: RecordId, input: &PatientUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, format!("{}/{PATIENTS}/{id}", self.base_url), input)
    }

    pub fn build_delete_patient(&self, id: RecordId) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{}/{PATIENTS}/{id}", self.base_url))
    }

    /// The backend exposes this relation under its English path.
    pub fn build_patient_appointments(&self, id: RecordId) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/patients/{id}/appointments", self.base_url))
    }

    pub fn parse_list_patients(&self, response: HttpResponse) -> Result<Vec<Patient>, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_patient(&self, response: HttpResponse) -> Result<Patient, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_patient(&self, response: HttpResponse) -> Result<Patient, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_patient(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_patient_appointments(&self, response: HttpResponse) -> Result<Vec<Appointment>, ApiError> {
        parse_json(response)
    }

    // --- appointments ---

    pub fn build_list_appointments(&self) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/{APPOINTMENTS}", self.base_url))
    }

    pub fn build_create_appointment(&self, input: &NewAppointment) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/{APPOINTMENTS}", self.base_url), input)
    }

    pub fn build_update_appointment(
        &self,
        id: RecordId,
        input: &AppointmentUpdate,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, format!("{}/{APPOINTMENTS}/{id}", self.base_url), input)
    }

    pub fn build_delete_appointment(&self, id: RecordId) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{}/{APPOINTMENTS}/{id}", self.base_url))
    }

    pub fn parse_list_appointments(&self, response: HttpResponse) -> Result<Vec<Appointment>, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_appointment(&self, response: HttpResponse) -> Result<Appointment, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_appointment(&self, response: HttpResponse) -> Result<Appointment, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_appointment(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

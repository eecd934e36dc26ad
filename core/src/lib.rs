//! Client core for the clinic patients/appointments service.
//!
//! # Overview
//! Validates patient and appointment forms, normalizes the backend's date
//! and time strings, and talks to the REST API with a retry policy that
//! rides out a cold-starting backend. Controllers keep the in-memory list
//! for each view and gate every write on validation.
//!
//! # Design
//! - `ClinicClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`. Only a `Transport` does I/O.
//! - `RestApi` composes client, transport and `RetryPolicy`; reads retry on
//!   503, writes never retry.
//! - Controllers depend on the `PatientsApi` / `AppointmentsApi` traits.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod controller;
pub mod datetime;
pub mod error;
pub mod http;
pub mod retry;
pub mod transport;
pub mod types;
pub mod validation;

pub use api::{AppointmentsApi, PatientsApi, RestApi};
pub use cache::ListCache;
pub use client::ClinicClient;
pub use config::{ApiConfig, ConfigError};
pub use controller::{
    AppointmentEdit, AppointmentsController, Confirm, ControllerError, DeleteOutcome, LoadState,
    PatientsController,
};
pub use datetime::{
    format_display_date, matches_date_filter, normalize_time, to_comparable_instant, Clock, DateTimeError,
    LocalClock,
};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use retry::{RetryPolicy, Sleep, ThreadSleep};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Appointment, AppointmentForm, AppointmentUpdate, NewAppointment, NewPatient, Patient, PatientForm,
    PatientUpdate, RecordId,
};
pub use validation::{
    validate_appointment_fields, validate_email, validate_name, validate_patient_fields, validate_phone, Field,
    FieldErrors,
};

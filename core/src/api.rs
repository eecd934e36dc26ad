//! REST operations per entity, composed from `ClinicClient`, a `Transport`
//! and the retry policy.
//!
//! # Design
//! Controllers depend on the `PatientsApi` / `AppointmentsApi` traits, never on
//! a concrete transport. `RestApi` implements both. Reads go through
//! `RetryPolicy`; writes are sent exactly once so a slow backend never sees a
//! duplicated create or delete from this layer.

use crate::client::ClinicClient;
use crate::config::{ApiConfig, ConfigError};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::retry::{RetryPolicy, Sleep, ThreadSleep};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Appointment, AppointmentUpdate, NewAppointment, NewPatient, Patient, PatientUpdate, RecordId,
};

pub trait PatientsApi {
    fn list_patients(&self) -> Result<Vec<Patient>, ApiError>;
    fn create_patient(&self, input: &NewPatient) -> Result<Patient, ApiError>;
    fn update_patient(&self, id: RecordId, input: &PatientUpdate) -> Result<Patient, ApiError>;
    fn delete_patient(&self, id: RecordId) -> Result<(), ApiError>;
    fn patient_appointments(&self, id: RecordId) -> Result<Vec<Appointment>, ApiError>;
}

pub trait AppointmentsApi {
    fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError>;
    fn create_appointment(&self, input: &NewAppointment) -> Result<Appointment, ApiError>;
    fn update_appointment(&self, id: RecordId, input: &AppointmentUpdate) -> Result<Appointment, ApiError>;
    fn delete_appointment(&self, id: RecordId) -> Result<(), ApiError>;
}

impl<A: PatientsApi + ?Sized> PatientsApi for &A {
    fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        (**self).list_patients()
    }

    fn create_patient(&self, input: &NewPatient) -> Result<Patient, ApiError> {
        (**self).create_patient(input)
    }

    fn update_patient(&self, id: RecordId, input: &PatientUpdate) -> Result<Patient, ApiError> {
        (**self).update_patient(id, input)
    }

    fn delete_patient(&self, id: RecordId) -> Result<(), ApiError> {
        (**self).delete_patient(id)
    }

    fn patient_appointments(&self, id: RecordId) -> Result<Vec<Appointment>, ApiError> {
        (**self).patient_appointments(id)
    }
}

impl<A: AppointmentsApi + ?Sized> AppointmentsApi for &A {
    fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        (**self).list_appointments()
    }

    fn create_appointment(&self, input: &NewAppointment) -> Result<Appointment, ApiError> {
        (**self).create_appointment(input)
    }

    fn update_appointment(&self, id: RecordId, input: &AppointmentUpdate) -> Result<Appointment, ApiError> {
        (**self).update_appointment(id, input)
    }

    fn delete_appointment(&self, id: RecordId) -> Result<(), ApiError> {
        (**self).delete_appointment(id)
    }
}

/// HTTP-backed implementation of both entity APIs.
#[derive(Debug, Clone)]
pub struct RestApi<T, S = ThreadSleep> {
    client: ClinicClient,
    transport: T,
    retry: RetryPolicy,
    sleeper: S,
}

impl RestApi<UreqTransport> {
    /// Blocking client configured from `CLINIC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(&ApiConfig::from_env()?, UreqTransport::new()))
    }
}

impl<T: Transport> RestApi<T> {
    pub fn new(config: &ApiConfig, transport: T) -> Self {
        Self::with_sleeper(config, transport, ThreadSleep)
    }
}

impl<T: Transport, S: Sleep> RestApi<T, S> {
    pub fn with_sleeper(config: &ApiConfig, transport: T, sleeper: S) -> Self {
        Self {
            client: ClinicClient::new(&config.base_url),
            transport,
            retry: config.retry,
            sleeper,
        }
    }

    pub fn client(&self) -> &ClinicClient {
        &self.client
    }

    fn read<R>(
        &self,
        build: impl Fn(&ClinicClient) -> HttpRequest,
        parse: impl Fn(&ClinicClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        self.retry.run(&self.sleeper, || {
            let response = self.transport.execute(build(&self.client))?;
            parse(&self.client, response)
        })
    }

    fn write<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&ClinicClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let response = self.transport.execute(request)?;
        parse(&self.client, response)
    }
}

impl<T: Transport, S: Sleep> PatientsApi for RestApi<T, S> {
    fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.read(ClinicClient::build_list_patients, ClinicClient::parse_list_patients)
    }

    fn create_patient(&self, input: &NewPatient) -> Result<Patient, ApiError> {
        let request = self.client.build_create_patient(input)?;
        self.write(request, ClinicClient::parse_create_patient)
    }

    fn update_patient(&self, id: RecordId, input: &PatientUpdate) -> Result<Patient, ApiError> {
        let request = self.client.build_update_patient(id, input)?;
        self.write(request, ClinicClient::parse_update_patient)
    }

    fn delete_patient(&self, id: RecordId) -> Result<(), ApiError> {
        let request = self.client.build_delete_patient(id);
        self.write(request, ClinicClient::parse_delete_patient)
    }

    fn patient_appointments(&self, id: RecordId) -> Result<Vec<Appointment>, ApiError> {
        self.read(
            |client| client.build_patient_appointments(id),
            ClinicClient::parse_patient_appointments,
        )
    }
}

impl<T: Transport, S: Sleep> AppointmentsApi for RestApi<T, S> {
    fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.read(ClinicClient::build_list_appointments, ClinicClient::parse_list_appointments)
    }

    fn create_appointment(&self, input: &NewAppointment) -> Result<Appointment, ApiError> {
        let request = self.client.build_create_appointment(input)?;
        self.write(request, ClinicClient::parse_create_appointment)
    }

    fn update_appointment(&self, id: RecordId, input: &AppointmentUpdate) -> Result<Appointment, ApiError> {
        let request = self.client.build_update_appointment(id, input)?;
        self.write(request, ClinicClient::parse_update_appointment)
    }

    fn delete_appointment(&self, id: RecordId) -> Result<(), ApiError> {
        let request = self.client.build_delete_appointment(id);
        self.write(request, ClinicClient::parse_delete_appointment)
    }
}

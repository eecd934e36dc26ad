//! In-memory backend for controller tests.

use std::cell::{Cell, RefCell};

use crate::api::{AppointmentsApi, PatientsApi};
use crate::error::ApiError;
use crate::types::{
    Appointment, AppointmentUpdate, NewAppointment, NewPatient, Patient, PatientUpdate, RecordId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPatients,
    CreatePatient,
    UpdatePatient(RecordId),
    DeletePatient(RecordId),
    PatientAppointments(RecordId),
    ListAppointments,
    CreateAppointment,
    UpdateAppointment(RecordId),
    DeleteAppointment(RecordId),
}

#[derive(Default)]
struct Tables {
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    last_id: RecordId,
}

impl Tables {
    fn next_id(&mut self) -> RecordId {
        self.last_id += 1;
        self.last_id
    }

    fn patient(&self, id: RecordId) -> Result<Patient, ApiError> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

#[derive(Default)]
pub struct FakeBackend {
    tables: RefCell<Tables>,
    calls: RefCell<Vec<Call>>,
    fail_next: Cell<Option<u16>>,
}

impl FakeBackend {
    pub fn seed_patient(&self, name: &str) -> RecordId {
        let mut tables = self.tables.borrow_mut();
        let id = tables.next_id();
        tables.patients.push(Patient {
            id,
            name: name.to_string(),
            email: format!("paciente{id}@mail.com"),
            phone: "12345678".to_string(),
            appointments: None,
        });
        id
    }

    pub fn seed_appointment(&self, patient_id: RecordId, date: &str, time: &str) -> RecordId {
        let mut tables = self.tables.borrow_mut();
        let id = tables.next_id();
        let patient = tables.patient(patient_id).ok();
        tables.appointments.push(Appointment {
            id,
            date: date.to_string(),
            time: time.to_string(),
            reason: "Control".to_string(),
            patient,
        });
        id
    }

    /// Make the next call of any kind fail with `status`.
    pub fn fail_next(&self, status: u16) {
        self.fail_next.set(Some(status));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call);
        match self.fail_next.take() {
            Some(status) => Err(ApiError::HttpError {
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }
}

impl PatientsApi for FakeBackend {
    fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.record(Call::ListPatients)?;
        Ok(self.tables.borrow().patients.clone())
    }

    fn create_patient(&self, input: &NewPatient) -> Result<Patient, ApiError> {
        self.record(Call::CreatePatient)?;
        let mut tables = self.tables.borrow_mut();
        let patient = Patient {
            id: tables.next_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            appointments: None,
        };
        tables.patients.push(patient.clone());
        Ok(patient)
    }

    fn update_patient(&self, id: RecordId, input: &PatientUpdate) -> Result<Patient, ApiError> {
        self.record(Call::UpdatePatient(id))?;
        let mut tables = self.tables.borrow_mut();
        let patient = tables
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::NotFound)?;
        if let Some(name) = &input.name {
            patient.name = name.clone();
        }
        if let Some(email) = &input.email {
            patient.email = email.clone();
        }
        if let Some(phone) = &input.phone {
            patient.phone = phone.clone();
        }
        Ok(patient.clone())
    }

    fn delete_patient(&self, id: RecordId) -> Result<(), ApiError> {
        self.record(Call::DeletePatient(id))?;
        let mut tables = self.tables.borrow_mut();
        tables.patient(id)?;
        tables.patients.retain(|p| p.id != id);
        tables.appointments.retain(|a| a.patient_id() != Some(id));
        Ok(())
    }

    fn patient_appointments(&self, id: RecordId) -> Result<Vec<Appointment>, ApiError> {
        self.record(Call::PatientAppointments(id))?;
        let tables = self.tables.borrow();
        tables.patient(id)?;
        Ok(tables
            .appointments
            .iter()
            .filter(|a| a.patient_id() == Some(id))
            .cloned()
            .collect())
    }
}

impl AppointmentsApi for FakeBackend {
    fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.record(Call::ListAppointments)?;
        Ok(self.tables.borrow().appointments.clone())
    }

    fn create_appointment(&self, input: &NewAppointment) -> Result<Appointment, ApiError> {
        self.record(Call::CreateAppointment)?;
        let mut tables = self.tables.borrow_mut();
        let patient = tables.patient(input.patient_id)?;
        let appointment = Appointment {
            id: tables.next_id(),
            date: input.date.clone(),
            time: input.time.clone(),
            reason: input.reason.clone(),
            patient: Some(patient),
        };
        tables.appointments.push(appointment.clone());
        Ok(appointment)
    }

    fn update_appointment(&self, id: RecordId, input: &AppointmentUpdate) -> Result<Appointment, ApiError> {
        self.record(Call::UpdateAppointment(id))?;
        let mut tables = self.tables.borrow_mut();
        let patient = match input.patient_id {
            Some(patient_id) => Some(tables.patient(patient_id)?),
            None => None,
        };
        let appointment = tables
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ApiError::NotFound)?;
        if let Some(date) = &input.date {
            appointment.date = date.clone();
        }
        if let Some(time) = &input.time {
            appointment.time = time.clone();
        }
        if let Some(reason) = &input.reason {
            appointment.reason = reason.clone();
        }
        if patient.is_some() {
            appointment.patient = patient;
        }
        Ok(appointment.clone())
    }

    fn delete_appointment(&self, id: RecordId) -> Result<(), ApiError> {
        self.record(Call::DeleteAppointment(id))?;
        let mut tables = self.tables.borrow_mut();
        let before = tables.appointments.len();
        tables.appointments.retain(|a| a.id != id);
        if tables.appointments.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}

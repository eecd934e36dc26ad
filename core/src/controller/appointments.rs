//! Appointments view controller.
//!
//! # Design
//! Holds the appointment list and the patient list used to pick an owner.
//! Filters are applied on read and never mutate the cache. Past-date checks
//! ask the injected `Clock`, so tests pin "now".

use crate::api::{AppointmentsApi, PatientsApi};
use crate::cache::ListCache;
use crate::datetime::{date_part, matches_date_filter, normalize_time, Clock, LocalClock};
use crate::error::ApiError;
use crate::types::{Appointment, AppointmentForm, Patient, RecordId};
use crate::validation::{validate_appointment_fields, FieldErrors};

use super::{Confirm, ControllerError, DeleteOutcome, LoadState};

pub const DELETE_APPOINTMENT: &str = "¿Seguro que querés eliminar este turno?";

/// Edit buffer for one appointment, with its date and time already trimmed
/// to `YYYY-MM-DD` and `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentEdit {
    pub id: RecordId,
    pub form: AppointmentForm,
}

impl From<&Appointment> for AppointmentEdit {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id,
            form: AppointmentForm {
                date: date_part(&appointment.date).to_string(),
                time: normalize_time(&appointment.time),
                reason: appointment.reason.clone(),
                patient_id: appointment.patient_id(),
            },
        }
    }
}

/// Appointments view. Also keeps the patient list used to pick who an
/// appointment belongs to.
pub struct AppointmentsController<A, P, C = LocalClock> {
    api: A,
    patients_api: P,
    clock: C,
    appointments: ListCache<Appointment>,
    patients: ListCache<Patient>,
    state: LoadState,
    form: AppointmentForm,
    form_errors: FieldErrors,
    submit_attempted: bool,
    editing: Option<AppointmentEdit>,
    edit_errors: FieldErrors,
    date_filter: String,
    patient_filter: Option<RecordId>,
}

impl<A: AppointmentsApi, P: PatientsApi> AppointmentsController<A, P> {
    pub fn new(api: A, patients_api: P) -> Self {
        Self::with_clock(api, patients_api, LocalClock)
    }

    /// Build the controller and fetch both lists. Failures are logged.
    pub fn mount(api: A, patients_api: P) -> Self {
        let mut controller = Self::new(api, patients_api);
        controller.load_all();
        controller
    }
}

impl<A: AppointmentsApi, P: PatientsApi, C: Clock> AppointmentsController<A, P, C> {
    pub fn with_clock(api: A, patients_api: P, clock: C) -> Self {
        Self {
            api,
            patients_api,
            clock,
            appointments: ListCache::default(),
            patients: ListCache::default(),
            state: LoadState::Idle,
            form: AppointmentForm::default(),
            form_errors: FieldErrors::default(),
            submit_attempted: false,
            editing: None,
            edit_errors: FieldErrors::default(),
            date_filter: String::new(),
            patient_filter: None,
        }
    }

    pub fn load_all(&mut self) {
        let _ = self.load();
        let _ = self.load_patients();
    }

    pub fn load(&mut self) -> Result<(), ApiError> {
        self.state = LoadState::Loading;
        let result = self.api.list_appointments();
        self.state = LoadState::Loaded;
        match result {
            Ok(appointments) => {
                tracing::debug!(count = appointments.len(), "appointments loaded");
                self.appointments.replace(appointments);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load appointments");
                Err(e)
            }
        }
    }

    pub fn load_patients(&mut self) -> Result<(), ApiError> {
        match self.patients_api.list_patients() {
            Ok(patients) => {
                self.patients.replace(patients);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load patients for appointments");
                Err(e)
            }
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        self.appointments.items()
    }

    pub fn patients(&self) -> &[Patient] {
        self.patients.items()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn form(&self) -> &AppointmentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AppointmentForm {
        &mut self.form
    }

    pub fn form_errors(&self) -> &FieldErrors {
        &self.form_errors
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }

    pub fn editing(&self) -> Option<&AppointmentEdit> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut AppointmentEdit> {
        self.editing.as_mut()
    }

    pub fn edit_errors(&self) -> &FieldErrors {
        &self.edit_errors
    }

    /// Empty string clears the date filter.
    pub fn set_date_filter(&mut self, date: impl Into<String>) {
        self.date_filter = date.into();
    }

    pub fn set_patient_filter(&mut self, patient_id: Option<RecordId>) {
        self.patient_filter = patient_id;
    }

    /// Cached appointments matching the active filters, in list order.
    pub fn filtered(&self) -> Vec<&Appointment> {
        self.appointments
            .items()
            .iter()
            .filter(|a| self.date_filter.is_empty() || matches_date_filter(&a.date, &self.date_filter))
            .filter(|a| self.patient_filter.map_or(true, |id| a.patient_id() == Some(id)))
            .collect()
    }

    pub fn create(&mut self) -> Result<Appointment, ControllerError> {
        self.submit_attempted = true;
        self.form_errors = self.validate(&self.form);
        if !self.form_errors.is_empty() {
            return Err(ControllerError::Validation(self.form_errors.clone()));
        }
        let input = self
            .form
            .to_new_appointment()
            .ok_or_else(|| ControllerError::Validation(self.form_errors.clone()))?;

        match self.api.create_appointment(&input) {
            Ok(created) => {
                tracing::info!(id = created.id, "appointment created");
                self.appointments.append(created.clone());
                self.form = AppointmentForm::default();
                self.form_errors = FieldErrors::default();
                self.submit_attempted = false;
                Ok(created)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create appointment");
                Err(e.into())
            }
        }
    }

    pub fn delete(&mut self, id: RecordId, confirm: &mut impl Confirm) -> Result<DeleteOutcome, ControllerError> {
        if !confirm.confirm(DELETE_APPOINTMENT) {
            return Ok(DeleteOutcome::Declined);
        }
        match self.api.delete_appointment(id) {
            Ok(()) => {
                tracing::info!(id, "appointment deleted");
                self.appointments.remove_by_id(id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "failed to delete appointment");
                Err(e.into())
            }
        }
    }

    pub fn begin_edit(&mut self, id: RecordId) -> Option<&mut AppointmentEdit> {
        let buffer = AppointmentEdit::from(self.appointments.get(id)?);
        self.edit_errors = FieldErrors::default();
        self.editing = Some(buffer);
        self.editing.as_mut()
    }

    pub fn save_edit(&mut self) -> Result<Appointment, ControllerError> {
        let Some(buffer) = self.editing.as_ref() else {
            return Err(ControllerError::NotEditing);
        };
        let id = buffer.id;
        let update = buffer.form.to_update();

        self.edit_errors = self.validate(&buffer.form);
        if !self.edit_errors.is_empty() {
            return Err(ControllerError::Validation(self.edit_errors.clone()));
        }

        match self.api.update_appointment(id, &update) {
            Ok(updated) => {
                tracing::info!(id, "appointment updated");
                self.appointments.replace_by_id(updated.clone());
                self.editing = None;
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "failed to update appointment");
                Err(e.into())
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.edit_errors = FieldErrors::default();
    }

    fn validate(&self, form: &AppointmentForm) -> FieldErrors {
        validate_appointment_fields(&form.date, &form.time, &form.reason, form.patient_id, self.clock.now())
    }
}

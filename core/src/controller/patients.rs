//! Patients view controller.
//!
//! # Design
//! Deleting a patient first asks the backend for the patient's appointments
//! so the confirmation can warn about them. Edits work on a cloned `Patient`
//! and only touch the cached list once the backend accepts the update.

use crate::api::PatientsApi;
use crate::cache::ListCache;
use crate::error::ApiError;
use crate::types::{Patient, PatientForm, PatientUpdate, RecordId};
use crate::validation::{validate_patient_fields, FieldErrors};

use super::{Confirm, ControllerError, DeleteOutcome, LoadState};

pub const DELETE_PATIENT_WITH_APPOINTMENTS: &str =
    "⚠ Este paciente tiene turnos asignados. ¿Estás seguro de que querés eliminarlo?";
pub const DELETE_PATIENT: &str = "¿Estás seguro de que querés eliminar este paciente?";

/// Patients view: list, create form, edit buffer, guarded delete.
pub struct PatientsController<A> {
    api: A,
    patients: ListCache<Patient>,
    state: LoadState,
    form: PatientForm,
    form_errors: FieldErrors,
    submit_attempted: bool,
    editing: Option<Patient>,
    edit_errors: FieldErrors,
}

impl<A: PatientsApi> PatientsController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            patients: ListCache::default(),
            state: LoadState::Idle,
            form: PatientForm::default(),
            form_errors: FieldErrors::default(),
            submit_attempted: false,
            editing: None,
            edit_errors: FieldErrors::default(),
        }
    }

    /// Build the controller and fetch the list straight away. A failed fetch
    /// is logged and the list stays empty.
    pub fn mount(api: A) -> Self {
        let mut controller = Self::new(api);
        let _ = controller.load();
        controller
    }

    pub fn load(&mut self) -> Result<(), ApiError> {
        self.state = LoadState::Loading;
        let result = self.api.list_patients();
        self.state = LoadState::Loaded;
        match result {
            Ok(patients) => {
                tracing::debug!(count = patients.len(), "patients loaded");
                self.patients.replace(patients);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load patients");
                Err(e)
            }
        }
    }

    pub fn patients(&self) -> &[Patient] {
        self.patients.items()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn form(&self) -> &PatientForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PatientForm {
        &mut self.form
    }

    pub fn form_errors(&self) -> &FieldErrors {
        &self.form_errors
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }

    pub fn editing(&self) -> Option<&Patient> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut Patient> {
        self.editing.as_mut()
    }

    pub fn edit_errors(&self) -> &FieldErrors {
        &self.edit_errors
    }

    /// Validate the create form and, if clean, send it. On success the new
    /// record is appended and the form reset.
    pub fn create(&mut self) -> Result<Patient, ControllerError> {
        self.submit_attempted = true;
        self.form_errors = validate_patient_fields(&self.form);
        if !self.form_errors.is_empty() {
            return Err(ControllerError::Validation(self.form_errors.clone()));
        }

        match self.api.create_patient(&self.form.to_new_patient()) {
            Ok(created) => {
                tracing::info!(id = created.id, "patient created");
                self.patients.append(created.clone());
                self.form = PatientForm::default();
                self.form_errors = FieldErrors::default();
                self.submit_attempted = false;
                Ok(created)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create patient");
                Err(e.into())
            }
        }
    }

    /// Look up the patient's appointments, ask for confirmation with the
    /// matching warning, then delete.
    pub fn delete(&mut self, id: RecordId, confirm: &mut impl Confirm) -> Result<DeleteOutcome, ControllerError> {
        let appointments = self.api.patient_appointments(id).map_err(|e| {
            tracing::error!(id, error = %e, "failed to check patient appointments");
            e
        })?;

        let message = if appointments.is_empty() {
            DELETE_PATIENT
        } else {
            DELETE_PATIENT_WITH_APPOINTMENTS
        };
        if !confirm.confirm(message) {
            return Ok(DeleteOutcome::Declined);
        }

        match self.api.delete_patient(id) {
            Ok(()) => {
                tracing::info!(id, "patient deleted");
                self.patients.remove_by_id(id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "failed to delete patient");
                Err(e.into())
            }
        }
    }

    /// Copy the cached record into the edit buffer.
    pub fn begin_edit(&mut self, id: RecordId) -> Option<&mut Patient> {
        let copy = self.patients.get(id)?.clone();
        self.edit_errors = FieldErrors::default();
        self.editing = Some(copy);
        self.editing.as_mut()
    }

    pub fn save_edit(&mut self) -> Result<Patient, ControllerError> {
        let Some(buffer) = self.editing.as_ref() else {
            return Err(ControllerError::NotEditing);
        };
        let form = PatientForm::from(buffer);
        let id = buffer.id;

        self.edit_errors = validate_patient_fields(&form);
        if !self.edit_errors.is_empty() {
            return Err(ControllerError::Validation(self.edit_errors.clone()));
        }

        let update = PatientUpdate {
            name: Some(form.name),
            email: Some(form.email),
            phone: Some(form.phone),
        };
        match self.api.update_patient(id, &update) {
            Ok(updated) => {
                tracing::info!(id, "patient updated");
                self.patients.replace_by_id(updated.clone());
                self.editing = None;
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "failed to update patient");
                Err(e.into())
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.edit_errors = FieldErrors::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::fake::{Call, FakeBackend};
    use crate::validation::{Field, NAME_REQUIRED, PHONE_INVALID};

    fn ana_form() -> PatientForm {
        PatientForm {
            name: "Ana Gomez".into(),
            email: "ana@mail.com".into(),
            phone: "12345678".into(),
        }
    }

    #[test]
    fn mount_loads_the_list() {
        let backend = FakeBackend::default();
        backend.seed_patient("Ana Gomez");
        let controller = PatientsController::mount(&backend);
        assert_eq!(controller.state(), LoadState::Loaded);
        assert_eq!(controller.patients().len(), 1);
    }

    #[test]
    fn failed_load_leaves_list_empty() {
        let backend = FakeBackend::default();
        backend.seed_patient("Ana Gomez");
        backend.fail_next(500);
        let controller = PatientsController::mount(&backend);
        assert!(controller.patients().is_empty());
        assert_eq!(controller.state(), LoadState::Loaded);
    }

    #[test]
    fn failed_reload_keeps_previous_list() {
        let backend = FakeBackend::default();
        backend.seed_patient("Ana Gomez");
        let mut controller = PatientsController::mount(&backend);
        assert_eq!(controller.patients().len(), 1);

        backend.fail_next(500);
        assert!(controller.load().is_err());
        assert_eq!(controller.patients().len(), 1);
        assert_eq!(controller.patients()[0].name, "Ana Gomez");
        assert_eq!(controller.state(), LoadState::Loaded);
    }

    #[test]
    fn invalid_form_never_reaches_backend() {
        let backend = FakeBackend::default();
        let mut controller = PatientsController::new(&backend);
        controller.form_mut().phone = "123".into();

        let err = controller.create().unwrap_err();
        let ControllerError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(errors.get(Field::Phone), Some(PHONE_INVALID));
        assert!(controller.submit_attempted());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn create_appends_and_resets_form() {
        let backend = FakeBackend::default();
        let mut controller = PatientsController::new(&backend);
        *controller.form_mut() = ana_form();

        let created = controller.create().unwrap();
        assert_eq!(controller.patients(), &[created]);
        assert_eq!(controller.form(), &PatientForm::default());
        assert!(!controller.submit_attempted());
        assert!(controller.form_errors().is_empty());
    }

    #[test]
    fn failed_create_keeps_form_and_list() {
        let backend = FakeBackend::default();
        let mut controller = PatientsController::new(&backend);
        *controller.form_mut() = ana_form();
        backend.fail_next(500);

        assert!(matches!(controller.create(), Err(ControllerError::Api(_))));
        assert!(controller.patients().is_empty());
        assert_eq!(controller.form(), &ana_form());
    }

    #[test]
    fn delete_with_appointments_warns_before_deleting() {
        let backend = FakeBackend::default();
        let id = backend.seed_patient("Ana Gomez");
        backend.seed_appointment(id, "2030-01-01", "10:00");
        let mut controller = PatientsController::mount(&backend);

        let mut seen = Vec::new();
        let outcome = controller
            .delete(id, &mut |message: &str| {
                seen.push(message.to_string());
                true
            })
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(seen, vec![DELETE_PATIENT_WITH_APPOINTMENTS.to_string()]);
        assert!(controller.patients().is_empty());
        let calls = backend.calls();
        let asked = calls.iter().position(|c| *c == Call::PatientAppointments(id)).unwrap();
        let deleted = calls.iter().position(|c| *c == Call::DeletePatient(id)).unwrap();
        assert!(asked < deleted);
    }

    #[test]
    fn declined_delete_sends_nothing() {
        let backend = FakeBackend::default();
        let id = backend.seed_patient("Ana Gomez");
        let mut controller = PatientsController::mount(&backend);

        let mut seen = String::new();
        let outcome = controller
            .delete(id, &mut |message: &str| {
                seen = message.to_string();
                false
            })
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(seen, DELETE_PATIENT);
        assert_eq!(controller.patients().len(), 1);
        assert!(!backend.calls().contains(&Call::DeletePatient(id)));
    }

    #[test]
    fn failed_appointment_lookup_aborts_delete() {
        let backend = FakeBackend::default();
        let id = backend.seed_patient("Ana Gomez");
        let mut controller = PatientsController::mount(&backend);
        backend.fail_next(500);

        let mut asked = false;
        let result = controller.delete(id, &mut |_: &str| {
            asked = true;
            true
        });
        assert!(matches!(result, Err(ControllerError::Api(_))));
        assert!(!asked);
        assert_eq!(controller.patients().len(), 1);
    }

    #[test]
    fn edit_replaces_record_by_id() {
        let backend = FakeBackend::default();
        backend.seed_patient("Ana Gomez");
        let id = backend.seed_patient("Luis Perez");
        let mut controller = PatientsController::mount(&backend);

        controller.begin_edit(id).unwrap().phone = "1199887766".into();
        assert_eq!(controller.patients()[1].phone, "12345678");

        let updated = controller.save_edit().unwrap();
        assert_eq!(updated.phone, "1199887766");
        assert_eq!(controller.patients()[1], updated);
        assert!(controller.editing().is_none());
    }

    #[test]
    fn invalid_edit_keeps_buffer_open() {
        let backend = FakeBackend::default();
        let id = backend.seed_patient("Ana Gomez");
        let mut controller = PatientsController::mount(&backend);

        controller.begin_edit(id).unwrap().name = "Ana".into();
        assert!(matches!(controller.save_edit(), Err(ControllerError::Validation(_))));
        assert!(controller.edit_errors().contains(Field::Name));
        assert!(controller.editing().is_some());
        assert!(!backend.calls().iter().any(|c| matches!(c, Call::UpdatePatient(_))));
    }

    #[test]
    fn cancel_edit_discards_buffer() {
        let backend = FakeBackend::default();
        let id = backend.seed_patient("Ana Gomez");
        let mut controller = PatientsController::mount(&backend);

        controller.begin_edit(id).unwrap().name = "Otra Persona".into();
        controller.cancel_edit();
        assert!(controller.editing().is_none());
        assert_eq!(controller.patients()[0].name, "Ana Gomez");
        assert!(matches!(controller.save_edit(), Err(ControllerError::NotEditing)));
    }

    #[test]
    fn begin_edit_unknown_id_is_none() {
        let backend = FakeBackend::default();
        let mut controller = PatientsController::new(&backend);
        assert!(controller.begin_edit(42).is_none());
    }
}

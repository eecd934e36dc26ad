//! Per-entity view state: the cached list, the create form, the edit buffer,
//! and the flows that gate writes on validation.
//!
//! # Design
//! Each controller is the single owner of its list. Calls run to completion
//! on the caller's thread; whichever call finishes last decides what the
//! cache holds. A failed call leaves the cache exactly as it was.

mod appointments;
#[cfg(test)]
mod fake;
mod patients;

use thiserror::Error;

use crate::error::ApiError;
use crate::validation::FieldErrors;

pub use appointments::{AppointmentEdit, AppointmentsController, DELETE_APPOINTMENT};
pub use patients::{PatientsController, DELETE_PATIENT, DELETE_PATIENT_WITH_APPOINTMENTS};

/// Progress of the initial list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// Result of a delete flow that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    /// The form did not pass validation; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no record is being edited")]
    NotEditing,
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

//! Field rules checked before anything is sent to the backend.
//!
//! The predicates are pure. The `validate_*_fields` functions collect one
//! message per failing field into [`FieldErrors`]; an empty map means the
//! form may be submitted.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::Regex;

use crate::datetime::{parse_date, parse_time};
use crate::types::{PatientForm, RecordId};

pub const MAX_NAME_LEN: usize = 30;
pub const MAX_EMAIL_LEN: usize = 30;
pub const MAX_APPOINTMENT_YEAR: i32 = 2050;

pub const NAME_REQUIRED: &str = "El nombre es obligatorio.";
pub const NAME_INVALID: &str = "Debe tener de 2 a 4 palabras, mínimo 3 letras cada una.";
pub const EMAIL_REQUIRED: &str = "El email es obligatorio.";
pub const EMAIL_INVALID: &str = "Formato de email inválido.";
pub const PHONE_REQUIRED: &str = "El teléfono es obligatorio.";
pub const PHONE_INVALID: &str = "Debe tener entre 8 y 15 dígitos.";
pub const DATE_REQUIRED: &str = "La fecha es obligatoria.";
pub const DATE_INVALID: &str = "La fecha no es válida.";
pub const DATE_IN_PAST: &str = "La fecha y hora del turno no pueden ser en el pasado.";
pub const DATE_TOO_FAR: &str = "El año no puede ser mayor a 2050.";
pub const TIME_REQUIRED: &str = "La hora es obligatoria.";
pub const TIME_INVALID: &str = "La hora no es válida.";
pub const REASON_REQUIRED: &str = "El motivo es obligatorio.";
pub const PATIENT_REQUIRED: &str = "Debe seleccionar un paciente.";

static NAME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúñÑ]+$").expect("valid name regex"));

// ASCII classes on purpose: `\w` would accept any Unicode letter.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_.%+-]+@[A-Za-z][A-Za-z0-9_-]*\.[A-Za-z]{2,}$").expect("valid email regex")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{8,15}$").expect("valid phone regex"));

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Date,
    Time,
    Reason,
    Patient,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Date => "date",
            Field::Time => "time",
            Field::Reason => "reason",
            Field::Patient => "patient",
        }
    }
}

/// Field → message map. Empty means valid.
///
/// Each field carries at most one message: the first rule that failed for
/// it. Later failures on the same field are dropped, so callers render one
/// line per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Keeps the first message recorded for a field.
    fn insert(&mut self, field: Field, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.as_str())?;
        }
        Ok(())
    }
}

/// 2 to 4 words of at least 3 Latin letters each, 30 characters at most.
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if !(2..=4).contains(&tokens.len()) {
        return false;
    }
    let tokens_ok = tokens
        .iter()
        .all(|token| token.chars().count() >= 3 && NAME_TOKEN.is_match(token));
    tokens_ok && trimmed.chars().count() <= MAX_NAME_LEN
}

pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email) && email.chars().count() <= MAX_EMAIL_LEN
}

/// Digits only, 8 to 15 of them.
pub fn validate_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

pub fn validate_patient_fields(patient: &PatientForm) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if patient.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    } else if !validate_name(&patient.name) {
        errors.insert(Field::Name, NAME_INVALID);
    }

    if patient.email.trim().is_empty() {
        errors.insert(Field::Email, EMAIL_REQUIRED);
    } else if !validate_email(&patient.email) {
        errors.insert(Field::Email, EMAIL_INVALID);
    }

    if patient.phone.trim().is_empty() {
        errors.insert(Field::Phone, PHONE_REQUIRED);
    } else if !validate_phone(&patient.phone) {
        errors.insert(Field::Phone, PHONE_INVALID);
    }

    errors
}

/// Check an appointment against `now` (local wall-clock time).
///
/// Seconds are ignored on both sides, so an appointment in the current
/// minute is still accepted.
pub fn validate_appointment_fields(
    date: &str,
    time: &str,
    reason: &str,
    patient_id: Option<RecordId>,
    now: NaiveDateTime,
) -> FieldErrors {
    let mut errors = FieldErrors::default();

    let parsed_date = if date.trim().is_empty() {
        errors.insert(Field::Date, DATE_REQUIRED);
        None
    } else {
        parse_date(date).map_err(|_| errors.insert(Field::Date, DATE_INVALID)).ok()
    };

    let parsed_time = if time.trim().is_empty() {
        errors.insert(Field::Time, TIME_REQUIRED);
        None
    } else {
        parse_time(time).map_err(|_| errors.insert(Field::Time, TIME_INVALID)).ok()
    };

    if reason.trim().is_empty() {
        errors.insert(Field::Reason, REASON_REQUIRED);
    }
    if patient_id.is_none() {
        errors.insert(Field::Patient, PATIENT_REQUIRED);
    }

    if let Some(date) = parsed_date {
        if date.year() > MAX_APPOINTMENT_YEAR {
            errors.insert(Field::Date, DATE_TOO_FAR);
        }
        if let Some(time) = parsed_time {
            if date.and_time(time) < truncate_to_minute(now) {
                errors.insert(Field::Date, DATE_IN_PAST);
            }
        }
    }

    errors
}

fn truncate_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .date()
        .and_hms_opt(instant.hour(), instant.minute(), 0)
        .unwrap_or(instant)
}

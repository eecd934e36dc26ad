use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnos: Option<Vec<Appointment>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: i64,
    pub fecha: String,
    pub hora: String,
    pub razon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paciente: Option<Patient>,
}

#[derive(Deserialize)]
pub struct NewPatient {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
}

#[derive(Deserialize)]
pub struct PatientPatch {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
}

#[derive(Deserialize)]
pub struct NewAppointment {
    pub fecha: String,
    pub hora: String,
    pub razon: String,
    #[serde(rename = "pacienteId")]
    pub paciente_id: i64,
}

#[derive(Deserialize)]
pub struct AppointmentPatch {
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub razon: Option<String>,
    #[serde(rename = "pacienteId")]
    pub paciente_id: Option<i64>,
}

#[derive(Clone, Debug)]
struct PatientRow {
    nombre: String,
    email: String,
    telefono: String,
}

#[derive(Clone, Debug)]
struct AppointmentRow {
    fecha: String,
    hora: String,
    razon: String,
    paciente_id: i64,
}

/// In-memory tables with sequential ids, the way the real backend assigns them.
#[derive(Debug, Default)]
pub struct Store {
    patients: BTreeMap<i64, PatientRow>,
    appointments: BTreeMap<i64, AppointmentRow>,
    last_patient_id: i64,
    last_appointment_id: i64,
}

impl Store {
    fn patient(&self, id: i64, with_appointments: bool) -> Option<Patient> {
        let row = self.patients.get(&id)?;
        let turnos = with_appointments.then(|| self.appointments_of(id, false));
        Some(Patient {
            id,
            nombre: row.nombre.clone(),
            email: row.email.clone(),
            telefono: row.telefono.clone(),
            turnos,
        })
    }

    fn appointment(&self, id: i64) -> Option<Appointment> {
        let row = self.appointments.get(&id)?;
        Some(self.appointment_view(id, row, true))
    }

    fn appointment_view(&self, id: i64, row: &AppointmentRow, with_patient: bool) -> Appointment {
        let paciente = if with_patient {
            self.patient(row.paciente_id, false)
        } else {
            None
        };
        Appointment {
            id,
            fecha: row.fecha.clone(),
            hora: row.hora.clone(),
            razon: row.razon.clone(),
            paciente,
        }
    }

    fn appointments_of(&self, patient_id: i64, with_patient: bool) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|(_, row)| row.paciente_id == patient_id)
            .map(|(id, row)| self.appointment_view(*id, row, with_patient))
            .collect()
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    cold_start_remaining: Arc<AtomicU32>,
}

/// Router with no simulated cold start.
pub fn app() -> Router {
    app_with_cold_start(0)
}

/// Router whose first `requests` calls are answered with 503, like a hosted
/// backend that is still waking up.
pub fn app_with_cold_start(requests: u32) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        cold_start_remaining: Arc::new(AtomicU32::new(requests)),
    };
    Router::new()
        .route("/pacientes", get(list_patients).post(create_patient))
        .route(
            "/pacientes/{id}",
            get(get_patient)
                .put(update_patient)
                .patch(update_patient)
                .delete(delete_patient),
        )
        .route("/patients/{id}/appointments", get(patient_appointments))
        .route("/turnos", get(list_appointments).post(create_appointment))
        .route(
            "/turnos/{id}",
            get(get_appointment)
                .put(update_appointment)
                .patch(update_appointment)
                .delete(delete_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), cold_start))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_cold_start(listener, 0).await
}

pub async fn run_with_cold_start(listener: TcpListener, requests: u32) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_cold_start(requests)).await
}

async fn cold_start(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let warming = state
        .cold_start_remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if warming {
        tracing::debug!(uri = %request.uri(), "rejecting request during cold start");
        return (StatusCode::SERVICE_UNAVAILABLE, "service unavailable").into_response();
    }
    next.run(request).await
}

async fn list_patients(State(state): State<AppState>) -> Json<Vec<Patient>> {
    let store = state.db.read().await;
    let patients = store
        .patients
        .keys()
        .filter_map(|id| store.patient(*id, true))
        .collect();
    Json(patients)
}

async fn create_patient(
    State(state): State<AppState>,
    Json(input): Json<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), StatusCode> {
    let mut store = state.db.write().await;
    store.last_patient_id += 1;
    let id = store.last_patient_id;
    store.patients.insert(
        id,
        PatientRow {
            nombre: input.nombre,
            email: input.email,
            telefono: input.telefono,
        },
    );
    let patient = store.patient(id, true).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, StatusCode> {
    let store = state.db.read().await;
    store.patient(id, true).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PatientPatch>,
) -> Result<Json<Patient>, StatusCode> {
    let mut store = state.db.write().await;
    let row = store.patients.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(nombre) = input.nombre {
        row.nombre = nombre;
    }
    if let Some(email) = input.email {
        row.email = email;
    }
    if let Some(telefono) = input.telefono {
        row.telefono = telefono;
    }
    store.patient(id, true).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = state.db.write().await;
    store.patients.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.appointments.retain(|_, row| row.paciente_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn patient_appointments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Appointment>>, StatusCode> {
    let store = state.db.read().await;
    if !store.patients.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(store.appointments_of(id, true)))
}

async fn list_appointments(State(state): State<AppState>) -> Json<Vec<Appointment>> {
    let store = state.db.read().await;
    let appointments = store
        .appointments
        .iter()
        .map(|(id, row)| store.appointment_view(*id, row, true))
        .collect();
    Json(appointments)
}

async fn create_appointment(
    State(state): State<AppState>,
    Json(input): Json<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), StatusCode> {
    let mut store = state.db.write().await;
    if !store.patients.contains_key(&input.paciente_id) {
        return Err(StatusCode::BAD_REQUEST);
    }
    store.last_appointment_id += 1;
    let id = store.last_appointment_id;
    store.appointments.insert(
        id,
        AppointmentRow {
            fecha: input.fecha,
            hora: input.hora,
            razon: input.razon,
            paciente_id: input.paciente_id,
        },
    );
    let appointment = store.appointment(id).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, StatusCode> {
    let store = state.db.read().await;
    store.appointment(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AppointmentPatch>,
) -> Result<Json<Appointment>, StatusCode> {
    let mut store = state.db.write().await;
    if let Some(patient_id) = input.paciente_id {
        if !store.patients.contains_key(&patient_id) {
            return Err(StatusCode::BAD_REQUEST);
        }
    }
    let row = store.appointments.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(fecha) = input.fecha {
        row.fecha = fecha;
    }
    if let Some(hora) = input.hora {
        row.hora = hora;
    }
    if let Some(razon) = input.razon {
        row.razon = razon;
    }
    if let Some(patient_id) = input.paciente_id {
        row.paciente_id = patient_id;
    }
    store.appointment(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = state.db.write().await;
    store
        .appointments
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

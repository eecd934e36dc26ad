//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use clinic_core::{
    ApiError, Appointment, AppointmentUpdate, ClinicClient, HttpMethod, HttpRequest, HttpResponse, NewAppointment,
    NewPatient, Patient, PatientUpdate, RecordId,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ClinicClient {
    ClinicClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn input<T: DeserializeOwned>(case: &Value) -> T {
    serde_json::from_value(case["input"].clone()).unwrap()
}

fn input_id(case: &Value) -> RecordId {
    case["input_id"].as_i64().unwrap()
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match req.body.as_deref() {
        Some(body) => {
            let req_body: Value = serde_json::from_str(body).unwrap();
            assert_eq!(req_body, expected["body"], "{name}: body");
        }
        None => assert!(expected["body"].is_null(), "{name}: body should be None"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Compare a parse result with `expected_result` or `expected_error`.
fn check_result<T>(name: &str, case: &Value, result: Result<T, ApiError>)
where
    T: DeserializeOwned + PartialEq + std::fmt::Debug,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        match expected_error.as_str().unwrap() {
            "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
            "ServiceUnavailable" => assert_eq!(err.status(), Some(503), "{name}: expected 503"),
            other => panic!("{name}: unknown expected_error: {other}"),
        }
        return;
    }
    let value = result.unwrap();
    if let Some(expected) = case.get("expected_result") {
        let expected: T = serde_json::from_value(expected.clone()).unwrap();
        assert_eq!(value, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

#[test]
fn patient_test_vectors() {
    let raw = include_str!("../../test-vectors/patients.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];
        let response = simulated_response(case);

        match case["operation"].as_str().unwrap() {
            "list" => {
                check_request(name, &c.build_list_patients(), expected_req);
                check_result::<Vec<Patient>>(name, case, c.parse_list_patients(response));
            }
            "create" => {
                let req = c.build_create_patient(&input::<NewPatient>(case)).unwrap();
                check_request(name, &req, expected_req);
                check_result::<Patient>(name, case, c.parse_create_patient(response));
            }
            "update" => {
                let req = c
                    .build_update_patient(input_id(case), &input::<PatientUpdate>(case))
                    .unwrap();
                check_request(name, &req, expected_req);
                check_result::<Patient>(name, case, c.parse_update_patient(response));
            }
            "appointments" => {
                check_request(name, &c.build_patient_appointments(input_id(case)), expected_req);
                check_result::<Vec<Appointment>>(name, case, c.parse_patient_appointments(response));
            }
            "delete" => {
                check_request(name, &c.build_delete_patient(input_id(case)), expected_req);
                check_result::<()>(name, case, c.parse_delete_patient(response));
            }
            other => panic!("{name}: unknown operation {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[test]
fn appointment_test_vectors() {
    let raw = include_str!("../../test-vectors/appointments.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];
        let response = simulated_response(case);

        match case["operation"].as_str().unwrap() {
            "list" => {
                check_request(name, &c.build_list_appointments(), expected_req);
                check_result::<Vec<Appointment>>(name, case, c.parse_list_appointments(response));
            }
            "create" => {
                let req = c.build_create_appointment(&input::<NewAppointment>(case)).unwrap();
                check_request(name, &req, expected_req);
                check_result::<Appointment>(name, case, c.parse_create_appointment(response));
            }
            "update" => {
                let req = c
                    .build_update_appointment(input_id(case), &input::<AppointmentUpdate>(case))
                    .unwrap();
                check_request(name, &req, expected_req);
                check_result::<Appointment>(name, case, c.parse_update_appointment(response));
            }
            "delete" => {
                check_request(name, &c.build_delete_appointment(input_id(case)), expected_req);
                check_result::<()>(name, case, c.parse_delete_appointment(response));
            }
            other => panic!("{name}: unknown operation {other}"),
        }
    }
}

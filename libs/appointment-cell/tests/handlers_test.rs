// libs/appointment-cell/tests/handlers_test.rs
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use appointment_cell::services::{BookingLedger, SlotCalendar};
use shared_database::{ClinicStore, InMemoryStore};
use shared_models::clinic::{DoctorId, NewDoctor};
use shared_utils::test_utils::TestPrincipal;

fn clinic_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

async fn create_test_app() -> (Router, DoctorId) {
    let store: Arc<dyn ClinicStore> = Arc::new(InMemoryStore::new());
    let ledger = Arc::new(BookingLedger::new(store));

    let doctor = ledger.store().insert_doctor(NewDoctor {
        name: "Rahul".to_string(),
        gender: "Male".to_string(),
        experience_years: 5,
        specialization: "General".to_string(),
    }).await.unwrap();
    ledger
        .create_slots(doctor.id, &SlotCalendar::new().slot_times(clinic_day()))
        .await
        .unwrap();

    (appointment_routes(ledger), doctor.id)
}

fn booking_request(body: Value) -> Request<Body> {
    TestPrincipal::patient(Request::builder().method("POST").uri("/"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_book_then_rebook_returns_conflict_outcome() {
    let (app, doctor_id) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(booking_request(json!({
            "patient_name": "Vinesh",
            "doctor_id": doctor_id,
            "time": "2026-10-18 09:30"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    assert_eq!(json["status"], "confirmed");
    assert_eq!(json["appointment"]["time"], "2026-10-18 09:30");
    assert_eq!(json["message"], "Appointment successfully booked at 2026-10-18 09:30 with Dr. Rahul");

    let response = app
        .oneshot(booking_request(json!({
            "patient_name": "X",
            "doctor_id": doctor_id,
            "time": "2026-10-18T09:30:00"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = read_json(response).await;
    assert_eq!(json["status"], "already_booked");
    assert_eq!(json["message"], "This time slot is already booked.");
}

#[tokio::test]
async fn test_unknown_slot_is_not_found() {
    let (app, doctor_id) = create_test_app().await;

    let response = app
        .oneshot(booking_request(json!({
            "patient_name": "Naga",
            "doctor_id": doctor_id,
            "time": "2026-10-18 18:00"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_patient_name_is_bad_request() {
    let (app, doctor_id) = create_test_app().await;

    let response = app
        .oneshot(booking_request(json!({
            "patient_name": "",
            "doctor_id": doctor_id,
            "time": "2026-10-18 10:00"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Patient name must not be empty");
}

#[tokio::test]
async fn test_booking_requires_gateway_identity() {
    let (app, doctor_id) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(json!({
            "patient_name": "Nani",
            "doctor_id": doctor_id,
            "time": "2026-10-18 12:00"
        }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

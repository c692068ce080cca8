// libs/schedule-cell/tests/handlers_test.rs
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use appointment_cell::services::BookingLedger;
use doctor_cell::models::RegisterDoctorRequest;
use doctor_cell::services::DirectoryService;
use schedule_cell::router::schedule_routes;
use schedule_cell::services::ScheduleQueryService;
use shared_database::{ClinicStore, InMemoryStore};
use shared_models::auth::Principal;
use shared_models::clinic::{DoctorId, SlotTime};
use shared_utils::test_utils::TestPrincipal;

async fn create_test_app() -> (Router, DoctorId, DoctorId) {
    let store: Arc<dyn ClinicStore> = Arc::new(InMemoryStore::new());
    let ledger = Arc::new(BookingLedger::new(store));
    let directory = Arc::new(DirectoryService::new(ledger.clone()));
    let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let mut ids = Vec::new();
    for name in ["Prashanth", "Rani"] {
        let request = RegisterDoctorRequest {
            name: name.to_string(),
            specialization: "Ortho".to_string(),
            gender: "Female".to_string(),
            experience_years: 1,
        };
        ids.push(directory.register_on(request, day).await.unwrap().id);
    }

    let time = SlotTime::on(day, 10, 30).unwrap();
    ledger.book(ids[1], time, "Naga").await.unwrap();

    let schedule = Arc::new(ScheduleQueryService::new(ledger, directory));
    (schedule_routes(schedule), ids[0], ids[1])
}

fn get_as(principal: &Principal, uri: &str) -> Request<Body> {
    TestPrincipal::apply(Request::builder().method("GET").uri(uri), principal)
        .body(Body::empty())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_patient_sees_free_slots() {
    let (app, _, rani) = create_test_app().await;

    let response = app
        .oneshot(get_as(&Principal::patient(), &format!("/doctors/{}/free", rani)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["total"], 15);
    assert_eq!(json["doctor"], "2 Dr. Rani, Ortho");
    assert_eq!(json["free_slots"][0], "2026-10-18 09:00");
}

#[tokio::test]
async fn test_doctor_sees_own_appointments() {
    let (app, _, rani) = create_test_app().await;

    let response = app
        .oneshot(get_as(&Principal::doctor(rani), &format!("/doctors/{}/booked", rani)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["appointments"][0]["patient_name"], "Naga");
    assert_eq!(json["appointments"][0]["time"], "2026-10-18 10:30");
}

#[tokio::test]
async fn test_doctor_cannot_see_colleague_appointments() {
    let (app, prashanth, rani) = create_test_app().await;

    let response = app
        .oneshot(get_as(&Principal::doctor(prashanth), &format!("/doctors/{}/booked", rani)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_clinic_wide_list_is_admin_only() {
    let (app, _, _) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(get_as(&Principal::patient(), "/appointments"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get_as(&Principal::admin(), "/appointments"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["appointments"][0]["doctor_name"], "Rani");
    assert_eq!(json["appointments"][0]["doctor_label"], "2 Dr. Rani, Ortho");
}

#[tokio::test]
async fn test_views_require_identity() {
    let (app, prashanth, _) = create_test_app().await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/doctors/{}/free", prashanth))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

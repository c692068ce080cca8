use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::BookingLedger;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::DirectoryService;
use schedule_cell::router::schedule_routes;
use schedule_cell::services::ScheduleQueryService;
use shared_config::ClinicProfile;
use shared_database::ClinicStore;

/// Services wired over one store.
pub struct ClinicServices {
    pub ledger: Arc<BookingLedger>,
    pub directory: Arc<DirectoryService>,
    pub schedule: Arc<ScheduleQueryService>,
    pub profile: Arc<ClinicProfile>,
}

impl ClinicServices {
    pub fn new(store: Arc<dyn ClinicStore>, profile: ClinicProfile) -> Self {
        let ledger = Arc::new(BookingLedger::new(store));
        let directory = Arc::new(DirectoryService::new(ledger.clone()));
        let schedule = Arc::new(ScheduleQueryService::new(ledger.clone(), directory.clone()));

        Self {
            ledger,
            directory,
            schedule,
            profile: Arc::new(profile),
        }
    }
}

async fn greeting(State(profile): State<Arc<ClinicProfile>>) -> String {
    profile.greeting()
}

async fn clinic_profile(State(profile): State<Arc<ClinicProfile>>) -> Json<Value> {
    Json(json!({
        "name": profile.name,
        "short_name": profile.short_name,
        "address": profile.address,
        "owner": profile.owner,
        "greeting": profile.greeting(),
        "services": profile.services
    }))
}

pub fn create_router(services: &ClinicServices) -> Router {
    Router::new()
        .route("/", get(greeting))
        .route("/clinic", get(clinic_profile))
        .with_state(services.profile.clone())
        .nest("/doctors", doctor_routes(services.directory.clone()))
        .nest("/appointments", appointment_routes(services.ledger.clone()))
        .nest("/schedule", schedule_routes(services.schedule.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use shared_database::InMemoryStore;
    use shared_utils::test_utils::TestPrincipal;

    fn create_test_app() -> Router {
        let services = ClinicServices::new(Arc::new(InMemoryStore::new()), ClinicProfile::default());
        create_router(&services)
    }

    async fn read_body(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_root_greets_with_clinic_name() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, b"Welcome to Harsha Multi Speciality Hospital");
    }

    #[tokio::test]
    async fn test_clinic_profile_lists_services() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/clinic").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json: Value = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(json["short_name"], "Harsha Hospital");
        assert_eq!(json["services"][0], "Orthopaedic");
    }

    #[tokio::test]
    async fn test_register_then_book_through_nested_routes() {
        let app = create_test_app();

        let register = TestPrincipal::admin(Request::builder().method("POST").uri("/doctors"))
            .header("content-type", "application/json")
            .body(Body::from(json!({
                "name": "Rahul",
                "specialization": "General",
                "gender": "Male",
                "experience_years": 5
            }).to_string()))
            .unwrap();
        let response = app.clone().oneshot(register).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let free = TestPrincipal::patient(Request::builder().uri("/schedule/doctors/1/free"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(free).await.unwrap();
        let json: Value = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(json["total"], 16);
        let first_slot = json["free_slots"][0].clone();

        let book = TestPrincipal::patient(Request::builder().method("POST").uri("/appointments"))
            .header("content-type", "application/json")
            .body(Body::from(json!({
                "patient_name": "Vinesh",
                "doctor_id": 1,
                "time": first_slot
            }).to_string()))
            .unwrap();
        let response = app.oneshot(book).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

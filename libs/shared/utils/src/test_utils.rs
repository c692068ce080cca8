use std::sync::Arc;

use axum::http::request::Builder;
use serde_json::json;

use shared_config::{AppConfig, ClinicProfile};
use shared_models::auth::{Principal, Role};

use crate::extractor::{DOCTOR_ID_HEADER, ROLE_HEADER};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub service_token: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            service_token: String::new(),
        }
    }
}

impl TestConfig {
    /// Config pointing at a wiremock server.
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    /// Config with no remote store, so `connect_store` falls back to memory.
    pub fn in_memory() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            service_token: String::new(),
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_token: self.service_token.clone(),
            bind_addr: "127.0.0.1:0".to_string(),
            seed_demo_roster: false,
            clinic: ClinicProfile::default(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Gateway identity attached to test requests.
pub struct TestPrincipal;

impl TestPrincipal {
    pub fn apply(builder: Builder, principal: &Principal) -> Builder {
        let builder = builder.header(ROLE_HEADER, principal.role.to_string());
        match (principal.role, principal.doctor_id) {
            (Role::Doctor, Some(doctor_id)) => builder.header(DOCTOR_ID_HEADER, doctor_id.to_string()),
            _ => builder,
        }
    }

    pub fn admin(builder: Builder) -> Builder {
        Self::apply(builder, &Principal::admin())
    }

    pub fn patient(builder: Builder) -> Builder {
        Self::apply(builder, &Principal::patient())
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_row(id: i64, name: &str, specialization: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "gender": "Male",
            "experience_years": 5,
            "specialization": specialization
        })
    }

    pub fn slot_row(id: i64, doctor_id: i64, time_slot: &str, patient_name: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "time_slot": time_slot,
            "patient_name": patient_name,
            "is_booked": patient_name.is_some()
        })
    }

    pub fn booked_row(doctor_id: i64, doctor_name: &str, time_slot: &str, patient_name: &str) -> serde_json::Value {
        json!({
            "time_slot": time_slot,
            "patient_name": patient_name,
            "doctor_id": doctor_id,
            "doctors": { "name": doctor_name }
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code,
            "details": null,
            "hint": null
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.supabase_anon_key, "test-anon-key");
        assert!(app_config.is_configured());
        assert!(!TestConfig::in_memory().to_app_config().is_configured());
    }

    #[test]
    fn test_principal_headers() {
        let request = TestPrincipal::apply(Request::builder(), &Principal::doctor(shared_models::DoctorId(3)))
            .body(())
            .unwrap();

        assert_eq!(request.headers()[ROLE_HEADER], "doctor");
        assert_eq!(request.headers()[DOCTOR_ID_HEADER], "3");
    }

    #[test]
    fn test_slot_row_marks_booking() {
        let free = MockSupabaseResponses::slot_row(1, 1, "2026-10-18T09:00:00", None);
        let booked = MockSupabaseResponses::slot_row(2, 1, "2026-10-18T09:30:00", Some("Vinesh"));

        assert_eq!(free["is_booked"], false);
        assert_eq!(booked["is_booked"], true);
        assert_eq!(booked["patient_name"], "Vinesh");
    }
}

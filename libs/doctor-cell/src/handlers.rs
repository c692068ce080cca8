use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::Principal;
use shared_models::clinic::DoctorId;
use shared_models::error::AppError;
use shared_utils::extractor::require_admin;

use crate::models::{DoctorError, DoctorLabel, RegisterDoctorRequest};
use crate::services::DirectoryService;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub name: String,
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(directory): State<Arc<DirectoryService>>,
) -> Result<Json<Value>, AppError> {
    let labels = directory.list_all().await?;
    let doctors: Vec<DoctorLabel> = labels
        .into_iter()
        .map(|(id, label)| DoctorLabel { id, label })
        .collect();

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn lookup_doctor(
    State(directory): State<Arc<DirectoryService>>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Value>, AppError> {
    let id = directory
        .resolve_id_by_name(&query.name)
        .await?
        .ok_or_else(|| DoctorError::NotFound(format!("name {}", query.name)))?;

    Ok(Json(json!({ "id": id, "name": query.name })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(directory): State<Arc<DirectoryService>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory.get(DoctorId(doctor_id)).await?;
    let label = doctor.display_label();

    Ok(Json(json!({
        "doctor": doctor,
        "label": label
    })))
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn register_doctor(
    State(directory): State<Arc<DirectoryService>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<RegisterDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_admin(&principal)?;
    debug!("Admin registering doctor {}", request.name);

    let doctor = directory.register(request).await?;
    let label = doctor.display_label();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "doctor": doctor,
            "label": label
        })),
    ))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(directory): State<Arc<DirectoryService>>,
    Extension(principal): Extension<Principal>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_admin(&principal)?;

    directory.delete(&name).await?;
    Ok(Json(json!({ "deleted": name })))
}

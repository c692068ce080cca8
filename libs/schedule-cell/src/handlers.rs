use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::Principal;
use shared_models::clinic::DoctorId;
use shared_models::error::AppError;
use shared_utils::extractor::{require_admin, require_doctor_or_admin};

use crate::services::ScheduleQueryService;

#[axum::debug_handler]
pub async fn get_free_slots(
    State(schedule): State<Arc<ScheduleQueryService>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let view = schedule.free_slots_for(DoctorId(doctor_id)).await?;
    let total = view.free_slots.len();

    Ok(Json(json!({
        "doctor_id": view.doctor_id,
        "doctor": view.doctor_label,
        "free_slots": view.free_slots,
        "total": total
    })))
}

#[axum::debug_handler]
pub async fn get_booked_appointments(
    State(schedule): State<Arc<ScheduleQueryService>>,
    Extension(principal): Extension<Principal>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = DoctorId(doctor_id);
    require_doctor_or_admin(&principal, doctor_id)?;

    let view = schedule.booked_appointments_for(doctor_id).await?;
    let total = view.appointments.len();

    Ok(Json(json!({
        "doctor_id": view.doctor_id,
        "doctor": view.doctor_label,
        "appointments": view.appointments,
        "total": total
    })))
}

#[axum::debug_handler]
pub async fn get_clinic_appointments(
    State(schedule): State<Arc<ScheduleQueryService>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, AppError> {
    require_admin(&principal)?;

    let appointments = schedule.all_clinic_appointments().await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

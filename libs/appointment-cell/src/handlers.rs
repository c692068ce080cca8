// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::Principal;
use shared_models::error::AppError;

use crate::models::{BookingRequest, BookingResult};
use crate::services::BookingLedger;

/// Book a free slot. A slot that is already taken answers 409 with
/// `status: already_booked`; that is a normal outcome, not a failure.
#[axum::debug_handler]
pub async fn book_appointment(
    State(ledger): State<Arc<BookingLedger>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    debug!("{} is booking doctor {} at {}", principal.role, request.doctor_id, request.time);

    let result = ledger.book_request(request).await?;

    let response = match result {
        BookingResult::Confirmed(confirmation) => (
            StatusCode::CREATED,
            Json(json!({
                "status": "confirmed",
                "message": confirmation.message(),
                "appointment": confirmation
            })),
        ),
        BookingResult::AlreadyBooked => (
            StatusCode::CONFLICT,
            Json(json!({
                "status": "already_booked",
                "message": BookingResult::ALREADY_BOOKED_MESSAGE
            })),
        ),
    };

    Ok(response)
}

// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::clinic::{BookedSlotWithDoctor, DoctorId, SlotId, SlotTime};
use shared_models::error::AppError;

// ==============================================================================
// BOOKING
// ==============================================================================

/// Transient booking attempt; consumed by `BookingLedger::book_request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub patient_name: String,
    pub doctor_id: DoctorId,
    pub time: SlotTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub slot_id: SlotId,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub time: SlotTime,
    pub patient_name: String,
}

impl BookingConfirmation {
    pub fn message(&self) -> String {
        format!(
            "Appointment successfully booked at {} with Dr. {}",
            self.time, self.doctor_name
        )
    }
}

/// Outcome of a booking attempt. `AlreadyBooked` is expected, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingResult {
    Confirmed(BookingConfirmation),
    AlreadyBooked,
}

impl BookingResult {
    pub const ALREADY_BOOKED_MESSAGE: &'static str = "This time slot is already booked.";

    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingResult::Confirmed(_))
    }
}

// ==============================================================================
// VIEWS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedAppointment {
    pub time: SlotTime,
    pub patient_name: String,
}

/// Clinic-wide booked appointment with its doctor's name.
pub type ClinicAppointment = BookedSlotWithDoctor;

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("No slot at {time} for doctor {doctor_id}")]
    SlotNotFound { doctor_id: DoctorId, time: SlotTime },

    #[error("Invalid booking request: {0}")]
    InvalidRequest(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::SlotNotFound { .. } => AppError::NotFound(err.to_string()),
            SchedulingError::InvalidRequest(message) => AppError::ValidationError(message),
            SchedulingError::Persistence(store_error) => match store_error {
                StoreError::Conflict(message) => AppError::Conflict(message),
                other => AppError::Unavailable(other.to_string()),
            },
        }
    }
}

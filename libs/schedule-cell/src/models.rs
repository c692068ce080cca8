use serde::{Deserialize, Serialize};
use thiserror::Error;

use appointment_cell::models::{BookedAppointment, SchedulingError};
use doctor_cell::models::DoctorError;
use shared_models::clinic::{DoctorId, SlotTime};
use shared_models::error::AppError;

/// Free slots of one doctor. `doctor_label` is `None` for an unknown id,
/// which also has no slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSlotsView {
    pub doctor_id: DoctorId,
    pub doctor_label: Option<String>,
    pub free_slots: Vec<SlotTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorAppointmentsView {
    pub doctor_id: DoctorId,
    pub doctor_label: Option<String>,
    pub appointments: Vec<BookedAppointment>,
}

/// One row of the clinic-wide appointment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicAppointmentView {
    pub time: SlotTime,
    pub patient_name: String,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub doctor_label: String,
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Directory(#[from] DoctorError),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Scheduling(e) => e.into(),
            ScheduleError::Directory(e) => e.into(),
        }
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use appointment_cell::models::SchedulingError;
use shared_database::StoreError;
use shared_models::clinic::NewDoctor;
use shared_models::error::AppError;

pub use shared_models::clinic::{Doctor, DoctorId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub experience_years: u32,
}

impl RegisterDoctorRequest {
    /// Trims text fields and rejects a blank name or specialization.
    pub fn validate(self) -> Result<NewDoctor, DoctorError> {
        let name = self.name.trim().to_string();
        let specialization = self.specialization.trim().to_string();

        if name.is_empty() {
            return Err(DoctorError::InvalidRequest("Doctor name must not be empty".to_string()));
        }
        if specialization.is_empty() {
            return Err(DoctorError::InvalidRequest(
                "Specialization must not be empty".to_string(),
            ));
        }

        Ok(NewDoctor {
            name,
            gender: self.gender.trim().to_string(),
            experience_years: self.experience_years,
            specialization,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorLabel {
    pub id: DoctorId,
    pub label: String,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor named {0} already exists, choose a different name")]
    DuplicateName(String),

    #[error("Doctor not found: {0}")]
    NotFound(String),

    #[error("Deleting a doctor would orphan existing appointments, hence deletion is not supported")]
    UnsupportedOperation,

    #[error("Invalid doctor request: {0}")]
    InvalidRequest(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            DoctorError::NotFound(_) => AppError::NotFound(err.to_string()),
            DoctorError::UnsupportedOperation => AppError::Unsupported(err.to_string()),
            DoctorError::InvalidRequest(message) => AppError::ValidationError(message),
            DoctorError::Persistence(store_error) => AppError::Unavailable(store_error.to_string()),
        }
    }
}

impl From<SchedulingError> for DoctorError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Persistence(store_error) => DoctorError::Persistence(store_error),
            other => DoctorError::InvalidRequest(other.to_string()),
        }
    }
}

use async_trait::async_trait;
use thiserror::Error;
use tracing::error;

use shared_models::clinic::{
    BookedSlotWithDoctor, Doctor, DoctorId, NewDoctor, Slot, SlotFilter, SlotTime,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Conflicting write: {0}")]
    Conflict(String),

    #[error("Store rejected request ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Malformed store response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result of trying to move a slot from free to booked.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    Claimed(Slot),
    AlreadyBooked,
    Missing,
}

/// Persistence boundary for doctors and their slots.
///
/// Implementations must make `claim_slot` a single atomic check-and-set per
/// `(doctor_id, time)` key and `insert_slots` all-or-nothing. Every slot
/// listing is ordered by time ascending.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    /// Inserts a doctor and assigns the next id. Fails with `Conflict` when the
    /// name is taken.
    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError>;

    /// Removes a doctor and any of its slots. Only used to roll back a
    /// registration whose slot provisioning failed.
    async fn discard_doctor(&self, doctor_id: DoctorId) -> Result<(), StoreError>;

    async fn find_doctor(&self, doctor_id: DoctorId) -> Result<Option<Doctor>, StoreError>;

    async fn find_doctor_by_name(&self, name: &str) -> Result<Option<Doctor>, StoreError>;

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError>;

    async fn insert_slots(
        &self,
        doctor_id: DoctorId,
        times: &[SlotTime],
    ) -> Result<Vec<Slot>, StoreError>;

    /// Inserts a doctor together with its slots, both or neither.
    ///
    /// The default compensates a failed slot batch with `discard_doctor`;
    /// backends with server-side transactions override it.
    async fn insert_doctor_with_slots(
        &self,
        doctor: NewDoctor,
        times: &[SlotTime],
    ) -> Result<(Doctor, Vec<Slot>), StoreError> {
        let doctor = self.insert_doctor(doctor).await?;

        match self.insert_slots(doctor.id, times).await {
            Ok(slots) => Ok((doctor, slots)),
            Err(e) => {
                error!("Slot batch for doctor {} failed, discarding it: {}", doctor.id, e);
                if let Err(rollback) = self.discard_doctor(doctor.id).await {
                    error!("Discarding doctor {} failed: {}", doctor.id, rollback);
                }
                Err(e)
            }
        }
    }

    async fn claim_slot(
        &self,
        doctor_id: DoctorId,
        time: SlotTime,
        patient_name: &str,
    ) -> Result<ClaimOutcome, StoreError>;

    async fn slots_for_doctor(
        &self,
        doctor_id: DoctorId,
        filter: SlotFilter,
    ) -> Result<Vec<Slot>, StoreError>;

    async fn booked_slots_with_doctors(&self) -> Result<Vec<BookedSlotWithDoctor>, StoreError>;
}

// libs/appointment-cell/src/services/ledger.rs
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use shared_database::{ClaimOutcome, ClinicStore, StoreError};
use shared_models::clinic::{Doctor, DoctorId, NewDoctor, Slot, SlotFilter, SlotTime};

use crate::models::{
    BookedAppointment, BookingConfirmation, BookingRequest, BookingResult, ClinicAppointment,
    SchedulingError,
};

/// Sole writer of slot state.
pub struct BookingLedger {
    store: Arc<dyn ClinicStore>,
}

impl BookingLedger {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ClinicStore> {
        &self.store
    }

    /// Inserts `times` as free slots for `doctor_id` in one atomic batch.
    pub async fn create_slots(
        &self,
        doctor_id: DoctorId,
        times: &[SlotTime],
    ) -> Result<Vec<Slot>, SchedulingError> {
        debug!("Creating {} slots for doctor {}", times.len(), doctor_id);

        let slots = self.store.insert_slots(doctor_id, times).await.map_err(|e| {
            error!("Slot batch for doctor {} failed: {}", doctor_id, e);
            SchedulingError::Persistence(e)
        })?;

        Ok(slots)
    }

    /// Stores a new doctor together with its free slots, both or neither.
    pub async fn provision_doctor(
        &self,
        doctor: NewDoctor,
        times: &[SlotTime],
    ) -> Result<(Doctor, Vec<Slot>), SchedulingError> {
        debug!("Provisioning doctor {} with {} slots", doctor.name, times.len());

        let (doctor, slots) = self.store.insert_doctor_with_slots(doctor, times).await?;
        Ok((doctor, slots))
    }

    /// Books the slot at `time` with `doctor_id` for `patient_name`.
    ///
    /// Concurrent calls for the same slot are serialized by the store's
    /// atomic claim: exactly one sees `Confirmed`, the rest `AlreadyBooked`.
    pub async fn book(
        &self,
        doctor_id: DoctorId,
        time: SlotTime,
        patient_name: &str,
    ) -> Result<BookingResult, SchedulingError> {
        let patient_name = patient_name.trim();
        if patient_name.is_empty() {
            return Err(SchedulingError::InvalidRequest(
                "Patient name must not be empty".to_string(),
            ));
        }

        let Some(doctor) = self.store.find_doctor(doctor_id).await? else {
            debug!("Booking rejected, doctor {} is not registered", doctor_id);
            return Err(SchedulingError::SlotNotFound { doctor_id, time });
        };

        match self.store.claim_slot(doctor_id, time, patient_name).await? {
            ClaimOutcome::Claimed(slot) => {
                info!("Slot {} booked with doctor {} at {}", slot.id, doctor_id, time);
                Ok(BookingResult::Confirmed(BookingConfirmation {
                    slot_id: slot.id,
                    doctor_id,
                    doctor_name: doctor.name,
                    time: slot.time,
                    patient_name: patient_name.to_string(),
                }))
            }
            ClaimOutcome::AlreadyBooked => {
                warn!("Slot with doctor {} at {} is already booked", doctor_id, time);
                Ok(BookingResult::AlreadyBooked)
            }
            ClaimOutcome::Missing => Err(SchedulingError::SlotNotFound { doctor_id, time }),
        }
    }

    pub async fn book_request(&self, request: BookingRequest) -> Result<BookingResult, SchedulingError> {
        self.book(request.doctor_id, request.time, &request.patient_name).await
    }

    /// Free slot times for `doctor_id`, ascending. Unknown doctors have none.
    pub async fn free_slots(&self, doctor_id: DoctorId) -> Result<Vec<SlotTime>, SchedulingError> {
        let slots = self.store.slots_for_doctor(doctor_id, SlotFilter::Free).await?;
        Ok(slots.into_iter().map(|slot| slot.time).collect())
    }

    pub async fn booked_slots(
        &self,
        doctor_id: DoctorId,
    ) -> Result<Vec<BookedAppointment>, SchedulingError> {
        let slots = self.store.slots_for_doctor(doctor_id, SlotFilter::Booked).await?;

        Ok(slots
            .into_iter()
            .filter_map(|slot| {
                let patient_name = slot.state.patient_name()?.to_string();
                Some(BookedAppointment { time: slot.time, patient_name })
            })
            .collect())
    }

    pub async fn all_booked_across_doctors(&self) -> Result<Vec<ClinicAppointment>, SchedulingError> {
        self.store
            .booked_slots_with_doctors()
            .await
            .map_err(|e: StoreError| {
                error!("Clinic-wide appointment query failed: {}", e);
                SchedulingError::Persistence(e)
            })
    }
}

use std::sync::Arc;

use tracing::debug;

use appointment_cell::services::BookingLedger;
use doctor_cell::models::DoctorError;
use doctor_cell::services::DirectoryService;
use shared_models::clinic::DoctorId;

use crate::models::{
    ClinicAppointmentView, DoctorAppointmentsView, FreeSlotsView, ScheduleError,
};

/// Read-only schedule views. Holds no write path into slot state.
pub struct ScheduleQueryService {
    ledger: Arc<BookingLedger>,
    directory: Arc<DirectoryService>,
}

impl ScheduleQueryService {
    pub fn new(ledger: Arc<BookingLedger>, directory: Arc<DirectoryService>) -> Self {
        Self { ledger, directory }
    }

    async fn label_for(&self, doctor_id: DoctorId) -> Result<Option<String>, ScheduleError> {
        match self.directory.display_label(doctor_id).await {
            Ok(label) => Ok(Some(label)),
            Err(DoctorError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn free_slots_for(&self, doctor_id: DoctorId) -> Result<FreeSlotsView, ScheduleError> {
        let doctor_label = self.label_for(doctor_id).await?;
        let free_slots = self.ledger.free_slots(doctor_id).await?;
        debug!("Doctor {} has {} free slots", doctor_id, free_slots.len());

        Ok(FreeSlotsView { doctor_id, doctor_label, free_slots })
    }

    pub async fn booked_appointments_for(
        &self,
        doctor_id: DoctorId,
    ) -> Result<DoctorAppointmentsView, ScheduleError> {
        let doctor_label = self.label_for(doctor_id).await?;
        let appointments = self.ledger.booked_slots(doctor_id).await?;

        Ok(DoctorAppointmentsView { doctor_id, doctor_label, appointments })
    }

    /// Every booked slot in the clinic, ascending by time.
    pub async fn all_clinic_appointments(&self) -> Result<Vec<ClinicAppointmentView>, ScheduleError> {
        let labels = self.directory.list_all().await?;
        let appointments = self.ledger.all_booked_across_doctors().await?;

        Ok(appointments
            .into_iter()
            .map(|appointment| {
                let doctor_label = labels
                    .get(&appointment.doctor_id)
                    .cloned()
                    .unwrap_or_else(|| format!("{} Dr. {}", appointment.doctor_id, appointment.doctor_name));
                ClinicAppointmentView {
                    time: appointment.time,
                    patient_name: appointment.patient_name,
                    doctor_id: appointment.doctor_id,
                    doctor_name: appointment.doctor_name,
                    doctor_label,
                }
            })
            .collect())
    }
}

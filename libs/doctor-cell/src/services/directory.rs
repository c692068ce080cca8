// libs/doctor-cell/src/services/directory.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use appointment_cell::models::SchedulingError;
use appointment_cell::services::{BookingLedger, SlotCalendar};
use shared_database::{ClinicStore, StoreError};
use shared_models::clinic::{Doctor, DoctorId};

use crate::models::{DoctorError, RegisterDoctorRequest};

/// Registers doctors and answers lookups about them.
///
/// A registered doctor always owns a full day of slots: registration either
/// stores the doctor together with every generated slot, or leaves nothing.
pub struct DirectoryService {
    store: Arc<dyn ClinicStore>,
    ledger: Arc<BookingLedger>,
    calendar: SlotCalendar,
    registration: Mutex<()>,
}

impl DirectoryService {
    pub fn new(ledger: Arc<BookingLedger>) -> Self {
        Self {
            store: Arc::clone(ledger.store()),
            ledger,
            calendar: SlotCalendar::new(),
            registration: Mutex::new(()),
        }
    }

    pub fn ledger(&self) -> &Arc<BookingLedger> {
        &self.ledger
    }

    /// Registers a doctor with slots on the server's current local date.
    pub async fn register(&self, request: RegisterDoctorRequest) -> Result<Doctor, DoctorError> {
        self.register_on(request, Local::now().date_naive()).await
    }

    pub async fn register_on(
        &self,
        request: RegisterDoctorRequest,
        date: NaiveDate,
    ) -> Result<Doctor, DoctorError> {
        let new_doctor = request.validate()?;
        debug!("Registering doctor {} for {}", new_doctor.name, date);

        // Name check and insert must not interleave with another registration
        let _guard = self.registration.lock().await;

        if self.store.find_doctor_by_name(&new_doctor.name).await?.is_some() {
            warn!("Doctor name {} is already registered", new_doctor.name);
            return Err(DoctorError::DuplicateName(new_doctor.name));
        }

        let name = new_doctor.name.clone();
        let times = self.calendar.slot_times(date);
        let (doctor, slots) = self
            .ledger
            .provision_doctor(new_doctor, &times)
            .await
            .map_err(|e| match e {
                SchedulingError::Persistence(StoreError::Conflict(_)) => DoctorError::DuplicateName(name),
                other => {
                    error!("Registration of doctor {} failed: {}", name, other);
                    other.into()
                }
            })?;

        info!("Registered doctor {} with {} slots on {}", doctor.display_label(), slots.len(), date);
        Ok(doctor)
    }

    /// Deletion is refused for any name; slots would be orphaned.
    pub async fn delete(&self, name: &str) -> Result<(), DoctorError> {
        warn!("Refusing to delete doctor {}", name);
        Err(DoctorError::UnsupportedOperation)
    }

    /// Exact, case-sensitive name lookup.
    pub async fn resolve_id_by_name(&self, name: &str) -> Result<Option<DoctorId>, DoctorError> {
        let doctor = self.store.find_doctor_by_name(name).await?;
        Ok(doctor.map(|d| d.id))
    }

    /// Every doctor's display label keyed by id.
    pub async fn list_all(&self) -> Result<BTreeMap<DoctorId, String>, DoctorError> {
        let doctors = self.store.list_doctors().await?;
        Ok(doctors
            .into_iter()
            .map(|doctor| (doctor.id, doctor.display_label()))
            .collect())
    }

    pub async fn get(&self, doctor_id: DoctorId) -> Result<Doctor, DoctorError> {
        self.store
            .find_doctor(doctor_id)
            .await?
            .ok_or_else(|| DoctorError::NotFound(format!("id {}", doctor_id)))
    }

    pub async fn display_label(&self, doctor_id: DoctorId) -> Result<String, DoctorError> {
        Ok(self.get(doctor_id).await?.display_label())
    }
}

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use shared_models::clinic::{
    BookedSlotWithDoctor, Doctor, DoctorId, NewDoctor, Slot, SlotFilter, SlotId, SlotState,
    SlotTime,
};

use crate::store::{ClaimOutcome, ClinicStore, StoreError};

/// Process-local store. Lock order is always `doctors` before `slots`.
pub struct InMemoryStore {
    doctors: RwLock<BTreeMap<DoctorId, Doctor>>,
    slots: RwLock<BTreeMap<(DoctorId, SlotTime), Slot>>,
    next_doctor_id: AtomicI64,
    next_slot_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            doctors: RwLock::new(BTreeMap::new()),
            slots: RwLock::new(BTreeMap::new()),
            next_doctor_id: AtomicI64::new(1),
            next_slot_id: AtomicI64::new(1),
        }
    }

    pub async fn slot_count(&self) -> usize {
        self.slots.read().await.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClinicStore for InMemoryStore {
    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let mut doctors = self.doctors.write().await;

        if doctors.values().any(|existing| existing.name == doctor.name) {
            return Err(StoreError::Conflict(format!(
                "doctor named {} already exists",
                doctor.name
            )));
        }

        let id = DoctorId(self.next_doctor_id.fetch_add(1, Ordering::SeqCst));
        let doctor = doctor.with_id(id);
        doctors.insert(id, doctor.clone());

        debug!("Stored doctor {} with id {}", doctor.name, id);
        Ok(doctor)
    }

    async fn discard_doctor(&self, doctor_id: DoctorId) -> Result<(), StoreError> {
        let mut doctors = self.doctors.write().await;
        let mut slots = self.slots.write().await;

        doctors.remove(&doctor_id);
        slots.retain(|(owner, _), _| *owner != doctor_id);

        warn!("Discarded doctor {} and its slots", doctor_id);
        Ok(())
    }

    async fn find_doctor(&self, doctor_id: DoctorId) -> Result<Option<Doctor>, StoreError> {
        Ok(self.doctors.read().await.get(&doctor_id).cloned())
    }

    async fn find_doctor_by_name(&self, name: &str) -> Result<Option<Doctor>, StoreError> {
        Ok(self
            .doctors
            .read()
            .await
            .values()
            .find(|doctor| doctor.name == name)
            .cloned())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        Ok(self.doctors.read().await.values().cloned().collect())
    }

    async fn insert_slots(
        &self,
        doctor_id: DoctorId,
        times: &[SlotTime],
    ) -> Result<Vec<Slot>, StoreError> {
        let doctors = self.doctors.read().await;
        if !doctors.contains_key(&doctor_id) {
            return Err(StoreError::Conflict(format!("doctor {} does not exist", doctor_id)));
        }

        let mut slots = self.slots.write().await;

        // Validate the whole batch before touching the map.
        let mut seen = HashSet::with_capacity(times.len());
        for time in times {
            if !seen.insert(*time) || slots.contains_key(&(doctor_id, *time)) {
                return Err(StoreError::Conflict(format!(
                    "slot {} already exists for doctor {}",
                    time, doctor_id
                )));
            }
        }

        let created: Vec<Slot> = times
            .iter()
            .map(|time| Slot {
                id: SlotId(self.next_slot_id.fetch_add(1, Ordering::SeqCst)),
                doctor_id,
                time: *time,
                state: SlotState::Free,
            })
            .collect();

        for slot in &created {
            slots.insert((doctor_id, slot.time), slot.clone());
        }

        Ok(created)
    }

    async fn claim_slot(
        &self,
        doctor_id: DoctorId,
        time: SlotTime,
        patient_name: &str,
    ) -> Result<ClaimOutcome, StoreError> {
        let mut slots = self.slots.write().await;

        let Some(slot) = slots.get_mut(&(doctor_id, time)) else {
            return Ok(ClaimOutcome::Missing);
        };

        if !slot.state.is_free() {
            return Ok(ClaimOutcome::AlreadyBooked);
        }

        slot.state = SlotState::Booked {
            patient_name: patient_name.to_string(),
        };
        Ok(ClaimOutcome::Claimed(slot.clone()))
    }

    async fn slots_for_doctor(
        &self,
        doctor_id: DoctorId,
        filter: SlotFilter,
    ) -> Result<Vec<Slot>, StoreError> {
        // Keys sort by (doctor, time) so one doctor's slots come out in time order.
        Ok(self
            .slots
            .read()
            .await
            .iter()
            .filter(|((owner, _), slot)| *owner == doctor_id && filter.matches(&slot.state))
            .map(|(_, slot)| slot.clone())
            .collect())
    }

    async fn booked_slots_with_doctors(&self) -> Result<Vec<BookedSlotWithDoctor>, StoreError> {
        let doctors = self.doctors.read().await;
        let slots = self.slots.read().await;

        let mut booked: Vec<BookedSlotWithDoctor> = slots
            .values()
            .filter_map(|slot| {
                let patient_name = slot.state.patient_name()?;
                let Some(doctor) = doctors.get(&slot.doctor_id) else {
                    warn!("Booked slot {} references missing doctor {}", slot.id, slot.doctor_id);
                    return None;
                };
                Some(BookedSlotWithDoctor {
                    time: slot.time,
                    patient_name: patient_name.to_string(),
                    doctor_id: doctor.id,
                    doctor_name: doctor.name.clone(),
                })
            })
            .collect();

        booked.sort_by_key(|entry| (entry.time, entry.doctor_id));
        Ok(booked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> SlotTime {
        SlotTime::on(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(), hour, minute).unwrap()
    }

    fn new_doctor(name: &str) -> NewDoctor {
        NewDoctor {
            name: name.to_string(),
            gender: "Female".to_string(),
            experience_years: 3,
            specialization: "Ortho".to_string(),
        }
    }

    #[tokio::test]
    async fn test_doctor_ids_are_not_reused_after_discard() {
        let store = InMemoryStore::new();
        let first = store.insert_doctor(new_doctor("Laxmi")).await.unwrap();
        store.discard_doctor(first.id).await.unwrap();

        let second = store.insert_doctor(new_doctor("Laxmi")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_insert_slots_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let doctor = store.insert_doctor(new_doctor("Rani")).await.unwrap();
        store.insert_slots(doctor.id, &[at(9, 0)]).await.unwrap();

        let result = store.insert_slots(doctor.id, &[at(9, 30), at(9, 0)]).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.slot_count().await, 1);
    }

    #[tokio::test]
    async fn test_insert_slots_requires_existing_doctor() {
        let store = InMemoryStore::new();
        let result = store.insert_slots(DoctorId(42), &[at(9, 0)]).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_claim_is_check_and_set() {
        let store = InMemoryStore::new();
        let doctor = store.insert_doctor(new_doctor("Raju")).await.unwrap();
        store.insert_slots(doctor.id, &[at(12, 0)]).await.unwrap();

        let first = store.claim_slot(doctor.id, at(12, 0), "Nani").await.unwrap();
        assert!(matches!(first, ClaimOutcome::Claimed(_)));

        let second = store.claim_slot(doctor.id, at(12, 0), "Other").await.unwrap();
        assert_eq!(second, ClaimOutcome::AlreadyBooked);

        let missing = store.claim_slot(doctor.id, at(17, 0), "Other").await.unwrap();
        assert_eq!(missing, ClaimOutcome::Missing);
    }
}

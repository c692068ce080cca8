use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::clinic::{
    BookedSlotWithDoctor, Doctor, DoctorId, NewDoctor, Slot, SlotFilter, SlotId, SlotState,
    SlotTime,
};

use crate::store::{ClaimOutcome, ClinicStore, StoreError};
use crate::supabase::SupabaseClient;

const DOCTORS: &str = "/rest/v1/doctors";
const SLOTS: &str = "/rest/v1/appointment_slots";
const REGISTER_DOCTOR_RPC: &str = "/rest/v1/rpc/register_doctor";

#[derive(Debug, Deserialize)]
struct DoctorRow {
    id: i64,
    name: String,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    experience_years: Option<u32>,
    specialization: String,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Doctor {
            id: DoctorId(row.id),
            name: row.name,
            gender: row.gender.unwrap_or_default(),
            experience_years: row.experience_years.unwrap_or_default(),
            specialization: row.specialization,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SlotRow {
    id: i64,
    doctor_id: i64,
    time_slot: SlotTime,
    patient_name: Option<String>,
    is_booked: bool,
}

impl From<SlotRow> for Slot {
    fn from(row: SlotRow) -> Self {
        let state = if row.is_booked {
            SlotState::Booked {
                patient_name: row.patient_name.unwrap_or_default(),
            }
        } else {
            SlotState::Free
        };

        Slot {
            id: SlotId(row.id),
            doctor_id: DoctorId(row.doctor_id),
            time: row.time_slot,
            state,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DoctorNameRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BookedRow {
    time_slot: SlotTime,
    patient_name: Option<String>,
    doctor_id: i64,
    doctors: Option<DoctorNameRow>,
}

/// Result of the `register_doctor` database function.
#[derive(Debug, Deserialize)]
struct RegisteredRow {
    doctor: DoctorRow,
    #[serde(default)]
    slots: Option<Vec<SlotRow>>,
}

/// `ClinicStore` backed by PostgREST tables `doctors` and `appointment_slots`.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn supabase(&self) -> &SupabaseClient {
        &self.supabase
    }

    fn slot_key_filter(doctor_id: DoctorId, time: SlotTime) -> String {
        format!(
            "doctor_id=eq.{}&time_slot=eq.{}",
            doctor_id,
            time.to_storage_string()
        )
    }

    async fn fetch_doctors(&self, path: &str) -> Result<Vec<Doctor>, StoreError> {
        let rows: Vec<DoctorRow> = self.supabase.request(Method::GET, path, None).await?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }
}

#[async_trait]
impl ClinicStore for SupabaseStore {
    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        debug!("Inserting doctor row for {}", doctor.name);

        let rows: Vec<DoctorRow> = self.supabase.request_with_headers(
            Method::POST,
            DOCTORS,
            Some(json!({
                "name": doctor.name,
                "gender": doctor.gender,
                "experience_years": doctor.experience_years,
                "specialization": doctor.specialization,
            })),
            Some(SupabaseClient::return_representation()),
        ).await?;

        rows.into_iter()
            .next()
            .map(Doctor::from)
            .ok_or_else(|| StoreError::Decode("insert returned no doctor row".to_string()))
    }

    async fn discard_doctor(&self, doctor_id: DoctorId) -> Result<(), StoreError> {
        let slots_path = format!("{}?doctor_id=eq.{}", SLOTS, doctor_id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &slots_path,
            None,
            Some(SupabaseClient::return_representation()),
        ).await?;

        let doctor_path = format!("{}?id=eq.{}", DOCTORS, doctor_id);
        let _: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &doctor_path,
            None,
            Some(SupabaseClient::return_representation()),
        ).await?;

        warn!("Discarded doctor {} and its slots", doctor_id);
        Ok(())
    }

    async fn find_doctor(&self, doctor_id: DoctorId) -> Result<Option<Doctor>, StoreError> {
        let path = format!("{}?id=eq.{}", DOCTORS, doctor_id);
        Ok(self.fetch_doctors(&path).await?.into_iter().next())
    }

    async fn find_doctor_by_name(&self, name: &str) -> Result<Option<Doctor>, StoreError> {
        let path = format!("{}?name=eq.{}", DOCTORS, urlencoding::encode(name));
        Ok(self.fetch_doctors(&path).await?.into_iter().next())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        let path = format!("{}?order=id.asc", DOCTORS);
        self.fetch_doctors(&path).await
    }

    async fn insert_slots(
        &self,
        doctor_id: DoctorId,
        times: &[SlotTime],
    ) -> Result<Vec<Slot>, StoreError> {
        if times.is_empty() {
            return Ok(Vec::new());
        }

        // One POST with an array body is a single INSERT statement.
        let batch: Vec<Value> = times
            .iter()
            .map(|time| json!({
                "doctor_id": doctor_id.0,
                "time_slot": time.to_storage_string(),
                "is_booked": false,
            }))
            .collect();

        let rows: Vec<SlotRow> = self.supabase.request_with_headers(
            Method::POST,
            SLOTS,
            Some(Value::Array(batch)),
            Some(SupabaseClient::return_representation()),
        ).await?;

        if rows.len() != times.len() {
            return Err(StoreError::Decode(format!(
                "expected {} slot rows, got {}",
                times.len(),
                rows.len()
            )));
        }

        info!("Inserted {} slots for doctor {}", rows.len(), doctor_id);
        let mut slots: Vec<Slot> = rows.into_iter().map(Slot::from).collect();
        slots.sort_by_key(|slot| slot.time);
        Ok(slots)
    }

    // One RPC call runs in a single database transaction.
    async fn insert_doctor_with_slots(
        &self,
        doctor: NewDoctor,
        times: &[SlotTime],
    ) -> Result<(Doctor, Vec<Slot>), StoreError> {
        debug!("Registering doctor {} with {} slots via RPC", doctor.name, times.len());

        let time_slots: Vec<String> = times.iter().map(SlotTime::to_storage_string).collect();
        let registered: RegisteredRow = self.supabase.request(
            Method::POST,
            REGISTER_DOCTOR_RPC,
            Some(json!({
                "p_name": doctor.name,
                "p_gender": doctor.gender,
                "p_experience_years": doctor.experience_years,
                "p_specialization": doctor.specialization,
                "p_time_slots": time_slots,
            })),
        ).await?;

        let doctor = Doctor::from(registered.doctor);
        let mut slots: Vec<Slot> = registered
            .slots
            .unwrap_or_default()
            .into_iter()
            .map(Slot::from)
            .collect();

        if slots.len() != times.len() {
            return Err(StoreError::Decode(format!(
                "expected {} slot rows, got {}",
                times.len(),
                slots.len()
            )));
        }

        slots.sort_by_key(|slot| slot.time);
        info!("Registered doctor {} with {} slots", doctor.id, slots.len());
        Ok((doctor, slots))
    }

    async fn claim_slot(
        &self,
        doctor_id: DoctorId,
        time: SlotTime,
        patient_name: &str,
    ) -> Result<ClaimOutcome, StoreError> {
        let key = Self::slot_key_filter(doctor_id, time);

        // The row lock taken by UPDATE re-checks is_booked, so only one
        // concurrent PATCH can match.
        let claim_path = format!("{}?{}&is_booked=eq.false", SLOTS, key);
        let claimed: Vec<SlotRow> = self.supabase.request_with_headers(
            Method::PATCH,
            &claim_path,
            Some(json!({
                "patient_name": patient_name,
                "is_booked": true,
            })),
            Some(SupabaseClient::return_representation()),
        ).await?;

        if let Some(row) = claimed.into_iter().next() {
            return Ok(ClaimOutcome::Claimed(Slot::from(row)));
        }

        let lookup_path = format!("{}?{}&select=id", SLOTS, key);
        let existing: Vec<Value> = self.supabase.request(Method::GET, &lookup_path, None).await?;

        if existing.is_empty() {
            Ok(ClaimOutcome::Missing)
        } else {
            Ok(ClaimOutcome::AlreadyBooked)
        }
    }

    async fn slots_for_doctor(
        &self,
        doctor_id: DoctorId,
        filter: SlotFilter,
    ) -> Result<Vec<Slot>, StoreError> {
        let state_filter = match filter {
            SlotFilter::Any => "",
            SlotFilter::Free => "&is_booked=eq.false",
            SlotFilter::Booked => "&is_booked=eq.true",
        };
        let path = format!(
            "{}?doctor_id=eq.{}{}&order=time_slot.asc",
            SLOTS, doctor_id, state_filter
        );

        let rows: Vec<SlotRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn booked_slots_with_doctors(&self) -> Result<Vec<BookedSlotWithDoctor>, StoreError> {
        let path = format!(
            "{}?is_booked=eq.true&select=time_slot,patient_name,doctor_id,doctors(name)&order=time_slot.asc,doctor_id.asc",
            SLOTS
        );

        let rows: Vec<BookedRow> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let Some(doctor) = row.doctors else {
                    warn!("Booked slot at {} references missing doctor {}", row.time_slot, row.doctor_id);
                    return None;
                };
                Some(BookedSlotWithDoctor {
                    time: row.time_slot,
                    patient_name: row.patient_name.unwrap_or_default(),
                    doctor_id: DoctorId(row.doctor_id),
                    doctor_name: doctor.name,
                })
            })
            .collect())
    }
}

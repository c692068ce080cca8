use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use appointment_cell::models::{BookingResult, SchedulingError};
use doctor_cell::models::{DoctorError, RegisterDoctorRequest};
use doctor_cell::services::DirectoryService;
use shared_models::clinic::SlotTime;

const DEMO_DOCTORS: [(&str, &str, &str, u32); 6] = [
    ("Prashanth", "Ortho", "Male", 4),
    ("Rahul", "General", "Male", 5),
    ("Rani", "Gyno", "Female", 1),
    ("Raju", "Dentist", "Male", 2),
    ("Laxmi", "Ortho", "Female", 3),
    ("Salla Arvind", "neuro_Surgeon", "male", 1),
];

// (patient, doctor, hour, minute)
const DEMO_BOOKINGS: [(&str, &str, u32, u32); 6] = [
    ("Naga", "Rani", 10, 30),
    ("Vinesh", "Prashanth", 9, 30),
    ("Rahul", "Prashanth", 11, 30),
    ("Nani", "Raju", 12, 0),
    ("Bujji", "Rahul", 14, 0),
    ("Rishi", "Laxmi", 10, 0),
];

/// Registers the demo doctors and books the demo patients on `date`.
///
/// Safe to rerun against a persistent store: names already taken, slots
/// already booked and times the doctor has no slot for are skipped.
pub async fn seed_demo_roster(directory: &DirectoryService, date: NaiveDate) -> Result<()> {
    for (name, specialization, gender, experience_years) in DEMO_DOCTORS {
        let request = RegisterDoctorRequest {
            name: name.to_string(),
            specialization: specialization.to_string(),
            gender: gender.to_string(),
            experience_years,
        };

        match directory.register_on(request, date).await {
            Ok(doctor) => info!("Seeded {}", doctor.display_label()),
            Err(DoctorError::DuplicateName(_)) => info!("Doctor {} already seeded, skipping", name),
            Err(e) => return Err(anyhow!("Seeding doctor {} failed: {}", name, e)),
        }
    }

    for (patient, doctor_name, hour, minute) in DEMO_BOOKINGS {
        let Some(doctor_id) = directory.resolve_id_by_name(doctor_name).await? else {
            warn!("Demo doctor {} is missing, skipping booking for {}", doctor_name, patient);
            continue;
        };
        let time = SlotTime::on(date, hour, minute)
            .ok_or_else(|| anyhow!("Invalid demo slot {:02}:{:02}", hour, minute))?;

        match directory.ledger().book(doctor_id, time, patient).await {
            Ok(BookingResult::Confirmed(confirmation)) => info!("{}", confirmation.message()),
            Ok(BookingResult::AlreadyBooked) => {
                info!("Demo slot {} with Dr. {} already booked, skipping", time, doctor_name)
            }
            // Doctors seeded on an earlier day only own that day's slots
            Err(SchedulingError::SlotNotFound { .. }) => {
                warn!("Dr. {} has no slot at {}, skipping booking for {}", doctor_name, time, patient)
            }
            Err(e) => return Err(anyhow!("Seeding booking for {} failed: {}", patient, e)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use appointment_cell::services::BookingLedger;
    use shared_database::{ClinicStore, InMemoryStore};

    fn directory() -> DirectoryService {
        let store: Arc<dyn ClinicStore> = Arc::new(InMemoryStore::new());
        DirectoryService::new(Arc::new(BookingLedger::new(store)))
    }

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let directory = directory();
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        seed_demo_roster(&directory, day).await.unwrap();
        seed_demo_roster(&directory, day).await.unwrap();

        assert_eq!(directory.list_all().await.unwrap().len(), 6);
        let all = directory.ledger().all_booked_across_doctors().await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].patient_name, "Vinesh");
        assert_eq!(all[0].time.to_string(), "2026-10-18 09:30");
    }

    #[tokio::test]
    async fn test_seed_on_a_later_day_skips_missing_slots() {
        let directory = directory();
        let first_day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        seed_demo_roster(&directory, first_day).await.unwrap();
        let result = seed_demo_roster(&directory, next_day).await;

        assert!(result.is_ok(), "reseeding failed: {:?}", result);
        assert_eq!(directory.list_all().await.unwrap().len(), 6);
        let all = directory.ledger().all_booked_across_doctors().await.unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|appointment| appointment.time.date() == first_day));
    }
}

use chrono::NaiveDate;

use shared_models::clinic::{DoctorId, SlotTime};

pub const FIRST_SLOT_HOUR: u32 = 9;
pub const LAST_SLOT_HOUR: u32 = 16;
pub const SLOT_MINUTES: [u32; 2] = [0, 30];
pub const SLOTS_PER_DAY: usize = 16;

/// Fixed half-hour grid from 09:00 to 16:30.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotCalendar;

impl SlotCalendar {
    pub fn new() -> Self {
        Self
    }

    /// The day's bookable slot starts for `doctor_id`, ascending.
    pub fn generate_slots(&self, doctor_id: DoctorId, date: NaiveDate) -> Vec<(DoctorId, SlotTime)> {
        self.slot_times(date)
            .into_iter()
            .map(|time| (doctor_id, time))
            .collect()
    }

    pub fn slot_times(&self, date: NaiveDate) -> Vec<SlotTime> {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
            .flat_map(|hour| SLOT_MINUTES.iter().map(move |minute| (hour, *minute)))
            .filter_map(|(hour, minute)| SlotTime::on(date, hour, minute))
            .collect()
    }

    pub fn is_on_grid(&self, time: SlotTime) -> bool {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&time.hour())
            && SLOT_MINUTES.contains(&time.minute())
    }
}

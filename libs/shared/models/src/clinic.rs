use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ==============================================================================
// IDENTIFIERS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorId(pub i64);

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub i64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==============================================================================
// SLOT TIME
// ==============================================================================

/// Wall-clock slot start, truncated to the minute. No timezone is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveDateTime);

impl SlotTime {
    pub const DISPLAY_FORMAT: &'static str = "%Y-%m-%d %H:%M";
    /// Format PostgREST expects in `eq.` filters on a `timestamp` column.
    pub const STORAGE_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S";

    const ACCEPTED_FORMATS: [&'static str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];

    pub fn new(at: NaiveDateTime) -> Self {
        let truncated = at
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(at);
        Self(truncated)
    }

    /// Returns `None` when hour or minute are out of range.
    pub fn on(date: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        date.and_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn to_storage_string(&self) -> String {
        self.0.format(Self::STORAGE_FORMAT).to_string()
    }
}

impl From<NaiveDateTime> for SlotTime {
    fn from(at: NaiveDateTime) -> Self {
        Self::new(at)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::DISPLAY_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid slot time '{0}', expected YYYY-MM-DD HH:MM")]
pub struct SlotTimeParseError(pub String);

impl FromStr for SlotTime {
    type Err = SlotTimeParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        // Postgres may append fractional seconds
        let without_fraction = trimmed.split('.').next().unwrap_or(trimmed);

        Self::ACCEPTED_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(without_fraction, format).ok())
            .map(Self::new)
            .ok_or_else(|| SlotTimeParseError(raw.to_string()))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// DOCTOR
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub gender: String,
    pub experience_years: u32,
    pub specialization: String,
}

impl Doctor {
    /// Label shown in doctor pickers and schedule views.
    pub fn display_label(&self) -> String {
        format!("{} Dr. {}, {}", self.id, self.name, self.specialization)
    }
}

/// Doctor attributes before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub gender: String,
    pub experience_years: u32,
    pub specialization: String,
}

impl NewDoctor {
    pub fn with_id(self, id: DoctorId) -> Doctor {
        Doctor {
            id,
            name: self.name,
            gender: self.gender,
            experience_years: self.experience_years,
            specialization: self.specialization,
        }
    }
}

// ==============================================================================
// SLOT
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotState {
    Free,
    Booked { patient_name: String },
}

impl SlotState {
    pub fn is_free(&self) -> bool {
        matches!(self, SlotState::Free)
    }

    pub fn patient_name(&self) -> Option<&str> {
        match self {
            SlotState::Free => None,
            SlotState::Booked { patient_name } => Some(patient_name),
        }
    }
}

/// Filter used by slot listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFilter {
    Any,
    Free,
    Booked,
}

impl SlotFilter {
    pub fn matches(&self, state: &SlotState) -> bool {
        match self {
            SlotFilter::Any => true,
            SlotFilter::Free => state.is_free(),
            SlotFilter::Booked => !state.is_free(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub doctor_id: DoctorId,
    pub time: SlotTime,
    #[serde(flatten)]
    pub state: SlotState,
}

/// Clinic-wide booked slot joined with its doctor's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlotWithDoctor {
    pub time: SlotTime,
    pub patient_name: String,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
}
